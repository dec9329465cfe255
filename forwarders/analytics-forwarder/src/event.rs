//! Inbound API Gateway proxy event.
//!
//! Only the fields the forwarder reads are modelled, and every one of them is
//! optional: a partially populated event still produces a (partial) record.
//! The full `aws_lambda_events` request type is stricter than that, so it is
//! not used for parsing.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const HEADER_USER_AGENT: &str = "User-Agent";
pub const HEADER_USER_AGENT_LOWER: &str = "user-agent";
pub const HEADER_VIEWER_COUNTRY: &str = "CloudFront-Viewer-Country";
pub const HEADER_FORWARDED_FOR: &str = "x-forwarded-for";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyEvent {
    #[serde(default)]
    pub headers: Option<BTreeMap<String, Option<String>>>,
    #[serde(default)]
    pub request_context: Option<RequestContext>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default)]
    pub request_time_epoch: Option<i64>,
    #[serde(default)]
    pub request_time: Option<String>,
    #[serde(default)]
    pub identity: Option<RequestIdentity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestIdentity {
    #[serde(default)]
    pub source_ip: Option<String>,
}

impl ProxyEvent {
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Looks up a header by name. An exact-case match wins; otherwise the
    /// lexicographically smallest name that matches ignoring ASCII case is used.
    /// A `null` value counts as a missing header.
    pub fn header(&self, name: &str) -> Option<&str> {
        let headers = self.headers.as_ref()?;
        if let Some(Some(value)) = headers.get(name) {
            return Some(value.as_str());
        }
        headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .find_map(|(_, value)| value.as_deref())
    }

    pub fn request_time_epoch(&self) -> Option<i64> {
        self.request_context.as_ref()?.request_time_epoch
    }

    pub fn request_time(&self) -> Option<&str> {
        self.request_context.as_ref()?.request_time.as_deref()
    }

    pub fn source_ip(&self) -> Option<&str> {
        self.request_context
            .as_ref()?
            .identity
            .as_ref()?
            .source_ip
            .as_deref()
    }
}
