use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::RecordProfile;
use crate::event::{
    ProxyEvent, HEADER_FORWARDED_FOR, HEADER_USER_AGENT, HEADER_USER_AGENT_LOWER,
    HEADER_VIEWER_COUNTRY,
};

/// Request time as reported by API Gateway, either epoch milliseconds or the
/// formatted CLF-style string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestTime {
    Epoch(i64),
    Formatted(String),
}

/// The record written to the delivery stream. Fields missing from the event
/// are left out of the JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<RequestTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl AnalyticsRecord {
    pub fn from_event(profile: RecordProfile, event: &ProxyEvent) -> Self {
        match profile {
            RecordProfile::CloudFront => Self {
                date: event.request_time_epoch().map(RequestTime::Epoch),
                ip: event.source_ip().map(str::to_owned),
                user_agent: event.header(HEADER_USER_AGENT).map(str::to_owned),
                country: event.header(HEADER_VIEWER_COUNTRY).map(str::to_owned),
            },
            RecordProfile::ForwardedFor => Self {
                date: event
                    .request_time()
                    .map(|time| RequestTime::Formatted(time.to_owned())),
                ip: event.header(HEADER_FORWARDED_FOR).map(str::to_owned),
                user_agent: event.header(HEADER_USER_AGENT_LOWER).map(str::to_owned),
                country: None,
            },
        }
    }

    pub fn to_payload(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).context("Failed to serialize analytics record")
    }
}
