//! Event forwarding with a single error boundary.
//!
//! Analytics are best effort: every failure while forwarding (malformed event,
//! serialization, missing configuration, Firehose errors) is logged and
//! discarded, and the caller sees the same outcome as if nothing was attempted.

use anyhow::{anyhow, Context, Result};
use aws_lambda_events::apigw::ApiGatewayProxyResponse;
use http::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN};
use http::HeaderMap;
use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use crate::config::{Config, RecordProfile};
use crate::event::ProxyEvent;
use crate::record::AnalyticsRecord;
use crate::sink::{FirehoseSink, RecordSink};

/// Shared application state across Lambda invocations
pub struct AppState<S = FirehoseSink> {
    pub config: Config,
    pub sink: S,
}

impl<S: RecordSink> AppState<S> {
    pub fn new(config: Config, sink: S) -> Self {
        Self { config, sink }
    }
}

/// Lambda entry point. Never returns an error.
pub async fn function_handler<S: RecordSink>(
    event: LambdaEvent<Value>,
    state: Arc<AppState<S>>,
) -> Result<Option<ApiGatewayProxyResponse>, LambdaError> {
    Ok(forward_event(event.payload, &state).await)
}

/// Forwards one event and maps the outcome to the profile's response.
#[instrument(skip_all, fields(analytics.profile = %state.config.profile))]
pub async fn forward_event<S: RecordSink>(
    event: Value,
    state: &AppState<S>,
) -> Option<ApiGatewayProxyResponse> {
    match try_forward(event, state).await {
        Ok(()) => success_response(state.config.profile),
        Err(e) => {
            tracing::error!("Unexpected error: {:#}", e);
            None
        }
    }
}

async fn try_forward<S: RecordSink>(event: Value, state: &AppState<S>) -> Result<()> {
    let event = ProxyEvent::from_value(event).context("Failed to parse inbound event")?;
    let record = AnalyticsRecord::from_event(state.config.profile, &event);

    let payload = record.to_payload()?;

    if state.config.profile == RecordProfile::CloudFront {
        tracing::info!("payload: {}", String::from_utf8_lossy(&payload));
    }

    let delivery_stream_name = state
        .config
        .delivery_stream_name
        .as_deref()
        .ok_or_else(|| anyhow!("Delivery stream name is not configured"))?;

    state.sink.put_record(delivery_stream_name, payload).await
}

fn success_response(profile: RecordProfile) -> Option<ApiGatewayProxyResponse> {
    match profile {
        RecordProfile::CloudFront => {
            let mut headers = HeaderMap::new();
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
            Some(ApiGatewayProxyResponse {
                status_code: 200,
                headers,
                ..Default::default()
            })
        }
        RecordProfile::ForwardedFor => None,
    }
}
