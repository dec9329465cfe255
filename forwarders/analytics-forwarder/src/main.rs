//! AWS Lambda function that forwards request analytics to Kinesis Data Firehose.
//!
//! This Lambda function:
//! 1. Receives API Gateway proxy events
//! 2. Extracts request time, client IP, user agent and viewer country
//! 3. Serializes them as a JSON record
//! 4. Writes the record to a Firehose delivery stream with a single PutRecord call
//!
//! Errors are logged and suppressed so that analytics never affect the request path.

use analytics_forwarder::{function_handler, AppState, Config, FirehoseSink};
use lambda_otel_lite::{init_telemetry, OtelTracingLayer, TelemetryConfig};
use lambda_runtime::{tower::ServiceBuilder, Error as LambdaError, LambdaEvent, Runtime};
use serde_json::Value;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    let (_, completion_handler) =
        init_telemetry(TelemetryConfig::builder().enable_fmt_layer(true).build()).await?;

    let config = Config::from_env()?;

    // The Firehose client is created once and shared by all invocations
    let state = Arc::new(AppState::new(config, FirehoseSink::from_env().await));

    let service = ServiceBuilder::new()
        .layer(OtelTracingLayer::new(completion_handler).with_name("analytics-forwarder"))
        .service_fn(|event: LambdaEvent<Value>| {
            let state = Arc::clone(&state);
            async move { function_handler(event, state).await }
        });

    // Create and run the Lambda runtime
    let runtime = Runtime::new(service);
    runtime.run().await
}
