//! Outbound write of a serialized record to the ingestion service.
//!
//! [`RecordSink`] is the seam between the handler and Firehose. The production
//! implementation, [`FirehoseSink`], issues a single `PutRecord` call per record
//! on a client configured without retries.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_firehose::error::DisplayErrorContext;
use aws_sdk_firehose::primitives::Blob;
use aws_sdk_firehose::types::Record;
use aws_sdk_firehose::Client as FirehoseClient;
use opentelemetry::trace::SpanKind;
use tracing::instrument;

use crate::config::DEFAULT_REGION;

// Firehose limit for a single record, before base64 encoding
pub const MAX_RECORD_SIZE_BYTES: usize = 1_024_000;

#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Appends one record to the named delivery stream. The acknowledgment is
    /// not inspected beyond success or failure.
    async fn put_record(&self, delivery_stream_name: &str, data: Vec<u8>) -> Result<()>;
}

#[derive(Clone, Debug)]
pub struct FirehoseSink {
    client: FirehoseClient,
}

impl FirehoseSink {
    pub fn new(client: FirehoseClient) -> Self {
        Self { client }
    }

    /// Builds the client from the standard AWS configuration chain, falling back
    /// to `us-east-1` when no region is configured. Retries are disabled.
    pub async fn from_env() -> Self {
        let region = RegionProviderChain::default_provider().or_else(DEFAULT_REGION);
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .retry_config(RetryConfig::disabled())
            .load()
            .await;

        tracing::debug!(
            "Firehose client region: {}",
            config
                .region()
                .map(|r| r.to_string())
                .unwrap_or_default()
        );

        Self::new(FirehoseClient::new(&config))
    }
}

#[async_trait]
impl RecordSink for FirehoseSink {
    #[instrument(skip_all, fields(
        otel.kind = ?SpanKind::Client,
        firehose.delivery_stream = %delivery_stream_name,
        firehose.record.size = data.len(),
    ))]
    async fn put_record(&self, delivery_stream_name: &str, data: Vec<u8>) -> Result<()> {
        if data.len() > MAX_RECORD_SIZE_BYTES {
            return Err(anyhow!(
                "Record size {} bytes exceeds maximum size of {} bytes",
                data.len(),
                MAX_RECORD_SIZE_BYTES
            ));
        }

        let record = Record::builder()
            .data(Blob::new(data))
            .build()
            .context("Failed to build Firehose record")?;

        let output = self
            .client
            .put_record()
            .delivery_stream_name(delivery_stream_name)
            .record(record)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to put record to Firehose: {}", DisplayErrorContext(&e)))?;

        tracing::debug!(
            "Record {} delivered to {}",
            output.record_id(),
            delivery_stream_name
        );
        Ok(())
    }
}
