//! Best-effort request analytics for API Gateway backed Lambda functions.
//!
//! Each invocation extracts the request time, client IP, user agent and (for
//! CloudFront fronted APIs) the viewer country from the inbound proxy event and
//! forwards them as one JSON record to a Kinesis Data Firehose delivery stream.
//! Failures are logged and never reach the caller.

pub mod config;
pub mod event;
pub mod handler;
pub mod record;
pub mod sink;

// Re-export commonly used types
pub use config::{Config, ConfigError, RecordProfile};
pub use event::ProxyEvent;
pub use handler::{forward_event, function_handler, AppState};
pub use record::{AnalyticsRecord, RequestTime};
pub use sink::{FirehoseSink, RecordSink};
