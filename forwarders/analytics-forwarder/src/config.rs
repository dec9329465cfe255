use std::env;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// Environment variable selecting the record profile
pub const ENV_VAR_RECORD_PROFILE: &str = "ANALYTICS_RECORD_PROFILE";
// Environment variable naming the Firehose delivery stream
pub const ENV_VAR_DELIVERY_STREAM_NAME: &str = "ANALYTICS_DELIVERY_STREAM_NAME";

// Relates to AWS::KinesisFirehose::DeliveryStream DeliveryStreamName
pub const DEFAULT_DELIVERY_STREAM_NAME: &str = "AnalyticsDeliveryStream";
pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown record profile '{0}', expected 'cloudfront' or 'forwarded-for'")]
    UnknownProfile(String),
}

/// Selects which request fields end up in the record and how the handler answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordProfile {
    /// REST API behind CloudFront: epoch request time, source IP from the
    /// request identity, viewer country, explicit 200 response.
    #[default]
    CloudFront,
    /// Proxied requests: formatted request time, `x-forwarded-for` as the client
    /// IP, no country, no explicit response.
    ForwardedFor,
}

impl FromStr for RecordProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cloudfront" => Ok(Self::CloudFront),
            "forwarded-for" | "forwarded_for" => Ok(Self::ForwardedFor),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

impl fmt::Display for RecordProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CloudFront => f.write_str("cloudfront"),
            Self::ForwardedFor => f.write_str("forwarded-for"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub profile: RecordProfile,
    /// `None` only for the forwarded-for profile when nothing was configured.
    /// Each invocation then fails (and suppresses) on stream resolution.
    pub delivery_stream_name: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::resolve(
            env::var(ENV_VAR_RECORD_PROFILE).ok(),
            env::var(ENV_VAR_DELIVERY_STREAM_NAME).ok(),
        )?;

        match &config.delivery_stream_name {
            Some(name) => tracing::info!(
                "Record profile {}, delivery stream name set: {}",
                config.profile,
                name
            ),
            None => tracing::warn!(
                "Record profile {} but {} is not set, records will not be delivered",
                config.profile,
                ENV_VAR_DELIVERY_STREAM_NAME
            ),
        }

        Ok(config)
    }

    /// Builds the configuration from raw variable values. Empty values count as unset.
    pub fn resolve(
        profile: Option<String>,
        delivery_stream_name: Option<String>,
    ) -> Result<Self, ConfigError> {
        let profile = match profile.filter(|p| !p.trim().is_empty()) {
            Some(value) => value.parse()?,
            None => RecordProfile::default(),
        };

        let configured = delivery_stream_name.filter(|name| !name.is_empty());
        let delivery_stream_name = match profile {
            RecordProfile::CloudFront => {
                Some(configured.unwrap_or_else(|| DEFAULT_DELIVERY_STREAM_NAME.to_string()))
            }
            RecordProfile::ForwardedFor => configured,
        };

        Ok(Self {
            profile,
            delivery_stream_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealed_test::prelude::*;

    #[test]
    fn test_profile_parsing() {
        assert_eq!(
            "cloudfront".parse::<RecordProfile>(),
            Ok(RecordProfile::CloudFront)
        );
        assert_eq!(
            " Forwarded-For ".parse::<RecordProfile>(),
            Ok(RecordProfile::ForwardedFor)
        );
        assert_eq!(
            "forwarded_for".parse::<RecordProfile>(),
            Ok(RecordProfile::ForwardedFor)
        );
        assert_eq!(
            "edge".parse::<RecordProfile>(),
            Err(ConfigError::UnknownProfile("edge".to_string()))
        );
    }

    #[test]
    fn test_resolve_defaults_to_cloudfront_literal_stream() {
        let config = Config::resolve(None, None).unwrap();
        assert_eq!(config.profile, RecordProfile::CloudFront);
        assert_eq!(
            config.delivery_stream_name.as_deref(),
            Some(DEFAULT_DELIVERY_STREAM_NAME)
        );
    }

    #[test]
    fn test_resolve_cloudfront_stream_override() {
        let config = Config::resolve(
            Some("cloudfront".to_string()),
            Some("custom-stream".to_string()),
        )
        .unwrap();
        assert_eq!(config.delivery_stream_name.as_deref(), Some("custom-stream"));
    }

    #[test]
    fn test_resolve_forwarded_for_without_stream() {
        let config = Config::resolve(Some("forwarded-for".to_string()), Some(String::new())).unwrap();
        assert_eq!(config.profile, RecordProfile::ForwardedFor);
        assert_eq!(config.delivery_stream_name, None);
    }

    #[test]
    fn test_resolve_empty_profile_uses_default() {
        let config = Config::resolve(Some("  ".to_string()), None).unwrap();
        assert_eq!(config.profile, RecordProfile::CloudFront);
    }

    #[sealed_test(env = [
        ("ANALYTICS_RECORD_PROFILE", "forwarded-for"),
        ("ANALYTICS_DELIVERY_STREAM_NAME", "my-stream"),
    ])]
    fn test_from_env_forwarded_for() {
        let config = Config::from_env().unwrap();
        assert_eq!(config.profile, RecordProfile::ForwardedFor);
        assert_eq!(config.delivery_stream_name.as_deref(), Some("my-stream"));
    }

    #[sealed_test(env = [
        ("ANALYTICS_RECORD_PROFILE", "kinesis"),
    ])]
    fn test_from_env_unknown_profile() {
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::UnknownProfile(_))
        ));
    }

    #[sealed_test]
    fn test_from_env_unset() {
        std::env::remove_var(ENV_VAR_RECORD_PROFILE);
        std::env::remove_var(ENV_VAR_DELIVERY_STREAM_NAME);
        let config = Config::from_env().unwrap();
        assert_eq!(config.profile, RecordProfile::CloudFront);
        assert_eq!(
            config.delivery_stream_name.as_deref(),
            Some(DEFAULT_DELIVERY_STREAM_NAME)
        );
    }
}
