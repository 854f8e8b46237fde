//! Command line configuration.

use std::time::Duration;

use clap::Parser;
use stick_core::{MapperConfig, DEFAULT_DEADZONE, DEFAULT_MAPPER_CONFIG, MAX_STICK_POSITION_ABS};
use thiserror::Error;

use crate::channel::is_ws_endpoint;
use crate::input::DEFAULT_QUEUE_CAPACITY;
use crate::reconnect::{BackoffConfig, DEFAULT_BACKOFF};

/// Command server the bridge connects to when none is given.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:5000";

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Bridge remote WebSocket text commands to virtual flight sticks"
)]
pub struct Args {
    /// WebSocket URL of the command server
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Events buffered before the connection stops reading
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Analog deadzone for local joystick samples, in [0, 1)
    #[arg(long, default_value_t = DEFAULT_DEADZONE)]
    pub deadzone: f32,

    /// Stick units for full deflection
    #[arg(long, default_value_t = MAX_STICK_POSITION_ABS)]
    pub max_stick: i16,

    /// First reconnect delay in milliseconds
    #[arg(long, default_value_t = DEFAULT_BACKOFF.min.as_millis() as u64)]
    pub backoff_min_ms: u64,

    /// Reconnect delay cap in milliseconds
    #[arg(long, default_value_t = DEFAULT_BACKOFF.max.as_millis() as u64)]
    pub backoff_max_ms: u64,

    /// Stop after the first connection ends instead of reconnecting
    #[arg(long)]
    pub no_reconnect: bool,

    /// Read `left <x> <y>` / `right <x> <y>` joystick samples from stdin
    #[arg(long)]
    pub local_stick: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Rejected command line values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("endpoint `{0}` is not a ws:// URL")]
    Endpoint(String),
    #[error("deadzone {0} is outside [0, 1)")]
    Deadzone(f32),
    #[error("max stick {0} must be positive")]
    MaxStick(i16),
    #[error("queue capacity must be at least 1")]
    QueueCapacity,
    #[error("backoff minimum must be non-zero")]
    ZeroBackoff,
    #[error("backoff minimum {min:?} exceeds maximum {max:?}")]
    Backoff { min: Duration, max: Duration },
}

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    pub endpoint: String,
    pub queue_capacity: usize,
    pub mapper: MapperConfig,
    pub backoff: BackoffConfig,
    pub reconnect: bool,
    pub local_stick: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            mapper: DEFAULT_MAPPER_CONFIG,
            backoff: DEFAULT_BACKOFF,
            reconnect: true,
            local_stick: false,
        }
    }
}

impl Args {
    /// Validate the arguments into a [`BridgeConfig`].
    pub fn into_config(self) -> Result<BridgeConfig, ConfigError> {
        if !is_ws_endpoint(&self.endpoint) {
            return Err(ConfigError::Endpoint(self.endpoint));
        }
        if !(0.0..1.0).contains(&self.deadzone) {
            return Err(ConfigError::Deadzone(self.deadzone));
        }
        if self.max_stick <= 0 {
            return Err(ConfigError::MaxStick(self.max_stick));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::QueueCapacity);
        }

        let backoff = BackoffConfig {
            min: Duration::from_millis(self.backoff_min_ms),
            max: Duration::from_millis(self.backoff_max_ms),
        };
        if backoff.min.is_zero() {
            return Err(ConfigError::ZeroBackoff);
        }
        if backoff.min > backoff.max {
            return Err(ConfigError::Backoff {
                min: backoff.min,
                max: backoff.max,
            });
        }

        Ok(BridgeConfig {
            endpoint: self.endpoint,
            queue_capacity: self.queue_capacity,
            mapper: MapperConfig {
                deadzone: self.deadzone,
                max_stick: self.max_stick,
                ..DEFAULT_MAPPER_CONFIG
            },
            backoff,
            reconnect: !self.no_reconnect,
            local_stick: self.local_stick,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<BridgeConfig, ConfigError> {
        let mut argv = vec!["ws-to-stick"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap().into_config()
    }

    #[test]
    fn test_defaults() {
        assert_eq!(parse(&[]), Ok(BridgeConfig::default()));
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            "-e",
            "ws://10.0.0.2:9000",
            "--deadzone",
            "0.1",
            "--max-stick",
            "1000",
            "--queue-capacity",
            "4",
            "--backoff-min-ms",
            "100",
            "--backoff-max-ms",
            "100",
            "--no-reconnect",
            "--local-stick",
        ])
        .unwrap();

        assert_eq!(config.endpoint, "ws://10.0.0.2:9000");
        assert_eq!(config.mapper.deadzone, 0.1);
        assert_eq!(config.mapper.max_stick, 1000);
        assert_eq!(config.mapper.yaw_step, DEFAULT_MAPPER_CONFIG.yaw_step);
        assert_eq!(config.queue_capacity, 4);
        assert_eq!(config.backoff.min, Duration::from_millis(100));
        assert!(!config.reconnect);
        assert!(config.local_stick);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert_eq!(
            parse(&["--endpoint", "http://example.com"]),
            Err(ConfigError::Endpoint("http://example.com".to_string()))
        );
        assert_eq!(
            parse(&["--deadzone", "1.0"]),
            Err(ConfigError::Deadzone(1.0))
        );
        assert_eq!(
            parse(&["--deadzone=-0.1"]),
            Err(ConfigError::Deadzone(-0.1))
        );
        assert_eq!(parse(&["--max-stick", "0"]), Err(ConfigError::MaxStick(0)));
        assert_eq!(
            parse(&["--queue-capacity", "0"]),
            Err(ConfigError::QueueCapacity)
        );
        assert_eq!(
            parse(&["--backoff-min-ms", "0"]),
            Err(ConfigError::ZeroBackoff)
        );
        assert!(matches!(
            parse(&["--backoff-min-ms", "5000", "--backoff-max-ms", "1000"]),
            Err(ConfigError::Backoff { .. })
        ));
    }

    #[test]
    fn test_verbosity_counts() {
        let args = Args::try_parse_from(["ws-to-stick", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }
}
