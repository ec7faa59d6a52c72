//! Codec configuration
//!
//! `CodecConfig` controls the parts of encoding and decoding that are not
//! fixed by the protocol: output formatting and an optional cap on batch
//! size.
//!
//! # Environment Variables
//!
//! `CodecConfig::from_env()` reads:
//! - `RPCWIRE_PRETTY`: `true`/`1` to indent encoded JSON
//! - `RPCWIRE_MAX_BATCH_SIZE`: maximum number of items in a batch
//!
//! # Examples
//!
//! ```rust
//! use rpcwire_core::CodecConfig;
//!
//! let config = CodecConfig::new()
//!     .with_pretty(true)
//!     .with_max_batch_size(100);
//!
//! assert!(config.pretty);
//! assert_eq!(config.max_batch_size, Some(100));
//! ```

use std::env;

pub const PRETTY_ENV: &str = "RPCWIRE_PRETTY";
pub const MAX_BATCH_SIZE_ENV: &str = "RPCWIRE_MAX_BATCH_SIZE";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecConfig {
    /// Indent encoded JSON
    pub pretty: bool,

    /// Largest batch accepted by decode and produced by encode
    ///
    /// A larger decoded batch fails the whole call with `InvalidMessage`; a
    /// larger encoded batch fails with `GenericError`. `None` means no limit.
    pub max_batch_size: Option<usize>,
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from environment variables
    ///
    /// Unset variables keep their defaults. Values that fail to parse are
    /// logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var(PRETTY_ENV) {
            match parse_flag(&raw) {
                Some(pretty) => config.pretty = pretty,
                None => {
                    tracing::warn!(variable = PRETTY_ENV, value = %raw, "Ignoring invalid flag")
                }
            }
        }

        if let Ok(raw) = env::var(MAX_BATCH_SIZE_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(limit) => config.max_batch_size = Some(limit),
                Err(e) => tracing::warn!(
                    variable = MAX_BATCH_SIZE_ENV,
                    value = %raw,
                    error = %e,
                    "Ignoring invalid batch size limit"
                ),
            }
        }

        config
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_max_batch_size(mut self, limit: usize) -> Self {
        self.max_batch_size = Some(limit);
        self
    }

    pub fn without_batch_limit(mut self) -> Self {
        self.max_batch_size = None;
        self
    }

    /// Whether a batch of `size` items exceeds the configured limit
    pub(crate) fn exceeds_batch_limit(&self, size: usize) -> bool {
        self.max_batch_size.map_or(false, |limit| size > limit)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert!(!config.pretty);
        assert_eq!(config.max_batch_size, None);
        assert!(!config.exceeds_batch_limit(usize::MAX));
    }

    #[test]
    fn test_builder_chaining() {
        let config = CodecConfig::new()
            .with_pretty(true)
            .with_max_batch_size(2);
        assert!(config.pretty);
        assert!(!config.exceeds_batch_limit(2));
        assert!(config.exceeds_batch_limit(3));

        let unlimited = config.without_batch_limit();
        assert!(!unlimited.exceeds_batch_limit(3));
    }

    #[test]
    fn test_parse_flag() {
        for raw in ["1", "true", " TRUE ", "yes", "on"] {
            assert_eq!(parse_flag(raw), Some(true));
        }
        for raw in ["0", "false", "No", "off"] {
            assert_eq!(parse_flag(raw), Some(false));
        }
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_from_env() {
        // Only this test touches these variables
        env::set_var(PRETTY_ENV, "true");
        env::set_var(MAX_BATCH_SIZE_ENV, "not-a-number");
        let config = CodecConfig::from_env();
        assert!(config.pretty);
        assert_eq!(config.max_batch_size, None);

        env::set_var(MAX_BATCH_SIZE_ENV, "25");
        assert_eq!(CodecConfig::from_env().max_batch_size, Some(25));

        env::remove_var(PRETTY_ENV);
        env::remove_var(MAX_BATCH_SIZE_ENV);
        assert_eq!(CodecConfig::from_env(), CodecConfig::default());
    }
}
