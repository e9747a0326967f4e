//! # Runtime Configuration
//!
//! Coroutine runtime settings read from the environment.
//!
//! ### `HTTPMED_STACK_SIZE`
//!
//! Stack size of every handler coroutine, decimal (`65536`) or hex
//! (`0x10000`). Default `0x10000` (64 KB). Unparseable values fall back to
//! the default.
//!
//! ```rust
//! use httpmediator::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! config.apply();
//! assert!(config.stack_size > 0);
//! ```

use std::env;
use tracing::{debug, warn};

pub const DEFAULT_STACK_SIZE: usize = 0x10000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Coroutine stack size in bytes
    pub stack_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

/// `"0x4000"` or `"16384"`.
#[must_use]
pub fn parse_stack_size(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    };
    parsed.filter(|&n| n > 0)
}

impl RuntimeConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let stack_size = match env::var("HTTPMED_STACK_SIZE") {
            Ok(val) => parse_stack_size(&val).unwrap_or_else(|| {
                warn!(value = %val, default = DEFAULT_STACK_SIZE, "Invalid HTTPMED_STACK_SIZE, using default");
                DEFAULT_STACK_SIZE
            }),
            Err(_) => DEFAULT_STACK_SIZE,
        };
        RuntimeConfig { stack_size }
    }

    /// Configure the `may` runtime. Call before registering handlers.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
        debug!(stack_size = self.stack_size, "Coroutine stack size applied");
    }
}
