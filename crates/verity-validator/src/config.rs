//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the validation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Maximum number of chain steps per top-level validation. Bounds
    /// worst-case chain length and terminates cyclic chains.
    pub max_steps: u32,
    /// Upper bound on a single certificate fetch. A fetch that exceeds it
    /// resolves the chain step to a fetch-timeout failure.
    pub fetch_timeout_ms: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_steps: 10,
            fetch_timeout_ms: 4_000,
        }
    }
}

impl ValidatorConfig {
    /// The fetch timeout as a [`Duration`].
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}
