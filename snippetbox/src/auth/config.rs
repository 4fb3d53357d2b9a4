//! Password hashing configuration

use serde::{Deserialize, Serialize};

/// Argon2id cost parameters
///
/// Defaults follow the OWASP recommendation for Argon2id.
///
/// ```toml
/// [password]
/// memory_cost_kib = 65536
/// time_cost = 3
/// parallelism = 4
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    #[serde(default = "default_memory_cost")]
    pub memory_cost_kib: u32,

    /// Time cost / iterations (default: 3)
    #[serde(default = "default_time_cost")]
    pub time_cost: u32,

    /// Parallelism degree (default: 4)
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl PasswordConfig {
    /// Cheapest parameters Argon2 accepts, for tests
    #[cfg(test)]
    pub fn minimal() -> Self {
        Self {
            memory_cost_kib: argon2::Params::MIN_M_COST,
            time_cost: argon2::Params::MIN_T_COST,
            parallelism: argon2::Params::MIN_P_COST,
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost_kib: default_memory_cost(),
            time_cost: default_time_cost(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_memory_cost() -> u32 {
    65536 // 64 MiB
}

fn default_time_cost() -> u32 {
    3
}

fn default_parallelism() -> u32 {
    4
}
