//! Password hashing for user accounts
//!
//! Login state itself lives in the session (see [`crate::session::auth`]);
//! this module only turns plaintext passwords into Argon2id PHC strings and
//! checks them again.
//!
//! ```rust,ignore
//! use snippetbox::auth::{PasswordConfig, PasswordHasher};
//!
//! let hasher = PasswordHasher::new(&PasswordConfig::default())?;
//! let hash = hasher.hash("pa$$word")?;
//! assert!(hasher.verify("pa$$word", &hash)?);
//! ```

pub mod config;
pub mod password;

pub use config::PasswordConfig;
pub use password::PasswordHasher;
