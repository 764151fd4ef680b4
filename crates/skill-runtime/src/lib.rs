//! # Skill Runtime
//!
//! Process-level wiring for the skill gateway: environment configuration,
//! logging setup and the bundled echo skill used by the `skill-runtime`
//! binary.

pub mod echo;
pub mod env;

pub use echo::EchoSkill;
pub use env::{apply_env, config_from_env, EnvError};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";
