//! Runtime configuration.
//!
//! Loaded from layered sources, later layers winning per key:
//!
//! 1. Default values (lowest priority)
//! 2. Global config (`~/.vox/config.toml`)
//! 3. Project config (`./vox.toml`)
//! 4. Environment variables (`VOX_*`, highest priority)

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::{load, load_from};
pub use types::{PathsSection, TimeoutsConfig, VoxConfig, WorkerSection};
