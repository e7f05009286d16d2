//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → TransitConfig (validated, immutable)
//!     → RouteRegistry::from_config (compiled hierarchy)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the hierarchy is fixed at composition
//!   time
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks; cycles
//!   are left to the registry, which walks the actual chains

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ObservabilityConfig;
pub use schema::RouteTypeConfig;
pub use schema::TransitConfig;
