//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Route exec / cleanup / driver:
//!     → tracing events and spans (navigate span, one event per hook)
//!     → metrics.rs (transition and hook counters)
//!
//! Binary startup:
//!     → logging.rs installs the global subscriber
//! ```
//!
//! # Design Decisions
//! - Library code emits events and never installs a subscriber itself
//! - Counters go through the `metrics` facade; without a recorder they are
//!   no-ops
//! - Log level comes from `RUST_LOG` first, then the config file

pub mod logging;
pub mod metrics;
