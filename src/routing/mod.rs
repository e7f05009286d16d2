//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Composition (at startup):
//!     route-type declarations (builder or config)
//!     → hierarchy.rs (resolve parents, precompute ancestor chains)
//!     → Freeze as immutable RouteRegistry
//!
//! Navigation:
//!     navigation source (next route, args)
//!     → driver.rs (serialize, own the current route)
//!     → route.rs cleanup (outgoing route, leaf → divergence point)
//!     → swap current route
//!     → route.rs exec (incoming route, divergence point → leaf)
//!     → hooks.rs (per-level execute / clean / save)
//! ```
//!
//! # Design Decisions
//! - Hierarchy compiled at startup, immutable at runtime
//! - Only levels below the divergence point are torn down or set up
//! - Hooks run strictly one after another, never concurrently
//! - Failures propagate to the navigation source; no rollback, no retry

pub mod driver;
pub mod error;
pub mod hierarchy;
pub mod hooks;
pub mod route;

pub use driver::{BoundRoute, Transition, TransitionDriver};
pub use error::{ConfigurationError, TransitionError};
pub use hierarchy::{RouteRegistry, RouteRegistryBuilder, RouteType, RouteTypeId, ROOT_TYPE_NAME};
pub use hooks::{
    CleanContext, ExecuteContext, HookError, HookPhase, HookResult, NoopHooks, RouteHooks,
    TracingHooks,
};
pub use route::{CleanupOptions, NavigationArgs, Route};
