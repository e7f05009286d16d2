//! Per-level route hooks.
//!
//! # Responsibilities
//! - Define the `execute` / `clean` / `save` contract of a route type
//! - Carry the navigation context handed to each hook
//!
//! # Design Decisions
//! - Hooks never chain to their parent; `Route::exec` and `Route::cleanup`
//!   decide which levels run
//! - Every method defaults to a no-op so a type only overrides what it
//!   allocates
//! - Each type owns its own hook object; an ancestor's hooks are never
//!   reached through a subtype

use async_trait::async_trait;
use std::fmt;

use crate::routing::hierarchy::RouteType;
use crate::routing::route::{NavigationArgs, Route};

/// Error returned by a failing hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a single hook invocation.
pub type HookResult = Result<(), HookError>;

/// The hook being invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPhase {
    Execute,
    Clean,
    Save,
}

impl HookPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookPhase::Execute => "execute",
            HookPhase::Clean => "clean",
            HookPhase::Save => "save",
        }
    }
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context handed to [`RouteHooks::execute`].
#[derive(Debug, Clone, Copy)]
pub struct ExecuteContext<'a> {
    /// The route being activated.
    pub route: &'a Route,
    /// The level of `route`'s ancestor chain being set up.
    pub route_type: &'a RouteType,
    /// The route that was current before this navigation.
    pub previous_route: Option<&'a Route>,
    /// Arguments supplied by the navigation source.
    pub args: &'a NavigationArgs,
}

/// Context handed to [`RouteHooks::clean`] and [`RouteHooks::save`].
#[derive(Debug, Clone, Copy)]
pub struct CleanContext<'a> {
    /// The route being deactivated.
    pub route: &'a Route,
    /// The level of `route`'s ancestor chain being torn down.
    pub route_type: &'a RouteType,
    /// The route about to become current, `None` on teardown.
    pub next_route: Option<&'a Route>,
}

/// Work attached to one level of the route-type hierarchy.
#[async_trait]
pub trait RouteHooks: Send + Sync {
    /// Set this level up.
    async fn execute(&self, _ctx: ExecuteContext<'_>) -> HookResult {
        Ok(())
    }

    /// Tear this level down.
    async fn clean(&self, _ctx: CleanContext<'_>) -> HookResult {
        Ok(())
    }

    /// Persist level state before it may be cleaned. Only invoked when the
    /// caller asks for it through `CleanupOptions::with_save`.
    async fn save(&self, _ctx: CleanContext<'_>) -> HookResult {
        Ok(())
    }
}

/// The type-local empty hook set installed for types that register none.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl RouteHooks for NoopHooks {}

/// Hooks that only report each invocation through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHooks;

#[async_trait]
impl RouteHooks for TracingHooks {
    async fn execute(&self, ctx: ExecuteContext<'_>) -> HookResult {
        tracing::info!(
            route_id = %ctx.route.id(),
            level = ctx.route_type.name(),
            previous = ctx.previous_route.map(|r| r.route_type_name()).unwrap_or("-"),
            args = ?ctx.args.as_slice(),
            "execute"
        );
        Ok(())
    }

    async fn clean(&self, ctx: CleanContext<'_>) -> HookResult {
        tracing::info!(
            route_id = %ctx.route.id(),
            level = ctx.route_type.name(),
            next = ctx.next_route.map(|r| r.route_type_name()).unwrap_or("-"),
            "clean"
        );
        Ok(())
    }
}
