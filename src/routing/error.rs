//! Error definitions for the routing subsystem.

use thiserror::Error;
use uuid::Uuid;

use crate::routing::hooks::HookError;

/// A malformed route-type hierarchy.
///
/// Raised while a [`RouteRegistry`](crate::routing::RouteRegistry) is built.
/// A well-formed hierarchy never produces one, so these are treated as
/// programming defects and are not recoverable at runtime.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A route type was declared with an empty name.
    #[error("route type name must not be empty")]
    EmptyName,

    /// A route type tried to take the name of the sentinel root.
    #[error("route type `{0}` is reserved for the hierarchy root")]
    RootRedefined(String),

    /// Two declarations share one name.
    #[error("route type `{0}` is defined more than once")]
    DuplicateType(String),

    /// A declaration names a parent that was never declared.
    #[error("route type `{name}` declares unknown parent `{parent}`")]
    UnknownParent { name: String, parent: String },

    /// Walking parent links from this type never reached the root.
    #[error("route type `{0}` does not reach the root; its parent chain forms a cycle")]
    Cycle(String),

    /// Hooks were registered for a name no declaration uses.
    #[error("hooks registered for undefined route type `{0}`")]
    UnknownType(String),
}

/// Failure of a single navigation.
///
/// Levels that completed before the failing hook are not rolled back.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// A route was requested for a type the registry does not hold.
    #[error("unknown route type `{0}`")]
    UnknownRouteType(String),

    /// A route built against another registry was handed to a driver.
    #[error("route {route} was created for a different route registry")]
    ForeignRoute { route: Uuid },

    #[error("execute hook of route type `{route_type}` failed: {source}")]
    Execute {
        route_type: String,
        #[source]
        source: HookError,
    },

    #[error("clean hook of route type `{route_type}` failed: {source}")]
    Clean {
        route_type: String,
        #[source]
        source: HookError,
    },

    #[error("save hook of route type `{route_type}` failed: {source}")]
    Save {
        route_type: String,
        #[source]
        source: HookError,
    },
}

impl TransitionError {
    /// Name of the route type whose hook failed, if a hook failed.
    pub fn route_type(&self) -> Option<&str> {
        match self {
            TransitionError::Execute { route_type, .. }
            | TransitionError::Clean { route_type, .. }
            | TransitionError::Save { route_type, .. } => Some(route_type),
            _ => None,
        }
    }
}
