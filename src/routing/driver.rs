//! Transition driver.
//!
//! Owns the single "current route" and sequences every navigation as
//! cleanup-then-exec.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::observability::metrics;
use crate::routing::error::TransitionError;
use crate::routing::hierarchy::RouteRegistry;
use crate::routing::route::{CleanupOptions, NavigationArgs, Route};

/// Report of one completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub previous: Option<Uuid>,
    pub next: Uuid,
    /// Route types whose `clean` ran, leaf first.
    pub cleaned: Vec<String>,
    /// Route types whose `execute` ran, root first.
    pub executed: Vec<String>,
}

#[derive(Debug, Default)]
struct TransitionState {
    current: Option<Arc<Route>>,
}

/// Sequences navigations over one route registry.
#[derive(Debug)]
pub struct TransitionDriver {
    registry: Arc<RouteRegistry>,
    state: Mutex<TransitionState>,
    generation: AtomicU64,
}

impl TransitionDriver {
    pub fn new(registry: Arc<RouteRegistry>) -> Self {
        Self {
            registry,
            state: Mutex::new(TransitionState::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn registry(&self) -> &Arc<RouteRegistry> {
        &self.registry
    }

    /// The route installed by the most recent navigation.
    pub async fn current(&self) -> Option<Arc<Route>> {
        self.state.lock().await.current.clone()
    }

    /// Number of navigations that got past cleanup.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn navigate(
        &self,
        next: Arc<Route>,
        args: NavigationArgs,
    ) -> Result<Transition, TransitionError> {
        self.navigate_with(next, args, CleanupOptions::default())
            .await
    }

    /// Clean up the current route against `next`, install `next`, then
    /// execute it against the outgoing route.
    ///
    /// A failing cleanup leaves the current route in place. A failing exec
    /// leaves `next` installed; nothing is retried or rolled back. A forced
    /// cleanup also tears down the levels `next` shares, so exec brings them
    /// up again.
    ///
    /// `clean` and `save` hooks run while the driver's state lock is held and
    /// must not navigate through this driver, or the navigation deadlocks.
    /// `execute` hooks run unlocked and may navigate.
    pub async fn navigate_with(
        &self,
        next: Arc<Route>,
        args: NavigationArgs,
        options: CleanupOptions,
    ) -> Result<Transition, TransitionError> {
        if !next.belongs_to(&self.registry) {
            return Err(TransitionError::ForeignRoute { route: next.id() });
        }

        let span = tracing::debug_span!(
            "navigate",
            next = next.route_type_name(),
            route_id = %next.id()
        );

        async move {
            // Hold the state lock through cleanup and the swap only; exec runs
            // unlocked so a hook may start a follow-up navigation.
            let (previous, cleaned, generation) = {
                let mut state = self.state.lock().await;
                let cleaned = match state.current.as_ref() {
                    Some(current) => match current.cleanup_with(Some(next.as_ref()), options).await {
                        Ok(cleaned) => cleaned,
                        Err(err) => {
                            metrics::record_transition("cleanup_failed");
                            tracing::warn!(error = %err, "cleanup failed, keeping current route");
                            return Err(err);
                        }
                    },
                    None => Vec::new(),
                };
                let previous = state.current.replace(next.clone());
                let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                (previous, cleaned, generation)
            };

            let executed = match next.exec(previous.as_deref(), &args).await {
                Ok(executed) => executed,
                Err(err) => {
                    metrics::record_transition("exec_failed");
                    tracing::warn!(error = %err, "exec failed");
                    return Err(err);
                }
            };

            if self.generation() != generation {
                tracing::warn!(
                    generation,
                    latest = self.generation(),
                    "route finished executing after being superseded"
                );
            }

            metrics::record_transition("ok");
            let transition = Transition {
                previous: previous.as_ref().map(|route| route.id()),
                next: next.id(),
                cleaned: self.registry.names(&cleaned),
                executed: self.registry.names(&executed),
            };
            tracing::debug!(
                cleaned = ?transition.cleaned,
                executed = ?transition.executed,
                "navigation complete"
            );
            Ok(transition)
        }
        .instrument(span)
        .await
    }

    /// Run a navigation on the tokio runtime without waiting for it.
    pub fn spawn_navigate(
        self: &Arc<Self>,
        next: Arc<Route>,
        args: NavigationArgs,
    ) -> JoinHandle<Result<Transition, TransitionError>> {
        let driver = self.clone();
        tokio::spawn(async move { driver.navigate(next, args).await })
    }

    /// Clean up the current route against nothing and clear it. Returns the
    /// cleaned route types, leaf first.
    pub async fn teardown(&self) -> Result<Vec<String>, TransitionError> {
        let mut state = self.state.lock().await;
        let Some(current) = state.current.clone() else {
            return Ok(Vec::new());
        };

        let cleaned = current.cleanup(None).await?;
        state.current = None;
        tracing::debug!(route_id = %current.id(), "current route torn down");
        Ok(self.registry.names(&cleaned))
    }

    /// Bind `route` to this driver, yielding a callable navigation target.
    pub fn bind(self: &Arc<Self>, route: Arc<Route>) -> BoundRoute {
        BoundRoute {
            driver: self.clone(),
            route,
        }
    }
}

/// A route paired with the driver that navigates to it.
#[derive(Debug, Clone)]
pub struct BoundRoute {
    driver: Arc<TransitionDriver>,
    route: Arc<Route>,
}

impl BoundRoute {
    pub fn route(&self) -> &Arc<Route> {
        &self.route
    }

    /// Navigate to the bound route with fresh arguments.
    pub async fn call(&self, args: NavigationArgs) -> Result<Transition, TransitionError> {
        self.driver.navigate(self.route.clone(), args).await
    }
}
