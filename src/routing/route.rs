//! Route instances and the activation/deactivation diff.
//!
//! # Responsibilities
//! - Bind an instance to one route type and cache its ancestor chain
//! - `exec`: set up the levels the previous route does not share, root first
//! - `cleanup`: tear down the levels the next route does not share, leaf first
//!
//! # Design Decisions
//! - Both walks recurse from the leaf toward the root and await every hook
//!   before the next level proceeds
//! - "Instance of" is ancestor-chain membership; a missing or foreign
//!   neighbour shares nothing
//! - Each instance tracks how deep its chain is currently set up, so a level
//!   is never cleaned twice without an `exec` in between

use futures_util::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::observability::metrics;
use crate::routing::error::TransitionError;
use crate::routing::hierarchy::{RouteRegistry, RouteType, RouteTypeId};
use crate::routing::hooks::{CleanContext, ExecuteContext, HookPhase};

/// Arguments a navigation source passes along with the target route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationArgs(Vec<String>);

impl NavigationArgs {
    pub fn new(args: Vec<String>) -> Self {
        Self(args)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for NavigationArgs {
    fn from(args: Vec<String>) -> Self {
        Self(args)
    }
}

impl<S: Into<String>> FromIterator<S> for NavigationArgs {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Options for [`Route::cleanup_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupOptions {
    force: bool,
    save: bool,
}

impl CleanupOptions {
    /// Tear down every non-root level, even the ones the next route shares.
    pub fn forced() -> Self {
        Self {
            force: true,
            save: false,
        }
    }

    /// Invoke each visited level's `save` hook before deciding whether to
    /// clean it.
    pub fn with_save(mut self) -> Self {
        self.save = true;
        self
    }

    pub fn is_forced(&self) -> bool {
        self.force
    }

    pub fn saves(&self) -> bool {
        self.save
    }
}

/// An activatable instance of one route type.
#[derive(Debug)]
pub struct Route {
    id: Uuid,
    registry: Arc<RouteRegistry>,
    route_type: RouteTypeId,
    chain: Arc<[RouteTypeId]>,
    context: Option<serde_json::Value>,
    /// Number of chain levels currently set up on this instance.
    active_depth: AtomicUsize,
}

impl Route {
    /// Create a route of the type registered under `type_name`.
    pub fn new(registry: &Arc<RouteRegistry>, type_name: &str) -> Result<Self, TransitionError> {
        let route_type = registry
            .lookup(type_name)
            .ok_or_else(|| TransitionError::UnknownRouteType(type_name.to_string()))?;
        Ok(Self::bind(registry, route_type))
    }

    /// Create a route from a type handle of `registry`.
    pub fn of_type(registry: &Arc<RouteRegistry>, id: RouteTypeId) -> Result<Self, TransitionError> {
        let route_type = registry
            .get(id)
            .ok_or_else(|| TransitionError::UnknownRouteType(format!("#{}", id.index())))?;
        Ok(Self::bind(registry, route_type))
    }

    fn bind(registry: &Arc<RouteRegistry>, route_type: &RouteType) -> Self {
        Self {
            id: Uuid::new_v4(),
            registry: registry.clone(),
            route_type: route_type.id(),
            chain: route_type.ancestor_chain().clone(),
            context: None,
            active_depth: AtomicUsize::new(0),
        }
    }

    /// Attach an activation context payload.
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn route_type(&self) -> RouteTypeId {
        self.route_type
    }

    pub fn route_type_name(&self) -> &str {
        self.registry.level(self.route_type).name()
    }

    pub fn ancestor_chain(&self) -> &[RouteTypeId] {
        &self.chain
    }

    pub fn context(&self) -> Option<&serde_json::Value> {
        self.context.as_ref()
    }

    pub fn registry(&self) -> &Arc<RouteRegistry> {
        &self.registry
    }

    /// Number of chain levels (root included) currently set up.
    pub fn active_depth(&self) -> usize {
        self.active_depth.load(Ordering::SeqCst)
    }

    pub fn belongs_to(&self, registry: &Arc<RouteRegistry>) -> bool {
        Arc::ptr_eq(&self.registry, registry)
    }

    /// True if this route's type is `ty` or a descendant of it.
    pub fn is_instance_of(&self, ty: RouteTypeId) -> bool {
        self.registry.is_subtype(self.route_type, ty)
    }

    /// Divergence test against a neighbouring route.
    fn shares_level(&self, other: Option<&Route>, level: RouteTypeId) -> bool {
        other.is_some_and(|other| other.belongs_to(&self.registry) && other.is_instance_of(level))
    }

    /// `other` is a distinct instance whose own type is exactly `level`.
    fn is_sibling_instance(&self, other: Option<&Route>, level: RouteTypeId) -> bool {
        other.is_some_and(|other| {
            other.belongs_to(&self.registry) && other.route_type == level && other.id != self.id
        })
    }

    /// `previous` is an instance of the level at `depth` and still has it
    /// set up.
    fn inherits_level(&self, previous: Option<&Route>, depth: usize) -> bool {
        self.shares_level(previous, self.chain[depth - 1])
            && previous.is_some_and(|previous| previous.active_depth() >= depth)
    }

    /// Bring this route fully active, reusing whatever `previous` already
    /// set up. Returns the levels whose `execute` ran, root first.
    pub async fn exec(
        &self,
        previous: Option<&Route>,
        args: &NavigationArgs,
    ) -> Result<Vec<RouteTypeId>, TransitionError> {
        let mut executed = Vec::new();
        self.exec_level(previous, args, self.chain.len(), &mut executed)
            .await?;
        Ok(executed)
    }

    fn exec_level<'a>(
        &'a self,
        previous: Option<&'a Route>,
        args: &'a NavigationArgs,
        depth: usize,
        executed: &'a mut Vec<RouteTypeId>,
    ) -> BoxFuture<'a, Result<(), TransitionError>> {
        async move {
            if depth <= 1 {
                self.active_depth.store(1, Ordering::SeqCst);
                return Ok(());
            }

            let most_derived = self.chain[depth - 1];
            let is_same_type = previous.is_some_and(|previous| {
                previous.belongs_to(&self.registry) && previous.route_type == most_derived
            });

            // A more derived previous route already set this level and every
            // level above it up.
            if self.inherits_level(previous, depth) && !is_same_type {
                self.active_depth.store(depth, Ordering::SeqCst);
                return Ok(());
            }

            // Levels the previous route never brought up, or already tore
            // down, are executed again.
            if self.inherits_level(previous, depth - 1) {
                self.active_depth.store(depth - 1, Ordering::SeqCst);
            } else {
                self.exec_level(previous, args, depth - 1, executed).await?;
            }

            self.run_execute(most_derived, previous, args).await?;
            self.active_depth.store(depth, Ordering::SeqCst);
            executed.push(most_derived);
            Ok(())
        }
        .boxed()
    }

    /// Tear down the levels `next` does not share. Returns the levels whose
    /// `clean` ran, leaf first.
    pub async fn cleanup(&self, next: Option<&Route>) -> Result<Vec<RouteTypeId>, TransitionError> {
        self.cleanup_with(next, CleanupOptions::default()).await
    }

    pub async fn cleanup_with(
        &self,
        next: Option<&Route>,
        options: CleanupOptions,
    ) -> Result<Vec<RouteTypeId>, TransitionError> {
        let mut cleaned = Vec::new();
        self.cleanup_level(next, options, self.chain.len(), &mut cleaned)
            .await?;
        Ok(cleaned)
    }

    fn cleanup_level<'a>(
        &'a self,
        next: Option<&'a Route>,
        options: CleanupOptions,
        depth: usize,
        cleaned: &'a mut Vec<RouteTypeId>,
    ) -> BoxFuture<'a, Result<(), TransitionError>> {
        async move {
            if depth <= 1 {
                return Ok(());
            }

            let most_derived = self.chain[depth - 1];
            if options.save {
                self.run_save(most_derived, next).await?;
            }

            // The next route keeps this level and everything above it.
            if !options.force
                && self.shares_level(next, most_derived)
                && !self.is_sibling_instance(next, most_derived)
            {
                return Ok(());
            }

            let parent = self.chain[depth - 2];

            // Levels deeper than the active depth were never set up, or are
            // already gone.
            if depth <= self.active_depth() {
                self.run_clean(most_derived, next).await?;
                self.active_depth.store(depth - 1, Ordering::SeqCst);
                cleaned.push(most_derived);
            }

            if options.force || !self.shares_level(next, parent) {
                self.cleanup_level(next, options, depth - 1, cleaned).await?;
            }
            Ok(())
        }
        .boxed()
    }

    async fn run_execute(
        &self,
        level: RouteTypeId,
        previous: Option<&Route>,
        args: &NavigationArgs,
    ) -> Result<(), TransitionError> {
        let route_type = self.registry.level(level);
        tracing::debug!(route_id = %self.id, level = route_type.name(), "executing route level");
        metrics::record_hook(HookPhase::Execute);

        let ctx = ExecuteContext {
            route: self,
            route_type,
            previous_route: previous,
            args,
        };
        route_type.hooks().execute(ctx).await.map_err(|source| {
            metrics::record_hook_failure(HookPhase::Execute);
            TransitionError::Execute {
                route_type: route_type.name().to_string(),
                source,
            }
        })
    }

    async fn run_clean(&self, level: RouteTypeId, next: Option<&Route>) -> Result<(), TransitionError> {
        let route_type = self.registry.level(level);
        tracing::debug!(route_id = %self.id, level = route_type.name(), "cleaning route level");
        metrics::record_hook(HookPhase::Clean);

        let ctx = CleanContext {
            route: self,
            route_type,
            next_route: next,
        };
        route_type.hooks().clean(ctx).await.map_err(|source| {
            metrics::record_hook_failure(HookPhase::Clean);
            TransitionError::Clean {
                route_type: route_type.name().to_string(),
                source,
            }
        })
    }

    async fn run_save(&self, level: RouteTypeId, next: Option<&Route>) -> Result<(), TransitionError> {
        let route_type = self.registry.level(level);
        tracing::trace!(route_id = %self.id, level = route_type.name(), "saving route level");
        metrics::record_hook(HookPhase::Save);

        let ctx = CleanContext {
            route: self,
            route_type,
            next_route: next,
        };
        route_type.hooks().save(ctx).await.map_err(|source| {
            metrics::record_hook_failure(HookPhase::Save);
            TransitionError::Save {
                route_type: route_type.name().to_string(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::hierarchy::ROOT_TYPE_NAME;

    fn registry() -> Arc<RouteRegistry> {
        Arc::new(
            RouteRegistry::builder()
                .route_type("app", ROOT_TYPE_NAME)
                .route_type("section", "app")
                .route_type("page", "section")
                .route_type("detail", "page")
                .route_type("settings", "app")
                .route_type("profile", "settings")
                .route_type("login", ROOT_TYPE_NAME)
                .build()
                .unwrap(),
        )
    }

    fn names(registry: &RouteRegistry, ids: &[RouteTypeId]) -> Vec<String> {
        registry.names(ids)
    }

    async fn active(registry: &Arc<RouteRegistry>, name: &str) -> Route {
        let route = Route::new(registry, name).unwrap();
        route.exec(None, &NavigationArgs::default()).await.unwrap();
        route
    }

    #[tokio::test]
    async fn test_exec_from_nothing_runs_whole_chain() {
        let registry = registry();
        let route = Route::new(&registry, "detail").unwrap();

        let executed = route.exec(None, &NavigationArgs::default()).await.unwrap();

        assert_eq!(
            names(&registry, &executed),
            vec!["app", "section", "page", "detail"]
        );
        assert_eq!(route.active_depth(), 5);
    }

    #[tokio::test]
    async fn test_diff_only_touches_levels_past_shared_prefix() {
        let registry = registry();
        let types: Vec<RouteTypeId> = registry
            .iter()
            .filter(|ty| !ty.is_root())
            .map(|ty| ty.id())
            .collect();

        for &from in &types {
            for &to in &types {
                if from == to {
                    continue;
                }
                let outgoing = Route::of_type(&registry, from).unwrap();
                outgoing.exec(None, &NavigationArgs::default()).await.unwrap();
                let incoming = Route::of_type(&registry, to).unwrap();

                let cleaned = outgoing.cleanup(Some(&incoming)).await.unwrap();
                let executed = incoming
                    .exec(Some(&outgoing), &NavigationArgs::default())
                    .await
                    .unwrap();

                let a = outgoing.ancestor_chain();
                let b = incoming.ancestor_chain();
                let k = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();
                let expected_cleaned: Vec<RouteTypeId> = a[k..].iter().rev().copied().collect();

                assert_eq!(cleaned, expected_cleaned, "clean {:?} -> {:?}", from, to);
                assert_eq!(executed, b[k..].to_vec(), "execute {:?} -> {:?}", from, to);
            }
        }
    }

    #[tokio::test]
    async fn test_same_instance_only_reexecutes_leaf() {
        let registry = registry();
        let route = active(&registry, "page").await;

        let cleaned = route.cleanup(Some(&route)).await.unwrap();
        let executed = route
            .exec(Some(&route), &NavigationArgs::default())
            .await
            .unwrap();

        assert!(cleaned.is_empty());
        assert_eq!(names(&registry, &executed), vec!["page"]);
    }

    #[tokio::test]
    async fn test_sibling_instance_replaces_leaf_only() {
        let registry = registry();
        let first = active(&registry, "page").await;
        let second = Route::new(&registry, "page").unwrap();

        let cleaned = first.cleanup(Some(&second)).await.unwrap();
        let executed = second
            .exec(Some(&first), &NavigationArgs::default())
            .await
            .unwrap();

        assert_eq!(names(&registry, &cleaned), vec!["page"]);
        assert_eq!(names(&registry, &executed), vec!["page"]);
    }

    #[tokio::test]
    async fn test_more_derived_previous_satisfies_ancestor() {
        let registry = registry();
        let detail = active(&registry, "detail").await;
        let section = Route::new(&registry, "section").unwrap();

        let cleaned = detail.cleanup(Some(&section)).await.unwrap();
        let executed = section
            .exec(Some(&detail), &NavigationArgs::default())
            .await
            .unwrap();

        assert_eq!(names(&registry, &cleaned), vec!["detail", "page"]);
        assert!(executed.is_empty());
        assert_eq!(section.active_depth(), 3);
    }

    #[tokio::test]
    async fn test_torn_down_level_is_not_inherited() {
        let registry = registry();
        let page = active(&registry, "page").await;
        let settings = Route::new(&registry, "settings").unwrap();
        page.cleanup(Some(&settings)).await.unwrap();
        assert_eq!(page.active_depth(), 2);

        let section = Route::new(&registry, "section").unwrap();
        let executed = section
            .exec(Some(&page), &NavigationArgs::default())
            .await
            .unwrap();

        assert_eq!(names(&registry, &executed), vec!["section"]);
        assert_eq!(section.active_depth(), 3);
    }

    #[tokio::test]
    async fn test_exec_after_forced_cleanup_rebuilds_chain() {
        let registry = registry();
        let page = active(&registry, "page").await;
        let detail = Route::new(&registry, "detail").unwrap();

        page.cleanup_with(Some(&detail), CleanupOptions::forced())
            .await
            .unwrap();
        let executed = detail
            .exec(Some(&page), &NavigationArgs::default())
            .await
            .unwrap();

        assert_eq!(
            names(&registry, &executed),
            vec!["app", "section", "page", "detail"]
        );
    }

    #[tokio::test]
    async fn test_cleanup_twice_is_idempotent() {
        let registry = registry();
        let page = active(&registry, "page").await;
        let login = Route::new(&registry, "login").unwrap();

        let first = page.cleanup(Some(&login)).await.unwrap();
        let second = page.cleanup(Some(&login)).await.unwrap();

        assert_eq!(names(&registry, &first), vec!["page", "section", "app"]);
        assert!(second.is_empty());
        assert_eq!(page.active_depth(), 1);
    }

    #[tokio::test]
    async fn test_cleanup_without_next_unwinds_everything() {
        let registry = registry();
        let profile = active(&registry, "profile").await;

        let cleaned = profile.cleanup(None).await.unwrap();

        assert_eq!(names(&registry, &cleaned), vec!["profile", "settings", "app"]);
    }

    #[tokio::test]
    async fn test_forced_cleanup_ignores_shared_levels() {
        let registry = registry();
        let page = active(&registry, "page").await;
        let detail = Route::new(&registry, "detail").unwrap();

        let cleaned = page
            .cleanup_with(Some(&detail), CleanupOptions::forced())
            .await
            .unwrap();

        assert_eq!(names(&registry, &cleaned), vec!["page", "section", "app"]);
    }

    #[tokio::test]
    async fn test_foreign_neighbour_shares_nothing() {
        let registry = registry();
        let other = self::registry();
        let page = active(&registry, "page").await;
        let foreign = Route::new(&other, "page").unwrap();

        let cleaned = page.cleanup(Some(&foreign)).await.unwrap();

        assert_eq!(names(&registry, &cleaned), vec!["page", "section", "app"]);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let registry = registry();
        let err = Route::new(&registry, "nowhere").unwrap_err();
        assert!(matches!(err, TransitionError::UnknownRouteType(name) if name == "nowhere"));
    }

    #[test]
    fn test_navigation_args() {
        let args: NavigationArgs = ["42", "edit"].into_iter().collect();
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(0), Some("42"));
        assert_eq!(args.get(2), None);
        assert!(NavigationArgs::default().is_empty());
    }
}
