//! Route-type hierarchy.
//!
//! # Responsibilities
//! - Store route-type descriptors in a single-inheritance tree
//! - Resolve parent names and reject malformed hierarchies
//! - Precompute each type's ancestor chain (root first, type last)
//! - Answer subtype ("instance of") queries
//!
//! # Design Decisions
//! - Compiled once by [`RouteRegistryBuilder::build`], immutable afterwards
//!   and shared via `Arc`
//! - Declarations may appear in any order; parents are resolved by name
//! - Chains are root-aligned, so a subtype test is a single index lookup

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::schema::TransitConfig;
use crate::routing::error::ConfigurationError;
use crate::routing::hooks::{NoopHooks, RouteHooks};

/// Name of the sentinel root every hierarchy starts from.
pub const ROOT_TYPE_NAME: &str = "route";

/// Handle to a route type inside one [`RouteRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteTypeId(usize);

impl RouteTypeId {
    /// The sentinel root type.
    pub const ROOT: RouteTypeId = RouteTypeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of the hierarchy.
pub struct RouteType {
    id: RouteTypeId,
    name: String,
    parent: Option<RouteTypeId>,
    chain: Arc<[RouteTypeId]>,
    hooks: Arc<dyn RouteHooks>,
}

impl RouteType {
    pub fn id(&self) -> RouteTypeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent type, `None` only for the root.
    pub fn parent(&self) -> Option<RouteTypeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Ancestor chain from the root down to this type, inclusive.
    pub fn ancestor_chain(&self) -> &Arc<[RouteTypeId]> {
        &self.chain
    }

    /// Length of the ancestor chain (1 for the root).
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    pub fn hooks(&self) -> &Arc<dyn RouteHooks> {
        &self.hooks
    }
}

impl fmt::Debug for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteType")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}

/// The compiled, immutable route-type hierarchy.
#[derive(Debug)]
pub struct RouteRegistry {
    types: Vec<RouteType>,
    by_name: HashMap<String, RouteTypeId>,
}

impl RouteRegistry {
    pub fn builder() -> RouteRegistryBuilder {
        RouteRegistryBuilder::default()
    }

    /// Build a registry from the `route_types` section of a config.
    /// Every type gets the no-op hook set.
    pub fn from_config(config: &TransitConfig) -> Result<Self, ConfigurationError> {
        Self::builder().with_config(config).build()
    }

    pub fn root(&self) -> &RouteType {
        &self.types[RouteTypeId::ROOT.0]
    }

    pub fn get(&self, id: RouteTypeId) -> Option<&RouteType> {
        self.types.get(id.0)
    }

    pub fn lookup(&self, name: &str) -> Option<&RouteType> {
        self.by_name.get(name).map(|id| &self.types[id.0])
    }

    /// Number of types including the root.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteType> {
        self.types.iter()
    }

    /// Names along the ancestor chain of `id`, root first.
    pub fn chain_names(&self, id: RouteTypeId) -> Vec<String> {
        self.get(id)
            .map(|ty| self.names(ty.ancestor_chain()))
            .unwrap_or_default()
    }

    pub(crate) fn names(&self, ids: &[RouteTypeId]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| self.get(*id))
            .map(|ty| ty.name.clone())
            .collect()
    }

    /// Level lookup for ids minted by this registry.
    pub(crate) fn level(&self, id: RouteTypeId) -> &RouteType {
        &self.types[id.0]
    }

    /// True if `sub` is `ancestor` or one of its descendants.
    pub fn is_subtype(&self, sub: RouteTypeId, ancestor: RouteTypeId) -> bool {
        match (self.get(sub), self.get(ancestor)) {
            (Some(sub), Some(ancestor)) => {
                sub.chain.get(ancestor.depth() - 1) == Some(&ancestor.id)
            }
            _ => false,
        }
    }
}

struct Declaration {
    name: String,
    parent: String,
    hooks: Option<Arc<dyn RouteHooks>>,
}

/// Collects route-type declarations and compiles them into a
/// [`RouteRegistry`].
#[derive(Default)]
pub struct RouteRegistryBuilder {
    declarations: Vec<Declaration>,
    attached_hooks: Vec<(String, Arc<dyn RouteHooks>)>,
    fallback_hooks: Option<Arc<dyn RouteHooks>>,
}

impl RouteRegistryBuilder {
    /// Declare `name` as a child of `parent`. Use [`ROOT_TYPE_NAME`] for
    /// top-level types.
    pub fn route_type(mut self, name: impl Into<String>, parent: impl Into<String>) -> Self {
        self.declarations.push(Declaration {
            name: name.into(),
            parent: parent.into(),
            hooks: None,
        });
        self
    }

    /// Declare a type together with its own hooks.
    pub fn route_type_with_hooks(
        mut self,
        name: impl Into<String>,
        parent: impl Into<String>,
        hooks: Arc<dyn RouteHooks>,
    ) -> Self {
        self.declarations.push(Declaration {
            name: name.into(),
            parent: parent.into(),
            hooks: Some(hooks),
        });
        self
    }

    /// Attach hooks to a type declared elsewhere (e.g. from a config file).
    pub fn hooks(mut self, name: impl Into<String>, hooks: Arc<dyn RouteHooks>) -> Self {
        self.attached_hooks.push((name.into(), hooks));
        self
    }

    /// Hooks for every type that ends up without its own. Defaults to
    /// [`NoopHooks`].
    pub fn fallback_hooks(mut self, hooks: Arc<dyn RouteHooks>) -> Self {
        self.fallback_hooks = Some(hooks);
        self
    }

    /// Add every type of a config's `route_types` section.
    pub fn with_config(mut self, config: &TransitConfig) -> Self {
        for route_type in &config.route_types {
            self = self.route_type(
                route_type.name.clone(),
                route_type
                    .parent
                    .clone()
                    .unwrap_or_else(|| ROOT_TYPE_NAME.to_string()),
            );
        }
        self
    }

    pub fn build(self) -> Result<RouteRegistry, ConfigurationError> {
        let mut by_name = HashMap::with_capacity(self.declarations.len() + 1);
        by_name.insert(ROOT_TYPE_NAME.to_string(), RouteTypeId::ROOT);

        for (index, declaration) in self.declarations.iter().enumerate() {
            if declaration.name.is_empty() {
                return Err(ConfigurationError::EmptyName);
            }
            if declaration.name == ROOT_TYPE_NAME {
                return Err(ConfigurationError::RootRedefined(declaration.name.clone()));
            }
            if by_name
                .insert(declaration.name.clone(), RouteTypeId(index + 1))
                .is_some()
            {
                return Err(ConfigurationError::DuplicateType(declaration.name.clone()));
            }
        }

        let mut names = Vec::with_capacity(self.declarations.len() + 1);
        let mut parents = Vec::with_capacity(self.declarations.len() + 1);
        names.push(ROOT_TYPE_NAME.to_string());
        parents.push(None);
        for declaration in &self.declarations {
            let parent = by_name.get(&declaration.parent).copied().ok_or_else(|| {
                ConfigurationError::UnknownParent {
                    name: declaration.name.clone(),
                    parent: declaration.parent.clone(),
                }
            })?;
            names.push(declaration.name.clone());
            parents.push(Some(parent));
        }

        let mut hooks: Vec<Option<Arc<dyn RouteHooks>>> = std::iter::once(None)
            .chain(self.declarations.into_iter().map(|d| d.hooks))
            .collect();
        for (name, attached) in self.attached_hooks {
            match by_name.get(&name) {
                Some(id) if *id != RouteTypeId::ROOT => hooks[id.0] = Some(attached),
                _ => return Err(ConfigurationError::UnknownType(name)),
            }
        }

        let fallback = self.fallback_hooks;
        let mut types = Vec::with_capacity(names.len());
        for (index, (name, hooks)) in names.into_iter().zip(hooks).enumerate() {
            let id = RouteTypeId(index);
            let chain = build_ancestor_chain(&parents, id).map_err(|_| {
                ConfigurationError::Cycle(name.clone())
            })?;
            let hooks = match (hooks, &fallback) {
                (Some(own), _) => own,
                (None, Some(fallback)) if id != RouteTypeId::ROOT => fallback.clone(),
                _ => Arc::new(NoopHooks) as Arc<dyn RouteHooks>,
            };
            types.push(RouteType {
                id,
                name,
                parent: parents[index],
                chain: chain.into(),
                hooks,
            });
        }

        tracing::debug!(route_types = types.len(), "route registry compiled");

        Ok(RouteRegistry { types, by_name })
    }
}

/// Marker error: the parent walk exceeded the number of registered types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CycleDetected;

/// Walk parent links from `ty` up to the root, then reverse so index 0 is the
/// root. The walk is bounded by the number of types, so a cycle is reported
/// instead of looping.
pub(crate) fn build_ancestor_chain(
    parents: &[Option<RouteTypeId>],
    ty: RouteTypeId,
) -> Result<Vec<RouteTypeId>, CycleDetected> {
    let mut chain = vec![ty];
    let mut cursor = ty;
    while cursor != RouteTypeId::ROOT {
        if chain.len() >= parents.len() {
            return Err(CycleDetected);
        }
        cursor = parents
            .get(cursor.0)
            .copied()
            .flatten()
            .ok_or(CycleDetected)?;
        chain.push(cursor);
    }
    chain.reverse();
    Ok(chain)
}
