//! Hierarchical route transition engine.
//!
//! Activates and deactivates nested routes as an application moves between
//! locations. Route types form a single-inheritance tree; a navigation tears
//! down only the levels the outgoing route does not share with the incoming
//! one, then sets up only the levels the incoming route does not share with
//! the outgoing one.
//!
//! ```
//! use std::sync::Arc;
//! use route_transit::routing::{NavigationArgs, Route, RouteRegistry, TransitionDriver, ROOT_TYPE_NAME};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let registry = Arc::new(
//!     RouteRegistry::builder()
//!         .route_type("app", ROOT_TYPE_NAME)
//!         .route_type("section", "app")
//!         .route_type("page", "section")
//!         .build()
//!         .unwrap(),
//! );
//! let driver = TransitionDriver::new(registry.clone());
//!
//! let first = Arc::new(Route::new(&registry, "page").unwrap());
//! let transition = driver.navigate(first, NavigationArgs::default()).await.unwrap();
//! assert_eq!(transition.executed, vec!["app", "section", "page"]);
//!
//! let second = Arc::new(Route::new(&registry, "page").unwrap());
//! let transition = driver.navigate(second, NavigationArgs::default()).await.unwrap();
//! assert_eq!(transition.cleaned, vec!["page"]);
//! assert_eq!(transition.executed, vec!["page"]);
//! # });
//! ```

pub mod config;
pub mod observability;
pub mod routing;

pub use config::schema::TransitConfig;
pub use routing::{Route, RouteRegistry, TransitionDriver};
