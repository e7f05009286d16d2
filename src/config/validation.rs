//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (parents name declared types)
//! - Detect duplicate and reserved names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TransitConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;

use crate::config::schema::TransitConfig;
use crate::routing::hierarchy::ROOT_TYPE_NAME;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("route type #{0} has an empty name")]
    EmptyName(usize),

    #[error("route type `{0}` is declared more than once")]
    DuplicateName(String),

    #[error("route type name `{0}` is reserved for the root")]
    ReservedName(String),

    #[error("route type `{0}` is its own parent")]
    SelfParent(String),

    #[error("route type `{name}` references unknown parent `{parent}`")]
    UnknownParent { name: String, parent: String },
}

pub fn validate_config(config: &TransitConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, route_type) in config.route_types.iter().enumerate() {
        if route_type.name.is_empty() {
            errors.push(ValidationError::EmptyName(index));
            continue;
        }
        if route_type.name == ROOT_TYPE_NAME {
            errors.push(ValidationError::ReservedName(route_type.name.clone()));
        }
        if !seen.insert(route_type.name.as_str()) {
            errors.push(ValidationError::DuplicateName(route_type.name.clone()));
        }
    }

    for route_type in &config.route_types {
        let Some(parent) = route_type.parent.as_deref() else {
            continue;
        };
        if parent == route_type.name {
            errors.push(ValidationError::SelfParent(route_type.name.clone()));
        } else if parent != ROOT_TYPE_NAME && !seen.contains(parent) {
            errors.push(ValidationError::UnknownParent {
                name: route_type.name.clone(),
                parent: parent.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
