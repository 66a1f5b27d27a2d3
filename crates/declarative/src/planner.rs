//! Execution planner - ordered resource plans

use crate::resource::{BoxedResource, Resource};
use std::collections::HashSet;
use thiserror::Error;

/// Reasons a plan cannot be executed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Two resources share an id
    #[error("duplicate resource id in plan: {0}")]
    DuplicateId(String),

    /// A dependency is missing or placed after its dependent
    #[error("{resource} depends on {dependency}, which is not applied before it")]
    UnorderedDependency {
        resource: String,
        dependency: String,
    },
}

/// An execution plan: resources in the order they will be applied
pub struct ExecutionPlan {
    resources: Vec<BoxedResource>,
}

impl ExecutionPlan {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
        }
    }

    /// Append a resource; it will be applied after everything already in the plan
    pub fn push(&mut self, resource: BoxedResource) {
        self.resources.push(resource);
    }

    /// Resources in apply order
    pub fn resources(&self) -> &[BoxedResource] {
        &self.resources
    }

    /// Resource ids in apply order
    pub fn ids(&self) -> Vec<String> {
        self.resources.iter().map(|r| r.id()).collect()
    }

    /// Find a resource by id
    pub fn get(&self, id: &str) -> Option<&dyn Resource> {
        self.resources
            .iter()
            .find(|r| r.id() == id)
            .map(AsRef::as_ref)
    }

    /// Check that ids are unique and every dependency precedes its dependent
    pub fn validate(&self) -> Result<(), PlanError> {
        let mut seen = HashSet::new();

        for resource in &self.resources {
            let id = resource.id();

            for dependency in resource.depends_on() {
                if !seen.contains(&dependency) {
                    return Err(PlanError::UnorderedDependency {
                        resource: id,
                        dependency,
                    });
                }
            }

            if !seen.insert(id.clone()) {
                return Err(PlanError::DuplicateId(id));
            }
        }

        Ok(())
    }

    /// Total number of resources in the plan
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Check if plan is empty
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl Default for ExecutionPlan {
    fn default() -> Self {
        Self::new()
    }
}
