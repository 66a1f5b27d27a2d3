//! Core types for declarative resource management

use serde::{Deserialize, Serialize};

/// Result of applying a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// Resource did not exist and was created
    Created,
    /// Resource existed and was replaced with the desired definition
    Updated,
    /// Apply was skipped
    Skipped { reason: String },
}

impl ApplyResult {
    /// Check if the result represents a change to the target system
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Created | Self::Updated)
    }
}

/// Summary of execution results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    /// Ids of resources that completed, in apply order
    pub applied: Vec<String>,
}

impl ExecuteSummary {
    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.updated
    }

    /// Total number of resources processed
    pub fn total(&self) -> usize {
        self.created + self.updated + self.skipped
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, id: &str, result: &ApplyResult) {
        match result {
            ApplyResult::Created => self.created += 1,
            ApplyResult::Updated => self.updated += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
        self.applied.push(id.to_string());
    }
}

/// Options for execution
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Don't make changes, just validate what would be applied
    pub dry_run: bool,
    /// Verbose output
    pub verbose: bool,
}
