//! Provisioning engine
//!
//! The engine ties the pieces together:
//! 1. Naming - Derive the four resource names from one base name
//! 2. Planning - Build the resources in dependency order
//! 3. Executing - Apply them one at a time, reporting through a [`RunReporter`]

pub mod orchestrator;
pub mod reporter;

pub use orchestrator::{Orchestrator, ProvisionParams};
pub use reporter::RunReporter;
