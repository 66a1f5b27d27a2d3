//! Console reporting for a provisioning run

use azsearch::ErrorCategory;
use colored::Colorize;
use declarative::{ApplyResult, ProgressCallback};

use crate::ui;

/// Reports one provisioning run to the console and the log.
///
/// Created per run and handed to the executor; nothing else in the
/// provisioning path writes progress.
#[derive(Debug, Default)]
pub struct RunReporter {
    quiet: bool,
    total: usize,
    current: usize,
    failed: Option<String>,
}

impl RunReporter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            ..Self::default()
        }
    }

    /// Id of the resource that failed, if any
    pub fn failed(&self) -> Option<&str> {
        self.failed.as_deref()
    }

    /// Number of resources started so far
    pub fn started(&self) -> usize {
        self.current
    }
}

impl ProgressCallback for RunReporter {
    fn on_plan_start(&mut self, count: usize) {
        self.total = count;
        self.current = 0;
        self.failed = None;
    }

    fn on_resource_start(&mut self, id: &str, description: &str) {
        self.current += 1;
        log::info!("Applying {id}");
        if !self.quiet {
            ui::step(self.current, self.total, description);
        }
    }

    fn on_resource_complete(&mut self, id: &str, result: &ApplyResult) {
        let (mark, label) = match result {
            ApplyResult::Created => ("✓".green(), "created".to_string()),
            ApplyResult::Updated => ("✓".green(), "updated".to_string()),
            ApplyResult::Skipped { reason } => ("○".dimmed(), format!("skipped ({reason})")),
        };
        log::debug!("{id}: {label}");
        if !self.quiet {
            println!("      {mark} {id} {}", label.dimmed());
        }
    }

    fn on_resource_failed(&mut self, id: &str, error: &anyhow::Error) {
        log::error!("Failed to apply {id}: {error:#}");
        self.failed = Some(id.to_string());
        if !self.quiet {
            ui::error(&format!("{id}: {error:#}"));
            if let Some(category) = category(error) {
                ui::dim(&format!("{}. {}", category.description(), category.advice()));
            }
        }
    }
}

/// Category of the client error behind a failure, if there is one
fn category(error: &anyhow::Error) -> Option<ErrorCategory> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<azsearch::Error>())
        .map(azsearch::Error::category)
}
