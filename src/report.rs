//! Check outcomes collected over a run

use crate::error::CheckError;
use std::fmt;
use std::time::Instant;
use tracing::{debug, warn};

/// Suite stages, in the only order they may run: later stages consume ids
/// and sessions produced by earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Registration,
    Login,
    Upload,
    Create,
    List,
    Get,
    Update,
    Delete,
}

impl Stage {
    pub const ORDER: [Stage; 8] = [
        Stage::Registration,
        Stage::Login,
        Stage::Upload,
        Stage::Create,
        Stage::List,
        Stage::Get,
        Stage::Update,
        Stage::Delete,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Stage::Registration => "User Registration",
            Stage::Login => "Credentials Login",
            Stage::Upload => "File Upload",
            Stage::Create => "Create Item",
            Stage::List => "Get Items with Filters",
            Stage::Get => "Get Single Item",
            Stage::Update => "Update Item",
            Stage::Delete => "Delete Item",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub name: String,
    pub stage: Stage,
    pub passed: bool,
    pub message: String,
    pub duration_ms: u128,
}

/// Append-only list of results, in execution order
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    results: Vec<TestResult>,
}

impl RunReport {
    pub fn record(
        &mut self,
        stage: Stage,
        name: &str,
        started: Instant,
        outcome: Result<String, CheckError>,
    ) -> bool {
        let duration_ms = started.elapsed().as_millis();
        let (passed, message) = match outcome {
            Ok(message) => {
                debug!(check = name, duration_ms, "passed");
                (true, message)
            }
            Err(err) => {
                warn!(check = name, error = %err, "failed");
                (false, err.to_string())
            }
        };
        self.results.push(TestResult {
            name: name.to_string(),
            stage,
            passed,
            message,
            duration_ms,
        });
        passed
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn get(&self, name: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}
