use serde::{Deserialize, Serialize};

/// Outcome of a single test-case run, and the rolled-up state of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failure,
    Running,
    Pending,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::Failure => "failure",
            RunStatus::Running => "running",
            RunStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of executing one test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub duration_ms: u32,
}

impl RunOutcome {
    /// Wire rendering of the duration, e.g. `"532ms"`.
    pub fn executed_time(&self) -> String {
        format!("{}ms", self.duration_ms)
    }
}

/// Derive a scenario status from its test cases' statuses.
///
/// First match wins:
/// 1. every case succeeded → `Success`
/// 2. any case still running → `Running`
/// 3. any case failed → `Failure`
/// 4. otherwise → `Pending`
///
/// `Running` is checked before `Failure`; the UI colours scenarios from this
/// value. An empty list is `Pending`, since nothing has succeeded yet.
pub fn rollup<I>(statuses: I) -> RunStatus
where
    I: IntoIterator<Item = RunStatus>,
{
    let mut total = 0usize;
    let mut succeeded = 0usize;
    let mut running = false;
    let mut failed = false;

    for status in statuses {
        total += 1;
        match status {
            RunStatus::Success => succeeded += 1,
            RunStatus::Running => running = true,
            RunStatus::Failure => failed = true,
            RunStatus::Pending => {}
        }
    }

    if total > 0 && succeeded == total {
        RunStatus::Success
    } else if running {
        RunStatus::Running
    } else if failed {
        RunStatus::Failure
    } else {
        RunStatus::Pending
    }
}
