pub mod random;

use serde::{Deserialize, Serialize};

use crate::models::{RunOutcome, Scenario, TestCase, TestDataField};

pub use random::RandomFixtures;

/// An API endpoint a scenario exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoint {
    pub api_id: String,
    pub api_name: String,
}

/// Source of generated scenarios, test cases and run results.
///
/// Handlers never generate data themselves; swap the implementation in
/// `AppState` to plug in a real analyzer or test runner.
pub trait FixtureProvider: Send + Sync {
    /// A fresh scenario with no test cases.
    fn scenario(&self) -> Scenario;

    /// A fresh test case with its test data.
    fn test_case(&self) -> TestCase;

    fn test_data_field(&self) -> TestDataField;

    /// The API endpoints involved in a scenario.
    fn api_list(&self, scenario: &Scenario) -> Vec<ApiEndpoint>;

    /// Execute one test case.
    fn run_test_case(&self, test_case: &TestCase) -> RunOutcome;
}
