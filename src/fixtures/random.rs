//! Randomised demo data. Nothing here looks at real APIs.

use rand::Rng;

use super::{ApiEndpoint, FixtureProvider};
use crate::models::{generate_id, RunOutcome, RunStatus, Scenario, TestCase, TestDataField};

const NOUNS: &[&str] = &[
    "Test", "Scenario", "Flow", "Process", "Workflow", "Sequence", "Chain", "Path",
];

const SCENARIO_DESCRIPTIONS: &[&str] = &[
    "This scenario tests the basic functionality of the system",
    "A comprehensive test flow for critical operations",
    "End-to-end testing scenario for user interactions",
    "Performance testing scenario for system optimization",
    "Security validation scenario for data protection",
];

const VALIDATIONS: &[&str] = &[
    "Response time < 200ms",
    "Success rate > 99%",
    "Error rate < 0.1%",
    "Data consistency check",
    "State transition validation",
];

const TEST_CASE_DESCRIPTIONS: &[&str] = &[
    "Verify the basic functionality of the feature",
    "Test the error handling mechanism",
    "Validate the data processing flow",
    "Check the boundary conditions",
    "Test the integration with other components",
];

const PRECONDITIONS: &[&str] = &[
    "System is up and running",
    "User is logged in",
    "Database has been initialized",
    "Network connection is stable",
    "Required resources are allocated",
];

const EXPECTED_RESULTS: &[&str] = &[
    "Data is stored successfully",
    "The error message is shown correctly",
    "The requested data is returned exactly",
    "The system responds normally",
    "Data is updated correctly",
];

const STATUS_CODES: &[i64] = &[2, 3, 4, 5];
const CATEGORIES: &[&str] = &["path/query", "request", "response"];
const DISPLAY_NAMES: &[&str] = &["Test", "Test 2", "Test 3"];
const NAMES: &[&str] = &["test", "test2", "test3"];
const CONTEXTS: &[&str] = &["path", "query", "body", "header"];
const TYPES: &[&str] = &["string", "number", "boolean", "array", "object"];
const LENGTHS: &[i64] = &[10, 20, 30];
const FORMATS: &[&str] = &["text", "json", "xml"];
const PARAM_IDS: &[i64] = &[1, 2, 3];

const TEST_DATA_PER_CASE: usize = 3;

const SCENARIO_GRAPH: &str = "graph LR
    A[Start] --> B{Check condition}
    B -->|ok| C[Execute]
    B -->|fail| D[Handle error]
    C --> E[Verify result]
    E -->|pass| F[Success response]
    E -->|fail| G[Failure response]
    D --> H[Error response]
    F --> I[End]
    G --> I
    H --> I";

/// Map a uniform draw in `[0, 1)` onto a run status.
///
/// `[0, .7)` success, `[.7, .8)` failure, `[.8, .9)` running, rest pending.
pub fn status_for_draw(draw: f64) -> RunStatus {
    if draw < 0.7 {
        RunStatus::Success
    } else if draw < 0.8 {
        RunStatus::Failure
    } else if draw < 0.9 {
        RunStatus::Running
    } else {
        RunStatus::Pending
    }
}

/// Demo `FixtureProvider` backed by the thread-local RNG.
#[derive(Debug, Default, Clone)]
pub struct RandomFixtures;

impl RandomFixtures {
    pub fn new() -> Self {
        Self
    }
}

fn pick<T: Copy>(pool: &[T]) -> T {
    pool[rand::thread_rng().gen_range(0..pool.len())]
}

impl FixtureProvider for RandomFixtures {
    fn scenario(&self) -> Scenario {
        let n: u32 = rand::thread_rng().gen_range(0..1000);
        Scenario {
            id: generate_id("scenario"),
            name: format!("{} {}", pick(NOUNS), n),
            description: pick(SCENARIO_DESCRIPTIONS).to_string(),
            validation: pick(VALIDATIONS).to_string(),
            graph: SCENARIO_GRAPH.to_string(),
            testcase_list: Vec::new(),
            is_success: None,
        }
    }

    fn test_case(&self) -> TestCase {
        TestCase {
            tc_id: generate_id("testcase"),
            precondition: Some(pick(PRECONDITIONS).to_string()),
            description: pick(TEST_CASE_DESCRIPTIONS).to_string(),
            expected_result: pick(EXPECTED_RESULTS).to_string(),
            status: Some(pick(STATUS_CODES)),
            test_data_list: (0..TEST_DATA_PER_CASE)
                .map(|_| self.test_data_field())
                .collect(),
            is_success: None,
            executed_time: None,
        }
    }

    fn test_data_field(&self) -> TestDataField {
        TestDataField {
            param_id: pick(PARAM_IDS),
            category: pick(CATEGORIES).to_string(),
            display_name: pick(DISPLAY_NAMES).to_string(),
            name: pick(NAMES).to_string(),
            context: pick(CONTEXTS).to_string(),
            data_type: pick(TYPES).to_string(),
            length: pick(LENGTHS),
            format: pick(FORMATS).to_string(),
            default_value: pick(NAMES).to_string(),
            required: rand::thread_rng().gen_bool(0.5),
            parent: pick(NAMES).to_string(),
            description: pick(DISPLAY_NAMES).to_string(),
            value: Some(pick(NAMES).to_string()),
        }
    }

    fn api_list(&self, _scenario: &Scenario) -> Vec<ApiEndpoint> {
        [("api-1", "Get User"), ("api-2", "Create Order"), ("api-3", "Update Item")]
            .into_iter()
            .map(|(id, name)| ApiEndpoint {
                api_id: id.to_string(),
                api_name: name.to_string(),
            })
            .collect()
    }

    fn run_test_case(&self, _test_case: &TestCase) -> RunOutcome {
        let mut rng = rand::thread_rng();
        RunOutcome {
            status: status_for_draw(rng.gen::<f64>()),
            duration_ms: rng.gen_range(0..1000),
        }
    }
}
