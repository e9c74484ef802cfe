pub mod project;
pub mod run;
pub mod scenario;
pub mod testcase;

pub use project::{Project, SpecFile};
pub use run::{rollup, RunOutcome, RunStatus};
pub use scenario::{Scenario, ScenarioDetail, ScenarioSummary};
pub use testcase::{TestCase, TestDataField};

/// `<prefix>-<epoch millis>-<6 base36 chars>`
pub fn generate_id(prefix: &str) -> String {
    use rand::Rng;

    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!(
        "{}-{}-{}",
        prefix,
        chrono::Utc::now().timestamp_millis(),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id("scenario");
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "scenario");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generate_id_is_unique_enough() {
        assert_ne!(generate_id("testcase"), generate_id("testcase"));
    }
}
