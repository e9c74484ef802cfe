pub mod memory;
pub mod snapshot;

pub use memory::{LoginOutcome, MemoryStore};
pub use snapshot::Snapshot;
