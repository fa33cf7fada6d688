//! Monotonic ID sequences.
//!
//! RULE: IDs are never reused or skipped. Every table's key starts at 1
//! and increases by one per emitted row, in emission order.

use crate::types::RowId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdSequence {
    next: RowId,
}

impl IdSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next ID.
    pub fn next_id(&mut self) -> RowId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of IDs handed out so far.
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// All running counters for one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sequences {
    pub campaign:    IdSequence,
    pub customer:    IdSequence,
    pub transaction: IdSequence,
    pub test:        IdSequence,
}
