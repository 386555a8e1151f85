use alloy_primitives::{Address, Bytes};

/// One pending outbound call awaiting inclusion in a proposal batch.
///
/// Records are immutable once appended; their order is the execution order
/// of the eventual batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    /// Destination contract
    pub target: Address,
    /// Encoded call data
    pub payload: Bytes,
    /// Optional operator note, carried through to the audit log
    pub comment: Option<String>,
}

/// Append-only ordered log of pending proposal calls.
///
/// One accumulator lives for one proposal-building session; there is no
/// removal or reordering. Each append is echoed to the audit log so an
/// operator can follow the batch as it is assembled.
#[derive(Debug, Default)]
pub struct BatchAccumulator {
    records: Vec<CallRecord>,
}

impl BatchAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a call and returns its index in the batch.
    pub fn append(&mut self, target: Address, payload: Bytes, comment: Option<&str>) -> usize {
        let index = self.records.len();
        let record = CallRecord {
            target,
            payload,
            comment: comment.map(str::to_string),
        };
        tracing::info!(
            index,
            target = %record.target,
            payload = %record.payload,
            comment = record.comment.as_deref().unwrap_or_default(),
            "queued proposal call"
        );
        self.records.push(record);
        index
    }

    /// Read-only view of the accumulated batch, in insertion order.
    pub fn snapshot(&self) -> &[CallRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
