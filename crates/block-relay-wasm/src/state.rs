//! Host-side bookkeeping around the relay: reward payouts awaiting settlement
//! by the JavaScript layer, and activity counters.

use block_relay_core::{Address, RewardSink, B256};
use serde::{Deserialize, Serialize};

use crate::api::to_hex;

/// A reward the host still has to transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPayout {
    pub relayer: String,
    pub block_hash: String,
}

/// Reward sink that queues payouts for the host to settle.
///
/// Queuing never fails, so the ledger marks the block paid as soon as the
/// payout is queued. The host drains the queue with
/// [`PayoutQueue::take`].
#[derive(Debug, Default)]
pub struct PayoutQueue {
    pending: Vec<PendingPayout>,
}

impl PayoutQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return everything queued so far.
    pub fn take(&mut self) -> Vec<PendingPayout> {
        std::mem::take(&mut self.pending)
    }
}

impl RewardSink for PayoutQueue {
    fn transfer(&mut self, relayer: Address, block_hash: B256) -> Result<(), String> {
        self.pending.push(PendingPayout {
            relayer: to_hex(relayer),
            block_hash: to_hex(block_hash),
        });
        Ok(())
    }
}

/// Activity counters for the TypeScript layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayStats {
    /// Blocks accepted by the store.
    pub blocks_accepted: u64,
    /// Submissions refused (unauthorized or duplicate).
    pub submissions_rejected: u64,
    /// Proofs of inclusion that verified.
    pub proofs_verified: u64,
    /// Proofs of inclusion that did not verify.
    pub proofs_rejected: u64,
    /// Relayers paid.
    pub relayers_paid: u64,
}

impl RelayStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_submission(&mut self, accepted: bool) {
        if accepted {
            self.blocks_accepted += 1;
        } else {
            self.submissions_rejected += 1;
        }
    }

    pub fn record_proof(&mut self, valid: bool) {
        if valid {
            self.proofs_verified += 1;
        } else {
            self.proofs_rejected += 1;
        }
    }

    pub fn record_payment(&mut self) {
        self.relayers_paid += 1;
    }

    /// Share of checked proofs that verified (0.0 - 1.0).
    pub fn proof_success_rate(&self) -> f64 {
        let total = self.proofs_verified + self.proofs_rejected;
        if total == 0 {
            0.0
        } else {
            self.proofs_verified as f64 / total as f64
        }
    }
}
