use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::store::HeaderStore;

/// Errors from relayer settlement. A failed payment leaves the paid flag unset.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("Unauthorized: {caller} may not pay relayers")]
    Unauthorized { caller: Address },

    #[error("Block {block_hash} has no record")]
    BlockNotFound { block_hash: B256 },

    #[error("Reward transfer to {relayer} failed: {reason}")]
    TransferFailed { relayer: Address, reason: String },
}

/// Outcome of a successful [`RelayerLedger::pay_relayer`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// The reward was transferred and the block is now marked paid.
    Paid,
    /// The block was paid earlier; nothing was transferred.
    AlreadyPaid,
}

/// Moves the actual reward. Supplied by the host environment.
pub trait RewardSink {
    fn transfer(&mut self, relayer: Address, block_hash: B256) -> Result<(), String>;
}

/// Sink for hosts without on-ledger settlement: every transfer succeeds.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRewardSink;

impl RewardSink for NoopRewardSink {
    fn transfer(&mut self, _relayer: Address, _block_hash: B256) -> Result<(), String> {
        Ok(())
    }
}

/// Tracks whether each block's relayer has been rewarded.
///
/// Payment is a one-way transition from unpaid to paid. Only `payer` may
/// trigger it, and paying a block twice transfers nothing the second time.
#[derive(Debug)]
pub struct RelayerLedger<S> {
    payer: Address,
    sink: S,
}

impl<S: RewardSink> RelayerLedger<S> {
    pub fn new(payer: Address, sink: S) -> Self {
        Self { payer, sink }
    }

    pub fn payer(&self) -> Address {
        self.payer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// False for unpaid and for unknown blocks.
    pub fn is_relayer_paid(&self, store: &HeaderStore, block_hash: &B256) -> bool {
        store.block(block_hash).is_some_and(|r| r.is_paid)
    }

    pub fn pay_relayer(
        &mut self,
        store: &mut HeaderStore,
        caller: Address,
        block_hash: B256,
    ) -> Result<PaymentStatus, PaymentError> {
        if caller != self.payer {
            warn!(%caller, %block_hash, "rejected payment from unauthorized identity");
            return Err(PaymentError::Unauthorized { caller });
        }

        let record = store
            .block(&block_hash)
            .ok_or(PaymentError::BlockNotFound { block_hash })?;
        if record.is_paid {
            return Ok(PaymentStatus::AlreadyPaid);
        }

        let relayer = record.relayer;
        self.sink
            .transfer(relayer, block_hash)
            .map_err(|reason| PaymentError::TransferFailed { relayer, reason })?;

        store.mark_paid(&block_hash);
        info!(%block_hash, %relayer, "relayer paid");
        Ok(PaymentStatus::Paid)
    }
}
