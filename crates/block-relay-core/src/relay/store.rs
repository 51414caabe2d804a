use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc::Sender;

use alloy_primitives::{Address, B256};
use tracing::{debug, info, warn};

use super::access::AccessGuard;
use super::{BeaconReader, BlockRelay, RelayError};
use crate::config::{DuplicatePolicy, RelayConfig};
use crate::types::beacon::{Beacon, BlockRecord, NewBlock};
use crate::verification::merkle;

/// Receives a [`NewBlock`] notification after every accepted submission.
pub trait BlockObserver: Send + Sync {
    fn on_new_block(&self, event: &NewBlock);
}

impl BlockObserver for Sender<NewBlock> {
    fn on_new_block(&self, event: &NewBlock) {
        if self.send(*event).is_err() {
            debug!(block_hash = %event.block_hash, "observer channel closed");
        }
    }
}

/// Holds the beacon and one record per submitted block.
///
/// Records are keyed by block hash. A record is written as one unit together
/// with the beacon, so readers never see a half-applied submission.
pub struct HeaderStore {
    guard: AccessGuard,
    duplicate_policy: DuplicatePolicy,
    beacon: Beacon,
    blocks: HashMap<B256, BlockRecord>,
    observers: Vec<Box<dyn BlockObserver>>,
}

impl HeaderStore {
    /// An empty store that accepts submissions from `submitter` only.
    pub fn new(submitter: Address) -> Self {
        Self::from_config(&RelayConfig::new(submitter))
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            guard: AccessGuard::new(config.submitter),
            duplicate_policy: config.duplicate_policy,
            beacon: Beacon::default(),
            blocks: HashMap::new(),
            observers: Vec::new(),
        }
    }

    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    pub fn beacon(&self) -> Beacon {
        self.beacon
    }

    /// Register an observer for future submissions.
    pub fn subscribe(&mut self, observer: impl BlockObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Explicit lookup; `None` if the block was never submitted.
    pub fn block(&self, block_hash: &B256) -> Option<&BlockRecord> {
        self.blocks.get(block_hash)
    }

    pub fn dr_merkle_root(&self, block_hash: &B256) -> Option<B256> {
        self.blocks.get(block_hash).map(|r| r.dr_merkle_root)
    }

    pub fn tally_merkle_root(&self, block_hash: &B256) -> Option<B256> {
        self.blocks.get(block_hash).map(|r| r.tally_merkle_root)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Flip the paid flag. Returns false if the block has no record.
    pub(crate) fn mark_paid(&mut self, block_hash: &B256) -> bool {
        match self.blocks.get_mut(block_hash) {
            Some(record) => {
                record.is_paid = true;
                true
            }
            None => false,
        }
    }

    fn verify_against(
        &self,
        tree: &'static str,
        root: Option<B256>,
        proof: &[B256],
        block_hash: &B256,
        index: u64,
        element: B256,
    ) -> bool {
        let Some(root) = root else {
            debug!(tree, %block_hash, "no record for block, proof rejected");
            return false;
        };

        let valid = merkle::verify(proof, root, index, element);
        debug!(tree, %block_hash, index, depth = proof.len(), valid, "verified proof of inclusion");
        valid
    }
}

impl BeaconReader for HeaderStore {
    fn last_hash(&self) -> B256 {
        self.beacon.block_hash
    }

    fn last_epoch(&self) -> u64 {
        self.beacon.epoch
    }
}

impl BlockRelay for HeaderStore {
    /// Record a new block and move the beacon to it.
    ///
    /// Epochs are not checked for ordering; the submitter is trusted.
    fn submit_block(
        &mut self,
        caller: Address,
        block_hash: B256,
        epoch: u64,
        dr_root: B256,
        tally_root: B256,
    ) -> Result<NewBlock, RelayError> {
        self.guard.authorize(&caller)?;

        if self.duplicate_policy == DuplicatePolicy::Reject && self.blocks.contains_key(&block_hash)
        {
            warn!(%block_hash, "rejected duplicate block submission");
            return Err(RelayError::BlockAlreadyExists { block_hash });
        }

        let existing = self.blocks.get(&block_hash);
        // The beacon block linking to itself would break the vote chain.
        let previous_vote_hash = match existing {
            Some(old) if block_hash == self.beacon.block_hash => old.previous_vote_hash,
            _ => self.beacon.block_hash,
        };
        // A paid block stays paid while the same relayer resubmits it.
        let is_paid = existing.is_some_and(|old| old.is_paid && old.relayer == caller);

        let record = BlockRecord {
            dr_merkle_root: dr_root,
            tally_merkle_root: tally_root,
            previous_vote_hash,
            relayer: caller,
            is_paid,
        };

        if self.blocks.insert(block_hash, record).is_some() {
            warn!(%block_hash, "overwrote existing block record");
        }
        self.beacon = Beacon { block_hash, epoch };

        info!(%block_hash, epoch, relayer = %caller, "new block relayed");

        let event = NewBlock {
            relayer: caller,
            block_hash,
        };
        for observer in &self.observers {
            observer.on_new_block(&event);
        }
        Ok(event)
    }

    fn contains_block(&self, block_hash: &B256) -> bool {
        self.blocks.contains_key(block_hash)
    }

    fn read_relayer_address(&self, block_hash: &B256) -> Address {
        self.blocks
            .get(block_hash)
            .map(|r| r.relayer)
            .unwrap_or(Address::ZERO)
    }

    fn verify_dr_poi(&self, proof: &[B256], block_hash: &B256, index: u64, element: B256) -> bool {
        self.verify_against(
            "dr",
            self.dr_merkle_root(block_hash),
            proof,
            block_hash,
            index,
            element,
        )
    }

    fn verify_tally_poi(
        &self,
        proof: &[B256],
        block_hash: &B256,
        index: u64,
        element: B256,
    ) -> bool {
        self.verify_against(
            "tally",
            self.tally_merkle_root(block_hash),
            proof,
            block_hash,
            index,
            element,
        )
    }

    fn is_upgradable(&self, candidate: &Address) -> bool {
        self.guard.is_upgradable(candidate)
    }
}

impl fmt::Debug for HeaderStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderStore")
            .field("guard", &self.guard)
            .field("duplicate_policy", &self.duplicate_policy)
            .field("beacon", &self.beacon)
            .field("blocks", &self.blocks.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}
