//! Upgrade path between relay versions.
//!
//! The proxy fronts one current relay plus every version it replaced. New
//! submissions and beacon reads go to the current version; proofs are checked
//! by whichever version stored the block.

use std::fmt;

use alloy_primitives::{Address, B256};
use thiserror::Error;
use tracing::{info, warn};

use super::{BeaconReader, BlockRelay, RelayError};
use crate::types::beacon::NewBlock;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProxyError {
    #[error("Not upgradable: the current relay does not accept upgrades from {caller}")]
    NotUpgradable { caller: Address },
}

type DynRelay = dyn BlockRelay + Send + Sync;

struct Controller {
    relay: Box<DynRelay>,
    /// First epoch this version is responsible for.
    first_epoch: u64,
}

pub struct RelayProxy {
    current: Controller,
    /// Replaced versions, oldest first.
    retired: Vec<Controller>,
}

impl RelayProxy {
    pub fn new(relay: impl BlockRelay + Send + Sync + 'static) -> Self {
        Self {
            current: Controller {
                relay: Box::new(relay),
                first_epoch: 0,
            },
            retired: Vec::new(),
        }
    }

    pub fn current(&self) -> &DynRelay {
        self.current.relay.as_ref()
    }

    pub fn current_mut(&mut self) -> &mut DynRelay {
        self.current.relay.as_mut()
    }

    /// Number of relay versions ever installed, including the current one.
    pub fn versions(&self) -> usize {
        self.retired.len() + 1
    }

    /// Replace the current relay. Only an identity the current relay deems
    /// upgradable may do this. The new version serves epochs after the
    /// current beacon, and never starts below the version it replaces.
    pub fn upgrade(
        &mut self,
        caller: Address,
        relay: impl BlockRelay + Send + Sync + 'static,
    ) -> Result<(), ProxyError> {
        if !self.current.relay.is_upgradable(&caller) {
            warn!(%caller, "rejected relay upgrade");
            return Err(ProxyError::NotUpgradable { caller });
        }

        let first_epoch = self
            .current
            .relay
            .last_epoch()
            .saturating_add(1)
            .max(self.current.first_epoch);
        let previous = std::mem::replace(
            &mut self.current,
            Controller {
                relay: Box::new(relay),
                first_epoch,
            },
        );
        self.retired.push(previous);

        info!(%caller, first_epoch, versions = self.versions(), "relay upgraded");
        Ok(())
    }

    /// The version responsible for `epoch`.
    pub fn controller_for_epoch(&self, epoch: u64) -> &DynRelay {
        self.newest_first()
            .find(|c| c.first_epoch <= epoch)
            .map_or(self.oldest().relay.as_ref(), |c| c.relay.as_ref())
    }

    /// The newest version holding a record for `block_hash`.
    pub fn controller_for_block(&self, block_hash: &B256) -> Option<&DynRelay> {
        self.newest_first()
            .find(|c| c.relay.contains_block(block_hash))
            .map(|c| c.relay.as_ref())
    }

    fn newest_first(&self) -> impl Iterator<Item = &Controller> {
        std::iter::once(&self.current).chain(self.retired.iter().rev())
    }

    fn oldest(&self) -> &Controller {
        self.retired.first().unwrap_or(&self.current)
    }

    /// Newest version that has a beacon. A freshly installed version has
    /// none until its first submission, so reads fall back to its predecessor.
    fn beacon_source(&self) -> &DynRelay {
        self.newest_first()
            .map(|c| c.relay.as_ref())
            .find(|r| r.last_hash() != B256::ZERO || r.last_epoch() != 0)
            .unwrap_or(self.current.relay.as_ref())
    }
}

impl BeaconReader for RelayProxy {
    fn last_hash(&self) -> B256 {
        self.beacon_source().last_hash()
    }

    fn last_epoch(&self) -> u64 {
        self.beacon_source().last_epoch()
    }
}

impl BlockRelay for RelayProxy {
    fn submit_block(
        &mut self,
        caller: Address,
        block_hash: B256,
        epoch: u64,
        dr_root: B256,
        tally_root: B256,
    ) -> Result<NewBlock, RelayError> {
        self.current_mut()
            .submit_block(caller, block_hash, epoch, dr_root, tally_root)
    }

    fn contains_block(&self, block_hash: &B256) -> bool {
        self.controller_for_block(block_hash).is_some()
    }

    fn read_relayer_address(&self, block_hash: &B256) -> Address {
        self.controller_for_block(block_hash)
            .map_or(Address::ZERO, |r| r.read_relayer_address(block_hash))
    }

    fn verify_dr_poi(&self, proof: &[B256], block_hash: &B256, index: u64, element: B256) -> bool {
        self.controller_for_block(block_hash)
            .is_some_and(|r| r.verify_dr_poi(proof, block_hash, index, element))
    }

    fn verify_tally_poi(
        &self,
        proof: &[B256],
        block_hash: &B256,
        index: u64,
        element: B256,
    ) -> bool {
        self.controller_for_block(block_hash)
            .is_some_and(|r| r.verify_tally_poi(proof, block_hash, index, element))
    }

    fn is_upgradable(&self, candidate: &Address) -> bool {
        self.current.relay.is_upgradable(candidate)
    }
}

impl fmt::Debug for RelayProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let epochs: Vec<u64> = self
            .retired
            .iter()
            .chain(std::iter::once(&self.current))
            .map(|c| c.first_epoch)
            .collect();
        f.debug_struct("RelayProxy")
            .field("first_epochs", &epochs)
            .finish()
    }
}
