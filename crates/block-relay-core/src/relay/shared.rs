use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use alloy_primitives::{Address, B256};

use super::store::HeaderStore;
use super::{BeaconReader, BlockRelay, RelayError};
use crate::types::beacon::{BlockRecord, NewBlock, BEACON_LEN};

/// A cloneable handle to one [`HeaderStore`].
///
/// Submissions are serialized behind the write lock; reads share the read lock
/// and may run concurrently with each other. A reader sees a block either
/// fully recorded or not at all.
#[derive(Clone, Debug)]
pub struct SharedRelay {
    inner: Arc<RwLock<HeaderStore>>,
}

impl SharedRelay {
    pub fn new(store: HeaderStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    // A panic can't leave a record half-written (submission assigns whole
    // values), so a poisoned lock still guards consistent state.
    fn read(&self) -> RwLockReadGuard<'_, HeaderStore> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HeaderStore> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn submit_block(
        &self,
        caller: Address,
        block_hash: B256,
        epoch: u64,
        dr_root: B256,
        tally_root: B256,
    ) -> Result<NewBlock, RelayError> {
        self.write()
            .submit_block(caller, block_hash, epoch, dr_root, tally_root)
    }

    /// A copy of the record for `block_hash`, if any.
    pub fn block(&self, block_hash: &B256) -> Option<BlockRecord> {
        self.read().block(block_hash).cloned()
    }

    pub fn read_relayer_address(&self, block_hash: &B256) -> Address {
        self.read().read_relayer_address(block_hash)
    }

    pub fn verify_dr_poi(&self, proof: &[B256], block_hash: &B256, index: u64, element: B256) -> bool {
        self.read().verify_dr_poi(proof, block_hash, index, element)
    }

    pub fn verify_tally_poi(
        &self,
        proof: &[B256],
        block_hash: &B256,
        index: u64,
        element: B256,
    ) -> bool {
        self.read()
            .verify_tally_poi(proof, block_hash, index, element)
    }

    /// Run `f` with exclusive access, e.g. to settle payments.
    pub fn with_store_mut<T>(&self, f: impl FnOnce(&mut HeaderStore) -> T) -> T {
        f(&mut self.write())
    }
}

impl BeaconReader for SharedRelay {
    fn last_hash(&self) -> B256 {
        self.read().last_hash()
    }

    fn last_epoch(&self) -> u64 {
        self.read().last_epoch()
    }

    // One lock so hash and epoch come from the same submission.
    fn last_beacon(&self) -> [u8; BEACON_LEN] {
        self.read().beacon().encode()
    }
}
