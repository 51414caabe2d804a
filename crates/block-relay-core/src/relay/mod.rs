//! The authenticated header store and the components layered on it.

pub mod access;
pub mod ledger;
pub mod proxy;
pub mod shared;
pub mod store;

use alloy_primitives::{Address, B256};
use thiserror::Error;

use crate::types::beacon::{Beacon, NewBlock, BEACON_LEN};

pub use access::AccessGuard;
pub use ledger::{NoopRewardSink, PaymentError, PaymentStatus, RelayerLedger, RewardSink};
pub use proxy::{ProxyError, RelayProxy};
pub use shared::SharedRelay;
pub use store::{BlockObserver, HeaderStore};

/// Errors from mutating relay operations. A failed call changes nothing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("Unauthorized: {caller} is not the designated submitter")]
    Unauthorized { caller: Address },

    #[error("Block {block_hash} was already submitted")]
    BlockAlreadyExists { block_hash: B256 },
}

/// Read-only view of the latest beacon, for consumers that sign over it or
/// act on it.
pub trait BeaconReader {
    fn last_hash(&self) -> B256;

    fn last_epoch(&self) -> u64;

    /// `last_hash ‖ last_epoch` as 64 bytes.
    fn last_beacon(&self) -> [u8; BEACON_LEN] {
        Beacon {
            block_hash: self.last_hash(),
            epoch: self.last_epoch(),
        }
        .encode()
    }
}

/// The surface every relay version exposes, so versions can be swapped behind
/// a [`RelayProxy`].
pub trait BlockRelay: BeaconReader {
    fn submit_block(
        &mut self,
        caller: Address,
        block_hash: B256,
        epoch: u64,
        dr_root: B256,
        tally_root: B256,
    ) -> Result<NewBlock, RelayError>;

    fn contains_block(&self, block_hash: &B256) -> bool;

    /// Submitter of `block_hash`, or the zero address if it was never submitted.
    fn read_relayer_address(&self, block_hash: &B256) -> Address;

    fn verify_dr_poi(&self, proof: &[B256], block_hash: &B256, index: u64, element: B256) -> bool;

    fn verify_tally_poi(
        &self,
        proof: &[B256],
        block_hash: &B256,
        index: u64,
        element: B256,
    ) -> bool;

    /// Whether `candidate` may migrate this relay to a new version.
    fn is_upgradable(&self, candidate: &Address) -> bool;
}
