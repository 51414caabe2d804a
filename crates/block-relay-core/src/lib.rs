//! # Block Relay Core
//!
//! Pure Rust logic for relaying finalized block headers from a source network
//! to a target chain, and for proving that a data-request or tally record was
//! included in one of those blocks.
//!
//! This crate contains **no networking code** and **no WASM dependencies**.
//!
//! ## Trust Model
//!
//! - **Header store** (`relay` module): records whatever the single authorized
//!   submitter posts. Headers are not checked against the source chain's
//!   consensus rules; trust rests on the submitter.
//!
//! - **Proof verification** (`verification` module): checks a SHA256 Merkle
//!   proof of inclusion against a root the store holds. Zero trust assumptions
//!   beyond the stored root.
//!
//! ## Usage
//!
//! ```ignore
//! use block_relay_core::{BlockRelay, BeaconReader, HeaderStore};
//!
//! let mut store = HeaderStore::new(submitter);
//! store.submit_block(submitter, block_hash, epoch, dr_root, tally_root)?;
//! let beacon = store.last_beacon();
//! let included = store.verify_tally_poi(&proof, &block_hash, index, leaf);
//! ```

pub mod config;
pub mod relay;
pub mod types;
pub mod verification;

// Re-export commonly used types for convenience
pub use config::{ConfigError, DuplicatePolicy, RelayConfig};
pub use relay::{
    AccessGuard, BeaconReader, BlockObserver, BlockRelay, HeaderStore, NoopRewardSink,
    PaymentError, PaymentStatus, ProxyError, RelayError, RelayProxy, RelayerLedger, RewardSink,
    SharedRelay,
};
pub use types::{beacon::*, proof::*};
pub use verification::merkle::{compute_root, sha256_pair, verify};

pub use alloy_primitives::{Address, B256};
