use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use crate::verification::merkle;

/// A proof of inclusion: sibling hashes from the leaf level upward, plus the
/// leaf's position in the tree. Consumed once by the verifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiProof {
    /// Sibling hashes, leaf level first.
    pub siblings: Vec<B256>,
    /// Position of the leaf among the tree's leaves.
    pub index: u64,
}

impl PoiProof {
    pub fn new(siblings: Vec<B256>, index: u64) -> Self {
        Self { siblings, index }
    }

    /// Number of tree levels this proof climbs.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Check that `leaf` sits under `root` at this proof's index.
    pub fn verify(&self, root: B256, leaf: B256) -> bool {
        merkle::verify(&self.siblings, root, self.index, leaf)
    }
}
