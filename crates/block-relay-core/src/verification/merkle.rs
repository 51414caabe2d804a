use alloy_primitives::B256;
use sha2::{Digest, Sha256};
use tracing::trace;

/// Verify a proof of inclusion against a known Merkle root.
///
/// Walks from the leaf to the root. At each level the low bit of `index` says
/// which side the running hash occupies: even means left child, odd means
/// right child. The folded hash must equal `root`.
///
/// An index with bits set above the proof depth is rejected even when the
/// folded hash matches `root`, otherwise the same proof would verify under
/// many aliased positions.
pub fn verify(proof: &[B256], root: B256, index: u64, leaf: B256) -> bool {
    if !index_fits_depth(index, proof.len()) {
        trace!(index, depth = proof.len(), "index exceeds proof depth");
        return false;
    }

    compute_root(proof, index, leaf) == root
}

/// Fold `leaf` up through `proof` and return the resulting root.
pub fn compute_root(proof: &[B256], index: u64, leaf: B256) -> B256 {
    let mut current = leaf;
    let mut index = index;

    for sibling in proof {
        current = if index & 1 == 0 {
            sha256_pair(&current, sibling)
        } else {
            sha256_pair(sibling, &current)
        };
        index >>= 1;
    }

    current
}

/// SHA256 of two 32-byte nodes concatenated, left first.
pub fn sha256_pair(left: &B256, right: &B256) -> B256 {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    let digest: [u8; 32] = hasher.finalize().into();
    B256::from(digest)
}

fn index_fits_depth(index: u64, depth: usize) -> bool {
    depth >= u64::BITS as usize || index >> depth == 0
}
