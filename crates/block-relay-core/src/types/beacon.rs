use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Number of bytes in an encoded beacon: 32-byte block hash followed by the
/// epoch as a 32-byte big-endian word.
pub const BEACON_LEN: usize = 64;

/// The latest block pointer published by the relay.
/// Exactly one exists per store; it is overwritten by every accepted submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beacon {
    /// Hash of the most recently submitted block.
    pub block_hash: B256,
    /// Source chain epoch of that block.
    pub epoch: u64,
}

impl Beacon {
    /// The payload downstream signers attest to: `block_hash ‖ epoch`.
    ///
    /// The epoch occupies a full 32-byte big-endian word, matching the packed
    /// `uint256` layout consumers on the target chain hash over.
    pub fn encode(&self) -> [u8; BEACON_LEN] {
        let mut out = [0u8; BEACON_LEN];
        out[..32].copy_from_slice(self.block_hash.as_slice());
        out[32..].copy_from_slice(&U256::from(self.epoch).to_be_bytes::<32>());
        out
    }

    /// Hex form of [`Beacon::encode`], without a 0x prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.encode())
    }

    /// True until the first block is submitted.
    pub fn is_empty(&self) -> bool {
        self.block_hash == B256::ZERO && self.epoch == 0
    }
}

/// Everything the relay remembers about one submitted block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Merkle root over the block's data-request records.
    pub dr_merkle_root: B256,
    /// Merkle root over the block's tally records.
    pub tally_merkle_root: B256,
    /// Hash of the block this one extends (the beacon it replaced).
    pub previous_vote_hash: B256,
    /// Identity that submitted the block.
    pub relayer: Address,
    /// Whether the relayer has been rewarded for this block.
    pub is_paid: bool,
}

/// Notification emitted on every accepted submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBlock {
    pub relayer: Address,
    pub block_hash: B256,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_beacon_encoding_layout() {
        let beacon = Beacon {
            block_hash: B256::repeat_byte(0xAB),
            epoch: 10,
        };

        let encoded = beacon.encode();
        assert_eq!(encoded[..32], [0xAB; 32]);
        assert_eq!(encoded[32..63], [0u8; 31]);
        assert_eq!(encoded[63], 10);
    }

    #[test]
    fn test_beacon_encoding_large_epoch() {
        let beacon = Beacon {
            block_hash: B256::ZERO,
            epoch: 0x0102_0304_0506_0708,
        };

        let encoded = beacon.encode();
        assert_eq!(encoded[56..], hex!("0102030405060708"));
        assert_eq!(encoded[32..56], [0u8; 24]);
    }

    #[test]
    fn test_empty_beacon() {
        let beacon = Beacon::default();
        assert!(beacon.is_empty());
        assert_eq!(beacon.encode(), [0u8; BEACON_LEN]);
        assert_eq!(beacon.to_hex(), "0".repeat(128));
    }
}
