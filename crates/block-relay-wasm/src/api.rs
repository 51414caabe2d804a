//! JSON and hex boundary format.
//!
//! JavaScript hosts pass hashes and identities as 0x-prefixed hex strings and
//! numbers as decimal strings (so 64-bit epochs survive JSON). This module
//! converts them into core types and back.

use block_relay_core::{Address, NewBlock, PoiProof, B256};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Hex conversion helpers
// ---------------------------------------------------------------------------

pub fn hex_to_b256(s: &str) -> Result<B256, String> {
    let bytes = hex_to_bytes(s)?;
    if bytes.len() != 32 {
        return Err(format!("expected 32 bytes, got {}", bytes.len()));
    }
    Ok(B256::from_slice(&bytes))
}

pub fn hex_to_address(s: &str) -> Result<Address, String> {
    let bytes = hex_to_bytes(s)?;
    if bytes.len() != 20 {
        return Err(format!("expected 20 bytes, got {}", bytes.len()));
    }
    Ok(Address::from_slice(&bytes))
}

pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, String> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(|e| format!("hex decode: {}", e))
}

pub fn to_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn parse_u64_string(s: &str) -> Result<u64, String> {
    s.parse::<u64>().map_err(|e| format!("parse u64: {}", e))
}

// ---------------------------------------------------------------------------
// Block submission
// ---------------------------------------------------------------------------

/// A block header as posted by a relayer process.
#[derive(Deserialize)]
pub struct ApiSubmission {
    pub block_hash: String,
    pub epoch: String,
    pub dr_merkle_root: String,
    pub tally_merkle_root: String,
}

/// [`ApiSubmission`] with every field decoded.
#[derive(Debug, PartialEq, Eq)]
pub struct Submission {
    pub block_hash: B256,
    pub epoch: u64,
    pub dr_root: B256,
    pub tally_root: B256,
}

impl ApiSubmission {
    pub fn to_core(&self) -> Result<Submission, String> {
        Ok(Submission {
            block_hash: hex_to_b256(&self.block_hash).map_err(|e| format!("block_hash: {}", e))?,
            epoch: parse_u64_string(&self.epoch).map_err(|e| format!("epoch: {}", e))?,
            dr_root: hex_to_b256(&self.dr_merkle_root)
                .map_err(|e| format!("dr_merkle_root: {}", e))?,
            tally_root: hex_to_b256(&self.tally_merkle_root)
                .map_err(|e| format!("tally_merkle_root: {}", e))?,
        })
    }
}

// ---------------------------------------------------------------------------
// Proofs
// ---------------------------------------------------------------------------

/// A proof of inclusion as posted by a host:
/// `{ "siblings": ["0x..", ..], "index": n }`, siblings leaf level first.
#[derive(Deserialize)]
pub struct ApiPoiProof {
    pub siblings: Vec<String>,
    pub index: u64,
}

impl ApiPoiProof {
    pub fn to_core(&self) -> Result<PoiProof, String> {
        let siblings = self
            .siblings
            .iter()
            .enumerate()
            .map(|(i, s)| hex_to_b256(s).map_err(|e| format!("sibling {}: {}", i, e)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PoiProof::new(siblings, self.index))
    }
}

pub fn parse_poi_proof(json: &str) -> Result<PoiProof, String> {
    let api: ApiPoiProof =
        serde_json::from_str(json).map_err(|e| format!("proof JSON: {}", e))?;
    api.to_core()
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct NewBlockResponse {
    pub relayer: String,
    pub block_hash: String,
}

impl From<NewBlock> for NewBlockResponse {
    fn from(event: NewBlock) -> Self {
        Self {
            relayer: to_hex(event.relayer),
            block_hash: to_hex(event.block_hash),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_b256() {
        let hash = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        assert_eq!(hex_to_b256(hash).unwrap(), B256::repeat_byte(0xAA));

        let no_prefix = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
        assert_eq!(hex_to_b256(no_prefix).unwrap(), B256::repeat_byte(0xBB));
    }

    #[test]
    fn test_hex_to_b256_invalid_length() {
        assert!(hex_to_b256("0xaabb").is_err());
        assert!(hex_to_b256("0xzz").is_err());
    }

    #[test]
    fn test_hex_to_address() {
        let addr = hex_to_address("0x1111111111111111111111111111111111111111").unwrap();
        assert_eq!(addr, Address::repeat_byte(0x11));
        assert!(hex_to_address("0x11").is_err());
    }

    #[test]
    fn test_submission_to_core() {
        let json = r#"{
            "block_hash": "0x0101010101010101010101010101010101010101010101010101010101010101",
            "epoch": "10",
            "dr_merkle_root": "0x0202020202020202020202020202020202020202020202020202020202020202",
            "tally_merkle_root": "0x0303030303030303030303030303030303030303030303030303030303030303"
        }"#;
        let api: ApiSubmission = serde_json::from_str(json).unwrap();
        let submission = api.to_core().unwrap();

        assert_eq!(
            submission,
            Submission {
                block_hash: B256::repeat_byte(1),
                epoch: 10,
                dr_root: B256::repeat_byte(2),
                tally_root: B256::repeat_byte(3),
            }
        );
    }

    #[test]
    fn test_submission_bad_epoch() {
        let api = ApiSubmission {
            block_hash: to_hex(B256::ZERO),
            epoch: "ten".into(),
            dr_merkle_root: to_hex(B256::ZERO),
            tally_merkle_root: to_hex(B256::ZERO),
        };
        let err = api.to_core().unwrap_err();
        assert!(err.starts_with("epoch:"), "{err}");
    }

    #[test]
    fn test_parse_poi_proof() {
        let json = format!(
            r#"{{"siblings": ["{}", "{}"], "index": 3}}"#,
            to_hex([1u8; 32]),
            to_hex([2u8; 32])
        );
        let proof = parse_poi_proof(&json).unwrap();
        assert_eq!(
            proof,
            PoiProof::new(vec![B256::repeat_byte(1), B256::repeat_byte(2)], 3)
        );

        let empty = parse_poi_proof(r#"{"siblings": [], "index": 0}"#).unwrap();
        assert_eq!(empty.depth(), 0);

        assert!(parse_poi_proof(r#"{"siblings": ["0x01"], "index": 0}"#)
            .unwrap_err()
            .starts_with("sibling 0"));
        assert!(parse_poi_proof(r#"["0x01"]"#)
            .unwrap_err()
            .starts_with("proof JSON"));
    }

    #[test]
    fn test_new_block_response() {
        let response = NewBlockResponse::from(NewBlock {
            relayer: Address::repeat_byte(0x11),
            block_hash: B256::repeat_byte(0x22),
        });
        assert_eq!(response.relayer, format!("0x{}", "11".repeat(20)));
        assert_eq!(response.block_hash, format!("0x{}", "22".repeat(32)));
    }
}
