//! # Block Relay WASM
//!
//! WebAssembly bindings for the block relay.
//! This crate bridges `block-relay-core`'s pure Rust store and verifier to
//! JavaScript via `wasm-bindgen`.
//!
//! ## Architecture
//!
//! - All state and all proof checks live in Rust/WASM (never in JS)
//! - Hashes and identities cross the boundary as 0x-prefixed hex strings
//! - Proofs cross the boundary as JSON `{ "siblings": [..], "index": n }`
//! - Reward transfers are queued for the host to settle; see
//!   `take_pending_payouts`

mod api;
mod state;

use block_relay_core::{
    Address, BeaconReader, BlockRelay, HeaderStore, PaymentStatus, PoiProof, RelayConfig,
    RelayerLedger, B256,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use api::{
    hex_to_address, hex_to_b256, parse_poi_proof, to_hex, ApiSubmission, NewBlockResponse,
};
use state::{PayoutQueue, RelayStats};

/// Set up panic hook on WASM initialization.
/// This ensures Rust panics are logged to the browser console with full stack traces.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// The relay as seen from JavaScript: one header store plus its ledger.
#[wasm_bindgen]
pub struct BlockRelayClient {
    store: HeaderStore,
    ledger: RelayerLedger<PayoutQueue>,
    stats: RelayStats,
}

#[wasm_bindgen]
impl BlockRelayClient {
    /// Create a relay from a JSON config:
    /// `{ "submitter": "0x..", "payer": "0x..", "duplicate_policy": "overwrite" | "reject" }`.
    /// Only `submitter` is required.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<BlockRelayClient, JsValue> {
        let config = RelayConfig::from_json(config_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log_to_console(&format!(
            "[Relay] Initialized with submitter {} (payer {}, duplicates: {:?})",
            config.submitter,
            config.payer(),
            config.duplicate_policy
        ));

        Ok(BlockRelayClient {
            store: HeaderStore::from_config(&config),
            ledger: RelayerLedger::new(config.payer(), PayoutQueue::new()),
            stats: RelayStats::new(),
        })
    }

    /// Record a new block. Returns the `{ relayer, block_hash }` event.
    /// Fails if `caller` is not the configured submitter.
    pub fn submit_block(
        &mut self,
        caller: &str,
        block_hash: &str,
        epoch: u64,
        dr_root: &str,
        tally_root: &str,
    ) -> Result<JsValue, JsValue> {
        let caller = hex_to_address(caller).map_err(|e| invalid("caller", e))?;
        let block_hash = hex_to_b256(block_hash).map_err(|e| invalid("block hash", e))?;
        let dr_root = hex_to_b256(dr_root).map_err(|e| invalid("dr root", e))?;
        let tally_root = hex_to_b256(tally_root).map_err(|e| invalid("tally root", e))?;

        self.submit(caller, block_hash, epoch, dr_root, tally_root)
    }

    /// Record a new block from its JSON form:
    /// `{ "block_hash", "epoch" (decimal string), "dr_merkle_root", "tally_merkle_root" }`.
    pub fn submit_block_json(
        &mut self,
        caller: &str,
        submission_json: &str,
    ) -> Result<JsValue, JsValue> {
        let caller = hex_to_address(caller).map_err(|e| invalid("caller", e))?;
        let api: ApiSubmission = serde_json::from_str(submission_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid submission JSON: {}", e)))?;
        let submission = api
            .to_core()
            .map_err(|e| JsValue::from_str(&format!("Submission conversion: {}", e)))?;

        self.submit(
            caller,
            submission.block_hash,
            submission.epoch,
            submission.dr_root,
            submission.tally_root,
        )
    }

    /// The 64-byte beacon (`block_hash ‖ epoch`) as hex.
    pub fn last_beacon(&self) -> String {
        to_hex(self.store.last_beacon())
    }

    pub fn last_epoch(&self) -> u64 {
        self.store.last_epoch()
    }

    pub fn last_hash(&self) -> String {
        to_hex(self.store.last_hash())
    }

    /// Check a data-request record against the block's stored root.
    /// `proof_json` is `{ "siblings": [hex, ..], "index": n }`, siblings leaf level first.
    pub fn verify_dr_poi(
        &mut self,
        proof_json: &str,
        block_hash: &str,
        element: &str,
    ) -> Result<bool, JsValue> {
        let (proof, block_hash, element) = parse_poi(proof_json, block_hash, element)?;
        let valid = self
            .store
            .verify_dr_poi(&proof.siblings, &block_hash, proof.index, element);
        self.stats.record_proof(valid);
        Ok(valid)
    }

    /// Check a tally record against the block's stored root.
    pub fn verify_tally_poi(
        &mut self,
        proof_json: &str,
        block_hash: &str,
        element: &str,
    ) -> Result<bool, JsValue> {
        let (proof, block_hash, element) = parse_poi(proof_json, block_hash, element)?;
        let valid = self
            .store
            .verify_tally_poi(&proof.siblings, &block_hash, proof.index, element);
        self.stats.record_proof(valid);
        Ok(valid)
    }

    /// Submitter of the block, or the zero address if it was never submitted.
    pub fn read_relayer_address(&self, block_hash: &str) -> Result<String, JsValue> {
        let block_hash = hex_to_b256(block_hash).map_err(|e| invalid("block hash", e))?;
        Ok(to_hex(self.store.read_relayer_address(&block_hash)))
    }

    pub fn is_relayer_paid(&self, block_hash: &str) -> Result<bool, JsValue> {
        let block_hash = hex_to_b256(block_hash).map_err(|e| invalid("block hash", e))?;
        Ok(self.ledger.is_relayer_paid(&self.store, &block_hash))
    }

    /// Settle the relayer of a block. Returns `"paid"` or `"already_paid"`.
    /// The transfer itself is queued; drain it with `take_pending_payouts`.
    pub fn pay_relayer(&mut self, caller: &str, block_hash: &str) -> Result<String, JsValue> {
        let caller = hex_to_address(caller).map_err(|e| invalid("caller", e))?;
        let block_hash = hex_to_b256(block_hash).map_err(|e| invalid("block hash", e))?;

        let status = self
            .ledger
            .pay_relayer(&mut self.store, caller, block_hash)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(match status {
            PaymentStatus::Paid => {
                self.stats.record_payment();
                log_to_console(&format!("[Relay] Payout queued for block {}", block_hash));
                "paid".to_string()
            }
            PaymentStatus::AlreadyPaid => "already_paid".to_string(),
        })
    }

    pub fn is_upgradable(&self, candidate: &str) -> Result<bool, JsValue> {
        let candidate = hex_to_address(candidate).map_err(|e| invalid("candidate", e))?;
        Ok(self.store.is_upgradable(&candidate))
    }

    /// Remove and return queued payouts as `[{ relayer, block_hash }]`.
    pub fn take_pending_payouts(&mut self) -> Result<JsValue, JsValue> {
        let payouts = self.ledger.sink_mut().take();
        serde_wasm_bindgen::to_value(&payouts)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Counters and store size as JSON for the TypeScript layer.
    pub fn get_stats(&self) -> Result<JsValue, JsValue> {
        let response = StatsResponse {
            stats: self.stats.clone(),
            blocks_stored: self.store.len(),
            pending_payouts: self.ledger.sink().len(),
            last_epoch: self.store.last_epoch(),
            proof_success_rate: self.stats.proof_success_rate(),
        };
        serde_wasm_bindgen::to_value(&response)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

impl BlockRelayClient {
    fn submit(
        &mut self,
        caller: Address,
        block_hash: B256,
        epoch: u64,
        dr_root: B256,
        tally_root: B256,
    ) -> Result<JsValue, JsValue> {
        match self
            .store
            .submit_block(caller, block_hash, epoch, dr_root, tally_root)
        {
            Ok(event) => {
                self.stats.record_submission(true);
                log_to_console(&format!(
                    "[Relay] Block {} accepted at epoch {}",
                    block_hash, epoch
                ));
                serde_wasm_bindgen::to_value(&NewBlockResponse::from(event))
                    .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
            }
            Err(e) => {
                self.stats.record_submission(false);
                log_to_console(&format!("[Relay] Submission rejected: {}", e));
                Err(JsValue::from_str(&e.to_string()))
            }
        }
    }
}

#[derive(Serialize)]
struct StatsResponse {
    #[serde(flatten)]
    stats: RelayStats,
    blocks_stored: usize,
    pending_payouts: usize,
    last_epoch: u64,
    proof_success_rate: f64,
}

type PoiArgs = (PoiProof, B256, B256);

fn parse_poi(proof_json: &str, block_hash: &str, element: &str) -> Result<PoiArgs, JsValue> {
    let proof = parse_poi_proof(proof_json).map_err(|e| invalid("proof", e))?;
    let block_hash = hex_to_b256(block_hash).map_err(|e| invalid("block hash", e))?;
    let element = hex_to_b256(element).map_err(|e| invalid("element", e))?;
    Ok((proof, block_hash, element))
}

fn invalid(what: &str, reason: String) -> JsValue {
    JsValue::from_str(&format!("Invalid {}: {}", what, reason))
}

// --- Console logging ---

fn log_to_console(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}
