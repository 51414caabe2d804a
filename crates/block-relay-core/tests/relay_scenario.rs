use block_relay_core::{
    sha256_pair, Address, BeaconReader, BlockRelay, HeaderStore, NoopRewardSink, PaymentStatus,
    PoiProof, RelayConfig, RelayError, RelayProxy, RelayerLedger, B256,
};
use hex_literal::hex;

const SUBMITTER: Address = Address::new([0x11; 20]);
const STRANGER: Address = Address::new([0x22; 20]);

/// Two-level tree over four records; returns (root, proof for `index`).
fn four_leaf_tree(leaves: [B256; 4], index: usize) -> (B256, PoiProof) {
    let left = sha256_pair(&leaves[0], &leaves[1]);
    let right = sha256_pair(&leaves[2], &leaves[3]);
    let root = sha256_pair(&left, &right);

    let (sibling, uncle) = match index {
        0 => (leaves[1], right),
        1 => (leaves[0], right),
        2 => (leaves[3], left),
        _ => (leaves[2], left),
    };
    (root, PoiProof::new(vec![sibling, uncle], index as u64))
}

#[test]
fn submit_two_blocks_then_query() {
    let h1 = B256::from(hex!(
        "1111111111111111111111111111111111111111111111111111111111111111"
    ));
    let h2 = B256::from(hex!(
        "2222222222222222222222222222222222222222222222222222222222222222"
    ));
    let d1 = B256::repeat_byte(0xD1);
    let t1 = B256::repeat_byte(0x71);

    let mut store = HeaderStore::new(SUBMITTER);
    assert_eq!(store.read_relayer_address(&h1), Address::ZERO);

    store.submit_block(SUBMITTER, h1, 10, d1, t1).unwrap();

    let mut expected = [0u8; 64];
    expected[..32].copy_from_slice(h1.as_slice());
    expected[63] = 10;
    assert_eq!(store.last_beacon(), expected);

    store
        .submit_block(SUBMITTER, h2, 11, B256::repeat_byte(0xD2), B256::repeat_byte(0x72))
        .unwrap();
    assert_eq!(store.last_hash(), h2);
    assert_eq!(store.last_epoch(), 11);
    assert_eq!(store.read_relayer_address(&h1), SUBMITTER);
    assert_eq!(store.dr_merkle_root(&h1), Some(d1));
}

#[test]
fn stranger_cannot_submit() {
    let mut store = HeaderStore::new(SUBMITTER);
    let before = store.last_beacon();

    let result = store.submit_block(
        STRANGER,
        B256::repeat_byte(1),
        1,
        B256::repeat_byte(2),
        B256::repeat_byte(3),
    );
    assert_eq!(result, Err(RelayError::Unauthorized { caller: STRANGER }));
    assert_eq!(store.last_beacon(), before);
    assert!(store.is_empty());
}

#[test]
fn tally_inclusion_end_to_end() {
    let tallies = [
        B256::repeat_byte(0x01),
        B256::repeat_byte(0x02),
        B256::repeat_byte(0x03),
        B256::repeat_byte(0x04),
    ];
    let (tally_root, proof) = four_leaf_tree(tallies, 2);
    let block = B256::repeat_byte(0xB0);

    let mut store = HeaderStore::new(SUBMITTER);
    store
        .submit_block(SUBMITTER, block, 42, B256::ZERO, tally_root)
        .unwrap();

    assert!(proof.verify(tally_root, tallies[2]));
    assert!(store.verify_tally_poi(&proof.siblings, &block, proof.index, tallies[2]));

    for level in 0..proof.depth() {
        let mut corrupted = proof.clone();
        corrupted.siblings[level] = B256::repeat_byte(0xEE);
        assert!(!store.verify_tally_poi(&corrupted.siblings, &block, corrupted.index, tallies[2]));
    }
}

#[test]
fn payment_lifecycle() {
    let config = RelayConfig::new(SUBMITTER);
    let mut store = HeaderStore::from_config(&config);
    let mut ledger = RelayerLedger::new(config.payer(), NoopRewardSink);
    let block = B256::repeat_byte(0xB1);

    store
        .submit_block(SUBMITTER, block, 7, B256::ZERO, B256::ZERO)
        .unwrap();
    assert!(!ledger.is_relayer_paid(&store, &block));

    assert_eq!(
        ledger.pay_relayer(&mut store, SUBMITTER, block),
        Ok(PaymentStatus::Paid)
    );
    assert!(ledger.is_relayer_paid(&store, &block));
    assert_eq!(
        ledger.pay_relayer(&mut store, SUBMITTER, block),
        Ok(PaymentStatus::AlreadyPaid)
    );
}

#[test]
fn upgrade_keeps_history_verifiable() {
    let dr = [
        B256::repeat_byte(0x0A),
        B256::repeat_byte(0x0B),
        B256::repeat_byte(0x0C),
        B256::repeat_byte(0x0D),
    ];
    let (dr_root, proof) = four_leaf_tree(dr, 1);
    let old_block = B256::repeat_byte(0xC1);
    let new_submitter = Address::new([0x55; 20]);

    let mut proxy = RelayProxy::new(HeaderStore::new(SUBMITTER));
    proxy
        .submit_block(SUBMITTER, old_block, 100, dr_root, B256::ZERO)
        .unwrap();
    assert!(proxy.upgrade(STRANGER, HeaderStore::new(new_submitter)).is_err());
    proxy
        .upgrade(SUBMITTER, HeaderStore::new(new_submitter))
        .unwrap();

    proxy
        .submit_block(new_submitter, B256::repeat_byte(0xC2), 101, B256::ZERO, B256::ZERO)
        .unwrap();

    assert_eq!(proxy.last_epoch(), 101);
    assert!(proxy.verify_dr_poi(&proof.siblings, &old_block, proof.index, dr[1]));
    assert_eq!(proxy.read_relayer_address(&old_block), SUBMITTER);
}
