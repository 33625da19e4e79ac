use bch_slp_toolkit::api::TokenMetadataCache;
use bch_slp_toolkit::errors::AppError;
use bch_slp_toolkit::types::{SlpStatus, TransactionType, UtxoType};
use bch_slp_toolkit::SlpToolkit;
use serde_json::json;
use std::sync::Arc;

use crate::common::{fixtures, scripts, test_config, token_stats, txid, MockBackend};

struct Scenario {
    token_id: String,
    send_txid: String,
    plain_txid: String,
}

/// GENESIS (2 decimals, baton at vout 2), a SEND of [5, 10] and a plain payment
fn scenario() -> (Scenario, MockBackend) {
    let scenario = Scenario {
        token_id: txid(0x10),
        send_txid: txid(0x11),
        plain_txid: txid(0x12),
    };

    let backend = MockBackend::new()
        .with_transaction(fixtures::transaction(
            &scenario.token_id,
            &[(txid(0xf0).as_str(), 0)],
            Some(scripts::genesis("TEST", "Test Token", 2, Some(2), 1000)),
            2,
        ))
        .with_transaction(fixtures::transaction(
            &scenario.send_txid,
            &[(scenario.token_id.as_str(), 1)],
            Some(scripts::send(&scenario.token_id, &[5, 10])),
            3,
        ))
        .with_transaction(fixtures::transaction(
            &scenario.plain_txid,
            &[(txid(0xf1).as_str(), 0)],
            None,
            2,
        ))
        .with_validity(&scenario.send_txid, Some(true))
        .with_validity(&scenario.token_id, None);

    (scenario, backend)
}

#[tokio::test]
async fn test_vout_membership_decides_token_status() {
    let (s, backend) = scenario();
    let toolkit = SlpToolkit::new(Arc::new(backend), &test_config(&[]));

    let classified = toolkit
        .classify_utxos(&[
            fixtures::utxo(&s.send_txid, 1, 546),
            fixtures::utxo(&s.send_txid, 2, 546),
            fixtures::utxo(&s.send_txid, 3, 546),
            fixtures::utxo(&s.plain_txid, 0, 10_000),
        ])
        .await
        .unwrap();

    assert_eq!(classified.len(), 4);

    let first = classified[0].token.as_ref().unwrap();
    assert_eq!(classified[0].is_slp, Some(true));
    assert_eq!(classified[0].is_valid, Some(true));
    assert_eq!(first.utxo_type, UtxoType::Token);
    assert_eq!(first.transaction_type, TransactionType::Send);
    assert_eq!(first.token_id, s.token_id);
    assert_eq!(first.token_ticker, "TEST");
    assert_eq!(first.decimals, 2);
    assert_eq!(first.token_qty_str.as_deref(), Some("0.05"));

    let second = classified[1].token.as_ref().unwrap();
    assert_eq!(second.token_qty_str.as_deref(), Some("0.10"));

    // vout 3 carries no token amount
    assert_eq!(classified[2].is_slp, Some(false));
    assert!(classified[2].token.is_none());

    assert_eq!(classified[3].status(), SlpStatus::NotToken);
    assert!(classified[3].is_spendable_as_bch());
}

#[tokio::test]
async fn test_mint_baton_with_unknown_validity() {
    let (s, backend) = scenario();
    let toolkit = SlpToolkit::new(Arc::new(backend), &test_config(&[]));

    let classified = toolkit
        .classify_utxos(&[json!({"tx_hash": s.token_id, "tx_pos": 2, "value": 546})])
        .await
        .unwrap();

    let baton = &classified[0];
    assert_eq!(baton.is_slp, Some(true));
    // indexer answered valid: null
    assert_eq!(baton.is_valid, None);

    let details = baton.token.as_ref().unwrap();
    assert_eq!(details.utxo_type, UtxoType::MintBaton);
    assert_eq!(details.baton_still_exists, Some(true));
    assert!(details.token_qty.is_none());

    let value = serde_json::to_value(baton).unwrap();
    assert_eq!(value["utxoType"], json!("mint-baton"));
    assert_eq!(value["isValid"], json!(null));
    assert_eq!(value["satoshis"], json!(546));
}

#[tokio::test]
async fn test_upper_case_utxo_txid_keeps_verdict() {
    let (s, backend) = scenario();
    let toolkit = SlpToolkit::new(Arc::new(backend), &test_config(&[]));

    let classified = toolkit
        .classify_utxos(&[fixtures::utxo(&s.send_txid.to_uppercase(), 1, 546)])
        .await
        .unwrap();

    assert_eq!(classified[0].is_slp, Some(true));
    assert_eq!(classified[0].is_valid, Some(true));
}

#[tokio::test]
async fn test_lookups_are_deduplicated() {
    let (s, backend) = scenario();
    let backend = Arc::new(backend);
    let toolkit = SlpToolkit::new(Arc::clone(&backend), &test_config(&[]));

    toolkit
        .classify_utxos(&[
            fixtures::utxo(&s.send_txid, 1, 546),
            fixtures::utxo(&s.send_txid, 2, 546),
            fixtures::utxo(&s.send_txid, 3, 546),
            fixtures::utxo(&s.send_txid, 1, 546),
        ])
        .await
        .unwrap();

    assert_eq!(backend.raw_call_count(&s.send_txid), 1);
    // metadata for the token resolved once from its GENESIS
    assert_eq!(backend.raw_call_count(&s.token_id), 1);
    assert_eq!(backend.stats_call_count(), 0);

    assert_eq!(backend.validity_call_count(), 1);
    assert_eq!(
        backend.validity_calls.lock().unwrap()[0],
        vec![s.send_txid.clone()]
    );
}

#[tokio::test]
async fn test_metadata_cache_shared_across_calls() {
    let (s, backend) = scenario();
    let backend = Arc::new(backend);
    let cache = TokenMetadataCache::default();
    let toolkit =
        SlpToolkit::with_metadata_cache(Arc::clone(&backend), &test_config(&[]), cache.clone());

    let utxos = [fixtures::utxo(&s.send_txid, 1, 546)];
    toolkit.classify_utxos(&utxos).await.unwrap();
    toolkit.classify_utxos(&utxos).await.unwrap();

    assert_eq!(backend.raw_call_count(&s.token_id), 1);
    assert_eq!(cache.size(), 1);
    assert_eq!(cache.get_stats().hits, 1);
}

#[tokio::test]
async fn test_blacklisted_token_is_quarantined() {
    let (s, backend) = scenario();
    let backend = Arc::new(backend);
    let toolkit = SlpToolkit::new(Arc::clone(&backend), &test_config(&[s.token_id.as_str()]));

    let classified = toolkit
        .classify_utxos(&[
            fixtures::utxo(&s.send_txid, 1, 546),
            fixtures::utxo(&s.send_txid, 3, 546),
            fixtures::utxo(&s.plain_txid, 1, 5000),
        ])
        .await
        .unwrap();

    for quarantined in &classified[..2] {
        assert_eq!(quarantined.status(), SlpStatus::Quarantined);
        assert_eq!(quarantined.is_slp, None);
        assert_eq!(quarantined.is_valid, None);
        assert!(!quarantined.is_spendable_as_bch());
    }
    assert_eq!(classified[2].is_slp, Some(false));

    // nothing left to validate
    assert_eq!(backend.validity_call_count(), 0);
}

#[tokio::test]
async fn test_malformed_record_fails_before_any_lookup() {
    let (s, backend) = scenario();
    let backend = Arc::new(backend);
    let toolkit = SlpToolkit::new(Arc::clone(&backend), &test_config(&[]));

    let err = toolkit
        .classify_utxos(&[
            fixtures::utxo(&s.send_txid, 1, 546),
            json!({"hash": s.plain_txid, "n": 0}),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MalformedUtxo { index: 1, .. }));
    assert!(backend.raw_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_metadata_falls_back_to_token_stats() {
    let token_id = txid(0x20);
    let send_txid = txid(0x21);
    let backend = Arc::new(
        MockBackend::new()
            .with_transaction(fixtures::transaction(
                &send_txid,
                &[],
                Some(scripts::send(&token_id, &[123_456_789])),
                1,
            ))
            .with_stats(&token_id, token_stats("SPICE", 8))
            .with_validity(&send_txid, Some(false)),
    );
    let toolkit = SlpToolkit::new(Arc::clone(&backend), &test_config(&[]));

    let classified = toolkit
        .classify_utxos(&[fixtures::utxo(&send_txid, 1, 546)])
        .await
        .unwrap();

    let details = classified[0].token.as_ref().unwrap();
    assert_eq!(details.token_ticker, "SPICE");
    assert_eq!(details.token_qty_str.as_deref(), Some("1.23456789"));
    assert_eq!(classified[0].is_valid, Some(false));
    assert_eq!(backend.stats_call_count(), 1);
}

#[tokio::test]
async fn test_validity_rate_limit_propagates() {
    let (s, backend) = scenario();
    let backend = backend.with_rate_limited_validity(json!({"error": "Too many requests"}));
    let toolkit = SlpToolkit::new(Arc::new(backend), &test_config(&[]));

    let err = toolkit
        .classify_utxos(&[fixtures::utxo(&s.send_txid, 1, 546)])
        .await
        .unwrap_err();

    match &err {
        AppError::Api(api) => assert!(api.is_rate_limit()),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        err.backend_payload(),
        Some(&json!({"error": "Too many requests"}))
    );
}

#[tokio::test]
async fn test_address_utxos_classified() {
    let (s, backend) = scenario();
    let address = "bitcoincash:qwallet";
    let backend = backend.with_utxos(
        address,
        vec![
            json!({"tx_hash": s.plain_txid, "tx_pos": 1, "value": 5000, "height": 0}),
            json!({"tx_hash": s.send_txid, "tx_pos": 2, "value": 546, "height": 700001}),
        ],
    );
    let toolkit = SlpToolkit::new(Arc::new(backend), &test_config(&[]));

    let classified = toolkit.classify_address_utxos(address).await.unwrap();
    assert_eq!(classified[0].is_slp, Some(false));
    assert_eq!(classified[0].utxo.satoshis, 5000);
    assert_eq!(classified[1].is_slp, Some(true));
    assert_eq!(classified[1].utxo.height, Some(700001));
}
