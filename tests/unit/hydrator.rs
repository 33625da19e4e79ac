use bch_slp_toolkit::errors::{ApiError, AppError};
use bch_slp_toolkit::types::TransactionType;
use bch_slp_toolkit::SlpToolkit;
use serde_json::json;
use std::sync::Arc;

use crate::common::{fixtures, scripts, test_config, txid, MockBackend};

/// Funding tx F, GENESIS T (2 decimals, baton at vout 2), plain payment P
/// spending F, and SEND S spending T:1 and P:1
fn backend() -> MockBackend {
    let funding = txid(0x30);
    let token_id = txid(0x31);
    let plain = txid(0x32);
    let send = txid(0x33);

    MockBackend::new()
        .with_transaction(fixtures::transaction(&funding, &[], None, 2))
        .with_transaction(fixtures::transaction(
            &token_id,
            &[],
            Some(scripts::genesis("HYD", "Hydrated", 2, Some(2), 1000)),
            2,
        ))
        .with_transaction(fixtures::transaction(
            &plain,
            &[(funding.as_str(), 0)],
            None,
            2,
        ))
        .with_transaction(fixtures::transaction(
            &send,
            &[(token_id.as_str(), 1), (plain.as_str(), 1)],
            Some(scripts::send(&token_id, &[5, 10])),
            3,
        ))
        .with_validity(&send, Some(true))
        .with_validity(&token_id, None)
}

#[tokio::test]
async fn test_plain_transaction_has_no_token_fields() {
    let backend = Arc::new(backend());
    let toolkit = SlpToolkit::new(Arc::clone(&backend), &test_config(&[]));

    let hydrated = toolkit.hydrate_transaction(&txid(0x32)).await.unwrap();
    assert!(!hydrated.is_valid_slp_tx);
    assert!(!hydrated.is_token_transaction());
    assert_eq!(hydrated.vin[0].address, Some(fixtures::address(0)));
    assert_eq!(hydrated.vin[0].value, Some(json!(0.00000546)));
    assert!(hydrated.vin.iter().all(|input| input.token.is_none()));
    assert!(hydrated.vout.iter().all(|output| output.token.is_none()));

    let value = serde_json::to_value(&hydrated).unwrap();
    assert_eq!(value["isValidSLPTx"], json!(false));
    assert_eq!(value["confirmations"], json!(10));
    assert!(value.get("tokenId").is_none());
    assert!(value["vin"][0].get("tokenQty").is_none());
    assert!(value["vout"][1].get("tokenQtyStr").is_none());

    // nothing to validate for a non-SLP transaction
    assert_eq!(backend.validity_call_count(), 0);
}

#[tokio::test]
async fn test_send_inputs_and_outputs_carry_amounts() {
    let toolkit = SlpToolkit::new(Arc::new(backend()), &test_config(&[]));

    let hydrated = toolkit.hydrate_transaction(&txid(0x33)).await.unwrap();
    assert!(hydrated.is_valid_slp_tx);

    let token = hydrated.token.as_ref().unwrap();
    assert_eq!(token.token_tx_type, TransactionType::Send);
    assert_eq!(token.token_id, txid(0x31));
    assert_eq!(token.token_ticker, "HYD");
    assert_eq!(token.token_decimals, 2);

    // T:1 holds the whole GENESIS supply; P:1 is plain BCH
    assert_eq!(hydrated.vin[0].address, Some(fixtures::address(1)));
    assert_eq!(
        hydrated.vin[0].token.as_ref().unwrap().token_qty_str.as_deref(),
        Some("10.00")
    );
    assert_eq!(hydrated.vin[1].token.as_ref().unwrap().token_qty, None);

    let quantities: Vec<Option<&str>> = hydrated
        .vout
        .iter()
        .map(|output| output.token.as_ref().unwrap().token_qty_str.as_deref())
        .collect();
    assert_eq!(quantities, vec![None, Some("0.05"), Some("0.10"), None]);
    assert!(hydrated.vout.iter().all(|output| !output.is_mint_baton));

    let value = serde_json::to_value(&hydrated).unwrap();
    assert_eq!(value["tokenTxType"], json!("SEND"));
    assert_eq!(value["isValidSLPTx"], json!(true));
    assert_eq!(value["vout"][0]["tokenQty"], json!(null));
    assert_eq!(value["vout"][2]["tokenQtyStr"], json!("0.10"));
}

#[tokio::test]
async fn test_genesis_marks_mint_baton_output() {
    let toolkit = SlpToolkit::new(Arc::new(backend()), &test_config(&[]));

    let hydrated = toolkit.hydrate_transaction(&txid(0x31)).await.unwrap();
    // indexer has no verdict yet
    assert!(!hydrated.is_valid_slp_tx);
    assert!(hydrated.vin.is_empty());

    assert_eq!(
        hydrated.vout[1].token.as_ref().unwrap().token_qty_str.as_deref(),
        Some("10.00")
    );
    assert!(hydrated.vout[2].is_mint_baton);
    assert_eq!(hydrated.vout[2].token.as_ref().unwrap().token_qty, None);
}

#[tokio::test]
async fn test_validation_rate_limit_propagates() {
    let backend = backend().with_rate_limited_validity(json!({"error": "slow down"}));
    let toolkit = SlpToolkit::new(Arc::new(backend), &test_config(&[]));

    let err = toolkit.hydrate_transaction(&txid(0x33)).await.unwrap_err();
    assert!(matches!(&err, AppError::Api(api) if api.is_rate_limit()));
    assert_eq!(err.backend_payload(), Some(&json!({"error": "slow down"})));
}

#[tokio::test]
async fn test_parent_fetch_failure_propagates() {
    let backend = backend().with_failing_transaction(&txid(0x32));
    let toolkit = SlpToolkit::new(Arc::new(backend), &test_config(&[]));

    let err = toolkit.hydrate_transaction(&txid(0x33)).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Api(ApiError::Backend {
            status_code: 500,
            ..
        })
    ));
}

#[tokio::test]
async fn test_unknown_transaction() {
    let toolkit = SlpToolkit::new(Arc::new(backend()), &test_config(&[]));

    let err = toolkit.hydrate_transaction(&txid(0x99)).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Api(ApiError::TransactionNotFound { .. })
    ));
}
