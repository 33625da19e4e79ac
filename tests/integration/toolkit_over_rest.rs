use anyhow::Result;
use bch_slp_toolkit::config::AppConfig;
use bch_slp_toolkit::types::{RawTransaction, SlpStatus};
use bch_slp_toolkit::SlpToolkit;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{fixtures, scripts, test_config, txid};

fn config_for(server: &MockServer) -> AppConfig {
    let mut config = test_config(&[]);
    config.api.url = server.uri();
    config.api.initial_backoff_ms = 1;
    config
}

async fn serve_transaction(server: &MockServer, transaction: &RawTransaction) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/rawtransactions/getRawTransaction/{}",
            transaction.txid
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(transaction))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_address_classification_end_to_end() -> Result<()> {
    let server = MockServer::start().await;
    let token_id = txid(0xc1);
    let send = txid(0xc2);
    let plain = txid(0xc3);
    let address = "bitcoincash:qwallet";

    serve_transaction(
        &server,
        &fixtures::transaction(
            &token_id,
            &[],
            Some(scripts::genesis("E2E", "End To End", 3, None, 5000)),
            1,
        ),
    )
    .await;
    serve_transaction(
        &server,
        &fixtures::transaction(
            &send,
            &[(token_id.as_str(), 1)],
            Some(scripts::send(&token_id, &[1500, 3500])),
            2,
        ),
    )
    .await;
    serve_transaction(&server, &fixtures::transaction(&plain, &[], None, 1)).await;

    Mock::given(method("GET"))
        .and(path(format!("/electrumx/utxos/{}", address)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "utxos": [
                {"tx_hash": send, "tx_pos": 2, "value": 546, "height": 800000},
                {"tx_hash": plain, "tx_pos": 0, "value": 20000, "height": 800001}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/slp/validateTxid"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"txid": send, "valid": true}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let toolkit = SlpToolkit::from_config(&config_for(&server))?;
    let classified = toolkit.classify_address_utxos(address).await?;

    assert_eq!(classified.len(), 2);
    assert_eq!(classified[0].status(), SlpStatus::Token);
    assert_eq!(classified[0].is_valid, Some(true));
    let details = classified[0].token.as_ref().unwrap();
    assert_eq!(details.token_ticker, "E2E");
    assert_eq!(details.token_qty_str.as_deref(), Some("3.500"));

    assert_eq!(classified[1].status(), SlpStatus::NotToken);
    assert_eq!(classified[1].utxo.satoshis, 20000);
    Ok(())
}

#[tokio::test]
async fn test_plain_transaction_hydrated_end_to_end() -> Result<()> {
    let server = MockServer::start().await;
    let funding = txid(0xc4);
    let plain = txid(0xc5);

    serve_transaction(&server, &fixtures::transaction(&funding, &[], None, 1)).await;
    serve_transaction(
        &server,
        &fixtures::transaction(&plain, &[(funding.as_str(), 0)], None, 2),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/slp/validateTxid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let toolkit = SlpToolkit::from_config(&config_for(&server))?;
    let hydrated = toolkit.hydrate_transaction(&plain).await?;

    assert!(!hydrated.is_valid_slp_tx);
    assert!(hydrated.token.is_none());
    assert_eq!(hydrated.vin[0].address, Some(fixtures::address(0)));
    assert_eq!(hydrated.vout.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_rate_limited_validation_surfaces_payload() {
    let server = MockServer::start().await;
    let txids = vec![txid(0xc6)];

    Mock::given(method("POST"))
        .and(path("/slp/validateTxid"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({"error": "Too many requests. Limits are 3 per minute."})),
        )
        .mount(&server)
        .await;

    let toolkit = SlpToolkit::from_config(&config_for(&server)).unwrap();
    let err = toolkit.is_valid_slp_txids(&txids).await.unwrap_err();

    assert_eq!(
        err.backend_payload(),
        Some(&json!({"error": "Too many requests. Limits are 3 per minute."}))
    );
}
