use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::api::{
    calculate_next_backoff, CacheStats, RawTransactionSource, TokenStatsSource,
    TransactionCache, UtxoSource, ValidityOracle,
};
use crate::config::RestApiConfig;
use crate::errors::{ApiError, ApiResult};
use crate::types::{RawTransaction, TokenStats, ValidityEntry};
use crate::utils::txid::validate_txid;

/// REST client for a bch-api style backend (full node proxy, ElectrumX, SLP indexer)
#[derive(Clone)]
pub struct BchRestClient {
    client: reqwest::Client,
    config: RestApiConfig,
    error_count: Arc<AtomicU64>,
    cache: TransactionCache,
}

impl BchRestClient {
    pub fn new(config: RestApiConfig) -> ApiResult<Self> {
        Self::with_cache(config, TransactionCache::default())
    }

    /// Build a client sharing an existing raw transaction cache
    pub fn with_cache(config: RestApiConfig, cache: TransactionCache) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                ApiError::ConnectionFailed(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            config,
            error_count: Arc::new(AtomicU64::new(0)),
            cache,
        })
    }

    /// Failed attempts, retried or not
    pub fn get_error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    pub fn get_cache_stats(&self) -> CacheStats {
        self.cache.get_stats()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.url.trim_end_matches('/'), path)
    }

    async fn get_json(&self, path: &str) -> ApiResult<Value> {
        let url = self.endpoint(path);
        self.request_with_retry(path, || self.client.get(&url)).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> ApiResult<Value> {
        let url = self.endpoint(path);
        self.request_with_retry(path, || self.client.post(&url).json(body))
            .await
    }

    /// Send a request, retrying transient failures with exponential backoff
    async fn request_with_retry<F>(&self, operation: &str, build: F) -> ApiResult<Value>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let max_attempts = self.config.max_retries + 1;
        let mut attempts = 0;
        let mut backoff = Duration::from_millis(self.config.initial_backoff_ms);

        loop {
            match self.send_once(operation, build()).await {
                Ok(value) => {
                    if attempts > 0 {
                        debug!("{} succeeded after {} attempts", operation, attempts + 1);
                    }
                    return Ok(value);
                }
                Err(e) => {
                    attempts += 1;
                    self.error_count.fetch_add(1, Ordering::Relaxed);

                    if !e.is_retryable() {
                        debug!("{} failed (non-retryable): {}", operation, e);
                        return Err(e);
                    }

                    if attempts >= max_attempts {
                        error!("{} failed after {} attempts: {}", operation, attempts, e);
                        return Err(match e {
                            ApiError::ConnectionFailed(_) | ApiError::RequestFailed { .. } => {
                                ApiError::MaxRetriesExceeded {
                                    operation: operation.to_string(),
                                }
                            }
                            other => other,
                        });
                    }

                    warn!(
                        "Attempt {} failed for {}, retrying in {:?}: {}",
                        attempts, operation, backoff, e
                    );
                    sleep(backoff).await;

                    backoff = calculate_next_backoff(
                        backoff,
                        self.config.backoff_multiplier,
                        self.config.max_backoff_seconds,
                    );
                }
            }
        }
    }

    async fn send_once(&self, operation: &str, request: reqwest::RequestBuilder) -> ApiResult<Value> {
        let resp = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    timeout_seconds: self.config.timeout_seconds,
                    operation: operation.to_string(),
                }
            } else if e.is_connect() {
                ApiError::ConnectionFailed(e.to_string())
            } else {
                ApiError::RequestFailed {
                    endpoint: operation.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| ApiError::RequestFailed {
            endpoint: operation.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            // Keep whatever the server said, JSON or not
            let payload = serde_json::from_str(&text).unwrap_or_else(|_| json!({ "error": text }));
            if status.as_u16() == 429 {
                return Err(ApiError::RateLimited { payload });
            }
            return Err(ApiError::Backend {
                status_code: status.as_u16(),
                payload,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            ApiError::DeserialisationFailed(format!("{} returned invalid JSON: {}", operation, e))
        })
    }
}

fn decode<T: DeserializeOwned>(operation: &str, value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| {
        ApiError::DeserialisationFailed(format!("Unexpected {} response: {}", operation, e))
    })
}

fn is_missing_transaction(err: &ApiError) -> bool {
    match err {
        ApiError::Backend {
            status_code: 404, ..
        } => true,
        ApiError::Backend { payload, .. } => payload
            .get("error")
            .and_then(Value::as_str)
            .is_some_and(|msg| msg.contains("No such mempool or blockchain transaction")),
        _ => false,
    }
}

#[async_trait]
impl RawTransactionSource for BchRestClient {
    async fn raw_transaction(&self, txid: &str) -> ApiResult<RawTransaction> {
        validate_txid(txid)?;

        if let Some(cached) = self.cache.get(txid) {
            return Ok(cached);
        }

        let path = format!("rawtransactions/getRawTransaction/{}?verbose=true", txid);
        let value = self.get_json(&path).await.map_err(|e| {
            if is_missing_transaction(&e) {
                ApiError::TransactionNotFound {
                    txid: txid.to_string(),
                }
            } else {
                e
            }
        })?;

        let transaction: RawTransaction = decode("getRawTransaction", value)?;
        if transaction.is_confirmed() {
            self.cache.put(txid, transaction.clone());
        } else {
            debug!("{} is unconfirmed, not cached", txid);
        }
        Ok(transaction)
    }
}

#[async_trait]
impl UtxoSource for BchRestClient {
    async fn utxos_for_address(&self, address: &str) -> ApiResult<Vec<Value>> {
        let value = self.get_json(&format!("electrumx/utxos/{}", address)).await?;

        match value {
            Value::Array(utxos) => Ok(utxos),
            Value::Object(ref body) => {
                if body.get("success").and_then(Value::as_bool) == Some(false) {
                    return Err(ApiError::Backend {
                        status_code: 200,
                        payload: value,
                    });
                }
                match body.get("utxos") {
                    Some(Value::Array(utxos)) => Ok(utxos.clone()),
                    _ => Err(ApiError::InvalidResponse(
                        "electrumx/utxos response has no utxos array".to_string(),
                    )),
                }
            }
            other => Err(ApiError::InvalidResponse(format!(
                "electrumx/utxos returned {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl TokenStatsSource for BchRestClient {
    async fn token_genesis_stats(&self, token_id: &str) -> ApiResult<TokenStats> {
        validate_txid(token_id)?;

        let mut value = self.get_json(&format!("slp/tokenStats/{}", token_id)).await?;
        if let Some(data) = value.get_mut("tokenData") {
            value = data.take();
        }

        decode("tokenStats", value)
    }
}

#[async_trait]
impl ValidityOracle for BchRestClient {
    async fn check_txid_validity(&self, txids: &[String]) -> ApiResult<Vec<Option<ValidityEntry>>> {
        if txids.is_empty() {
            return Ok(Vec::new());
        }
        for txid in txids {
            validate_txid(txid)?;
        }

        let value = self
            .post_json("slp/validateTxid", &json!({ "txids": txids }))
            .await?;

        // Older indexers answer a single object for a single txid
        let value = match value {
            Value::Array(_) => value,
            Value::Null => Value::Array(Vec::new()),
            single => Value::Array(vec![single]),
        };

        decode("validateTxid", value)
    }
}
