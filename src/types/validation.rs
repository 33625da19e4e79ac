//! Token indexer validity verdicts

use serde::{Deserialize, Serialize};

/// One entry as the indexer returns it; `valid` may be null while unprocessed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidityEntry {
    #[serde(default)]
    pub txid: String,
    #[serde(default)]
    pub valid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<String>,
}

/// Normalised verdict handed to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub txid: String,
    pub valid: bool,
}

/// Align raw indexer entries with the queried txids
///
/// Missing or `null` entries become `{txid, valid: false}`. The txid always
/// comes from the query so a sparse response cannot shift verdicts.
pub fn normalize_validity(txids: &[String], entries: &[Option<ValidityEntry>]) -> Vec<ValidationResult> {
    txids
        .iter()
        .enumerate()
        .map(|(i, txid)| ValidationResult {
            txid: txid.clone(),
            valid: entries
                .get(i)
                .and_then(Option::as_ref)
                .and_then(|entry| entry.valid)
                .unwrap_or(false),
        })
        .collect()
}

/// Tri-state view: `None` when the indexer has no verdict yet
pub fn tri_state_validity(txids: &[String], entries: &[Option<ValidityEntry>]) -> Vec<Option<bool>> {
    txids
        .iter()
        .enumerate()
        .map(|(i, _)| entries.get(i).and_then(Option::as_ref).and_then(|entry| entry.valid))
        .collect()
}
