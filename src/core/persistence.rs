//! Saving and restoring the form as a single JSON record.
//!
//! The record is overwritten whole on every save. Loading never fails: a
//! missing record and an unreadable one are both reported as outcomes so the
//! caller can keep its current inputs.

use crate::core::input::{FlowTiming, FormFields, parse_yes_no, yes_no};
use crate::core::kv::KeyValueCollection;
use anyhow::{Context, Result, anyhow};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_STORAGE_KEY: &str = "portfolio_gain_range_v1";

/// The persisted snapshot: form fields plus when they were saved.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedRecord {
    pub fields: FormFields,
    pub saved_at: String,
}

/// Wire layout of the record. Every field is optional on the way in so that
/// older or hand-edited records still load.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordJson {
    start_date: Option<String>,
    end_date: Option<String>,
    begin_balance: Option<String>,
    end_balance: Option<String>,
    net_flow: Option<String>,
    flow_timing: Option<String>,
    annualize: Option<String>,
    saved_at: Option<String>,
}

impl From<&SavedRecord> for RecordJson {
    fn from(record: &SavedRecord) -> Self {
        let fields = &record.fields;
        RecordJson {
            start_date: Some(fields.start_date.clone()),
            end_date: Some(fields.end_date.clone()),
            begin_balance: Some(fields.begin_balance.clone()),
            end_balance: Some(fields.end_balance.clone()),
            net_flow: Some(fields.net_flow.clone()),
            flow_timing: Some(fields.flow_timing.to_string()),
            annualize: Some(yes_no(fields.annualize).to_string()),
            saved_at: Some(record.saved_at.clone()),
        }
    }
}

impl TryFrom<RecordJson> for SavedRecord {
    type Error = anyhow::Error;

    fn try_from(json: RecordJson) -> Result<Self> {
        let flow_timing = match json.flow_timing.as_deref() {
            None | Some("") => FlowTiming::Mid,
            Some(token) => token.parse()?,
        };
        let annualize = match json.annualize.as_deref() {
            None | Some("") => true,
            Some(token) => parse_yes_no(token)?,
        };
        Ok(SavedRecord {
            fields: FormFields {
                start_date: json.start_date.unwrap_or_default(),
                end_date: json.end_date.unwrap_or_default(),
                begin_balance: json.begin_balance.unwrap_or_default(),
                end_balance: json.end_balance.unwrap_or_default(),
                net_flow: json.net_flow.unwrap_or_default(),
                flow_timing,
                annualize,
            },
            saved_at: json.saved_at.unwrap_or_default(),
        })
    }
}

impl SavedRecord {
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&RecordJson::from(self)).context("Failed to serialize saved record")
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let json: RecordJson =
            serde_json::from_slice(bytes).context("Saved record is not valid JSON")?;
        SavedRecord::try_from(json)
    }
}

/// Result of asking for the saved record.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(SavedRecord),
    NothingSaved,
    /// A record exists but could not be read or decoded.
    Unreadable(String),
}

impl LoadOutcome {
    pub fn status_message(&self) -> &'static str {
        match self {
            LoadOutcome::Loaded(_) => "Loaded saved values.",
            LoadOutcome::NothingSaved => "Nothing saved yet on this device.",
            LoadOutcome::Unreadable(_) => "Saved values could not be read; nothing loaded.",
        }
    }
}

pub struct PersistenceAdapter {
    collection: Arc<dyn KeyValueCollection>,
    key: String,
}

impl PersistenceAdapter {
    pub fn new(collection: Arc<dyn KeyValueCollection>, key: impl Into<String>) -> Self {
        Self {
            collection,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replaces the saved record with `fields`, stamped with the current time.
    pub fn save(&self, fields: &FormFields) -> Result<SavedRecord> {
        let record = SavedRecord {
            fields: fields.clone(),
            saved_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        self.collection
            .put(&self.key, &record.to_json()?)
            .with_context(|| format!("Failed to save record under {}", self.key))?;
        info!(key = %self.key, saved_at = %record.saved_at, "Saved calculator inputs");
        Ok(record)
    }

    pub fn load(&self) -> LoadOutcome {
        let bytes = match self.collection.get(&self.key) {
            Ok(Some(bytes)) if !bytes.is_empty() => bytes,
            Ok(_) => {
                debug!(key = %self.key, "No saved record");
                return LoadOutcome::NothingSaved;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read saved record");
                return LoadOutcome::Unreadable(e.to_string());
            }
        };

        match SavedRecord::from_json(&bytes) {
            Ok(record) => {
                debug!(key = %self.key, saved_at = %record.saved_at, "Loaded saved record");
                LoadOutcome::Loaded(record)
            }
            Err(e) => {
                warn!(key = %self.key, error = %format!("{e:#}"), "Saved record is corrupt");
                LoadOutcome::Unreadable(format!("{e:#}"))
            }
        }
    }

    /// Deletes the saved record. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        let removed = self
            .collection
            .remove(&self.key)
            .map_err(|e| anyhow!("Failed to remove record under {}: {e}", self.key))?;
        info!(key = %self.key, removed, "Cleared saved record");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryCollection;

    fn adapter() -> (Arc<MemoryCollection>, PersistenceAdapter) {
        let collection = Arc::new(MemoryCollection::new());
        let adapter = PersistenceAdapter::new(collection.clone(), DEFAULT_STORAGE_KEY);
        (collection, adapter)
    }

    fn sample_fields() -> FormFields {
        FormFields {
            start_date: "2024-01-01".to_string(),
            end_date: "2024-12-31".to_string(),
            begin_balance: "$10,000".to_string(),
            end_balance: " 11,250.75 ".to_string(),
            net_flow: "-500".to_string(),
            flow_timing: FlowTiming::End,
            annualize: false,
        }
    }

    #[test]
    fn save_then_load_restores_text_for_text() {
        let (_, adapter) = adapter();
        let saved = adapter.save(&sample_fields()).unwrap();

        match adapter.load() {
            LoadOutcome::Loaded(record) => {
                assert_eq!(record.fields, sample_fields());
                assert_eq!(record.saved_at, saved.saved_at);
                assert!(chrono::DateTime::parse_from_rfc3339(&record.saved_at).is_ok());
            }
            other => panic!("Expected a loaded record, got {other:?}"),
        }
    }

    #[test]
    fn records_live_under_the_configured_key() {
        let collection = Arc::new(MemoryCollection::new());
        let adapter = PersistenceAdapter::new(collection.clone(), "other_key");
        assert_eq!(adapter.key(), "other_key");

        adapter.save(&sample_fields()).unwrap();
        assert!(collection.get("other_key").unwrap().is_some());
        assert!(collection.get(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn save_overwrites_previous_record() {
        let (_, adapter) = adapter();
        adapter.save(&sample_fields()).unwrap();
        adapter.save(&FormFields::default()).unwrap();

        let LoadOutcome::Loaded(record) = adapter.load() else {
            panic!("Expected a loaded record");
        };
        assert_eq!(record.fields, FormFields::default());
    }

    #[test]
    fn load_without_save_reports_nothing_saved() {
        let (_, adapter) = adapter();
        let outcome = adapter.load();
        assert_eq!(outcome, LoadOutcome::NothingSaved);
        assert_eq!(outcome.status_message(), "Nothing saved yet on this device.");
    }

    #[test]
    fn corrupt_record_is_reported_not_raised() {
        let (collection, adapter) = adapter();
        collection.put(DEFAULT_STORAGE_KEY, b"{not json").unwrap();

        let outcome = adapter.load();
        assert!(matches!(outcome, LoadOutcome::Unreadable(_)));
        assert_eq!(
            outcome.status_message(),
            "Saved values could not be read; nothing loaded."
        );
    }

    #[test]
    fn unknown_selector_token_makes_record_unreadable() {
        let (collection, adapter) = adapter();
        collection
            .put(DEFAULT_STORAGE_KEY, br#"{"flowTiming":"later"}"#)
            .unwrap();
        assert!(matches!(adapter.load(), LoadOutcome::Unreadable(_)));
    }

    #[test]
    fn sparse_record_falls_back_to_defaults() {
        let (collection, adapter) = adapter();
        collection
            .put(
                DEFAULT_STORAGE_KEY,
                br#"{"beginBalance":"100","endDate":null,"flowTiming":""}"#,
            )
            .unwrap();

        let LoadOutcome::Loaded(record) = adapter.load() else {
            panic!("Expected a loaded record");
        };
        assert_eq!(record.fields.begin_balance, "100");
        assert_eq!(record.fields.end_date, "");
        assert_eq!(record.fields.net_flow, "");
        assert_eq!(record.fields.flow_timing, FlowTiming::Mid);
        assert!(record.fields.annualize);
        assert_eq!(record.saved_at, "");
    }

    #[test]
    fn record_uses_documented_field_names() {
        let record = SavedRecord {
            fields: sample_fields(),
            saved_at: "2024-12-31T10:00:00.000Z".to_string(),
        };
        let value: serde_json::Value = serde_json::from_slice(&record.to_json().unwrap()).unwrap();

        assert_eq!(value["startDate"], "2024-01-01");
        assert_eq!(value["endDate"], "2024-12-31");
        assert_eq!(value["beginBalance"], "$10,000");
        assert_eq!(value["endBalance"], " 11,250.75 ");
        assert_eq!(value["netFlow"], "-500");
        assert_eq!(value["flowTiming"], "end");
        assert_eq!(value["annualize"], "no");
        assert_eq!(value["savedAt"], "2024-12-31T10:00:00.000Z");
    }

    #[test]
    fn clear_removes_record() {
        let (_, adapter) = adapter();
        adapter.save(&sample_fields()).unwrap();

        assert!(adapter.clear().unwrap());
        assert_eq!(adapter.load(), LoadOutcome::NothingSaved);
        assert!(!adapter.clear().unwrap());
    }
}
