//! Persisted subset of the navigation state and its on-disk encoding.
//!
//! The current encoding is a JSON record
//! `{"schemaVersion": 1, "history": [...], "committedUrl": "..."}`.
//! Older installs wrote an envelope `{"state": {"webUrl": ..., "history":
//! [...], ...}, "version": 0}`; it is still read and gets rewritten in the
//! current encoding on the next persist.

use serde::{Deserialize, Serialize};
use wayfarer_types::error::{Result, WayfarerError};

use crate::state::BrowserState;
use crate::url::normalize_address;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// Envelope version of the legacy encoding.
const LEGACY_ENVELOPE_VERSION: u32 = 0;

/// The fields of [`BrowserState`] that survive a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub schema_version: u32,
    pub history: Vec<String>,
    pub committed_url: String,
}

/// What a stored blob decodes to before the persisted fields are merged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecoveredFields {
    pub history: Vec<String>,
    pub committed_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredBlob {
    // Tried first: only the legacy shape has a `state` object.
    Legacy(LegacyEnvelope),
    Current(CurrentRecord),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentRecord {
    #[serde(default = "current_schema")]
    schema_version: u32,
    #[serde(default)]
    history: Vec<String>,
    #[serde(default)]
    committed_url: Option<String>,
}

fn current_schema() -> u32 {
    SCHEMA_VERSION
}

#[derive(Deserialize)]
struct LegacyEnvelope {
    state: LegacyState,
    #[serde(default)]
    version: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyState {
    #[serde(default)]
    history: Vec<String>,
    #[serde(default)]
    web_url: Option<String>,
}

/// Serde also fills structs from JSON arrays; stored blobs must be objects.
fn require_object(value: &serde_json::Value, what: &str) -> Result<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(WayfarerError::Snapshot(format!("{what} is not a JSON object")))
    }
}

impl PersistedSnapshot {
    /// Capture the persisted fields of `state`.
    pub fn capture(state: &BrowserState) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            history: state.history.clone(),
            committed_url: state.committed_url.clone(),
        }
    }

    /// Serialize to the current blob encoding.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl RecoveredFields {
    /// Decode a stored blob in either the current or the legacy encoding.
    ///
    /// Unknown fields are ignored and missing ones default individually.
    /// A schema version this build does not know is an error.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        require_object(&value, "snapshot")?;
        if let Some(state) = value.get("state") {
            require_object(state, "legacy state")?;
        }
        match serde_json::from_value::<StoredBlob>(value)? {
            StoredBlob::Current(record) => {
                if record.schema_version > SCHEMA_VERSION {
                    return Err(WayfarerError::Snapshot(format!(
                        "unsupported schema version {}",
                        record.schema_version
                    )));
                }
                Ok(Self {
                    history: record.history,
                    committed_url: record.committed_url,
                })
            },
            StoredBlob::Legacy(envelope) => {
                if envelope.version != LEGACY_ENVELOPE_VERSION {
                    return Err(WayfarerError::Snapshot(format!(
                        "unsupported legacy envelope version {}",
                        envelope.version
                    )));
                }
                log::info!("Migrating legacy navigation snapshot");
                Ok(Self {
                    history: envelope.state.history,
                    committed_url: envelope.state.web_url,
                })
            },
        }
    }

    /// Merge into a fresh [`BrowserState`] rooted at `home_url`.
    ///
    /// Only history and committed URL are taken over; loading, capability
    /// and panel flags keep their defaults. The address bar shows the
    /// committed URL. A URL without a web scheme is normalized and adjacent
    /// repeats in the history are collapsed.
    pub fn into_state(self, home_url: &str) -> BrowserState {
        let mut state = BrowserState::new(home_url);
        if let Some(url) = self.committed_url.filter(|u| !u.trim().is_empty()) {
            state.committed_url = normalize_address(&url).into_owned();
            state.address_text = state.committed_url.clone();
        }
        let mut history = self.history;
        history.dedup();
        state.history = history;
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = "https://www.example.com";

    fn decode_state(json: &str) -> BrowserState {
        RecoveredFields::decode(json.as_bytes())
            .unwrap()
            .into_state(HOME)
    }

    #[test]
    fn encode_uses_camel_case() {
        let mut state = BrowserState::default();
        state.history = vec!["https://a.test".into()];
        let bytes = PersistedSnapshot::capture(&state).encode().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["schemaVersion"], 1);
        assert_eq!(value["committedUrl"], "https://www.example.com");
        assert_eq!(value["history"][0], "https://a.test");
    }

    #[test]
    fn capture_excludes_transient_fields() {
        let mut state = BrowserState::default();
        state.is_loading = true;
        state.history_panel_visible = true;
        state.address_text = "typing".into();
        let bytes = PersistedSnapshot::capture(&state).encode().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("typing"));
        assert!(!text.contains("Loading"));
        assert!(!text.contains("Panel"));
    }

    #[test]
    fn decode_current_without_version() {
        let state = decode_state(r#"{"history":["a","b"],"committedUrl":"https://x"}"#);
        assert_eq!(state.history(), ["a", "b"]);
        assert_eq!(state.committed_url(), "https://x");
        assert_eq!(state.address_text(), "https://x");
        assert!(!state.is_loading());
        assert!(!state.can_go_back());
        assert!(!state.can_go_forward());
        assert!(!state.history_panel_visible());
    }

    #[test]
    fn decode_ignores_transient_fields_in_blob() {
        let state = decode_state(
            r#"{"schemaVersion":1,"history":[],"committedUrl":"https://x",
                "isLoading":true,"canGoBack":true,"historyPanelVisible":true}"#,
        );
        assert!(!state.is_loading());
        assert!(!state.can_go_back());
        assert!(!state.history_panel_visible());
    }

    #[test]
    fn missing_fields_default() {
        let state = decode_state("{}");
        assert_eq!(state, BrowserState::new(HOME));
    }

    #[test]
    fn schemeless_url_normalized() {
        let state = decode_state(r#"{"committedUrl":"saved.test"}"#);
        assert_eq!(state.committed_url(), "https://saved.test");
    }

    #[test]
    fn blank_url_falls_back_to_home() {
        let state = decode_state(r#"{"committedUrl":"  "}"#);
        assert_eq!(state.committed_url(), HOME);
    }

    #[test]
    fn adjacent_repeats_collapsed_on_load() {
        let state = decode_state(r#"{"history":["a","a","b","a"]}"#);
        assert_eq!(state.history(), ["a", "b", "a"]);
    }

    #[test]
    fn legacy_envelope_migrated() {
        let state = decode_state(
            r#"{"state":{"inputUrl":"typed","webUrl":"https://old.test",
                "isLoading":true,"history":["https://old.test"],
                "showHistory":true},"version":0}"#,
        );
        assert_eq!(state.committed_url(), "https://old.test");
        assert_eq!(state.history(), ["https://old.test"]);
        assert_eq!(state.address_text(), "https://old.test");
        assert!(!state.is_loading());
        assert!(!state.history_panel_visible());
    }

    #[test]
    fn future_schema_rejected() {
        let err = RecoveredFields::decode(br#"{"schemaVersion":2,"history":[]}"#).unwrap_err();
        assert!(format!("{err}").contains("unsupported schema version 2"));
    }

    #[test]
    fn unknown_legacy_version_rejected() {
        assert!(RecoveredFields::decode(br#"{"state":{},"version":3}"#).is_err());
    }

    #[test]
    fn positional_arrays_rejected() {
        for blob in [
            &b"[]"[..],
            br#"[1,["a","a"],"x.test"]"#,
            br#"{"state":[["a"],"https://x.test"],"version":0}"#,
        ] {
            let err = RecoveredFields::decode(blob).unwrap_err();
            assert!(format!("{err}").contains("not a JSON object"), "{blob:?}");
        }
    }

    #[test]
    fn malformed_blobs_rejected() {
        for blob in [&b"not json"[..], b"[1,2]", b"null", br#"{"history":[1]}"#] {
            assert!(RecoveredFields::decode(blob).is_err(), "{blob:?}");
        }
    }
}
