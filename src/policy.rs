//! Policy table condenser.
//!
//! The vendor policy table maps `error||modifier` keys to documentation
//! entries. This module pulls out the four fields the platform actually uses
//! and regroups them by error name so a single error can be looked up once
//! and then narrowed by modifier:
//!
//! ```json
//! {
//!   "err":"xyz.openbmc_project.Thermal.Error.PowerSupplyHot",
//!   "dtls":[
//!     {
//!       "CEID":"FQPSPCA0065M",
//!       "mod":"/xyz/openbmc_project/inventory/system/ps0",
//!       "msg":"Power supply 0 is too hot"
//!     }
//!   ]
//! }
//! ```
//!
//! There may be multiple CEID/modifier/message entries per error, which is
//! why both the error and the modifier are needed to find a single entry.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ReportError, Result};

/// Separator between the error name and the optional search modifier in a
/// raw policy table key.
const MODIFIER_SEPARATOR: &str = "||";

/// Raw policy table document. The top-level `events` key holds one entry per
/// error/modifier combination; `IndexMap` keeps the document order, which
/// fixes the grouping order downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyTable {
    pub events: IndexMap<String, PolicyEvent>,
}

/// The payload of one raw policy table entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyEvent {
    #[serde(rename = "Message")]
    pub message: String,

    /// Indexes into the online documentation, e.g. `FQPSPCA0065M`.
    #[serde(rename = "CommonEventID")]
    pub common_event_id: String,
}

/// One documentation entry for an error: the Common Event ID, the search
/// modifier (an inventory path or similar, possibly empty), and a short
/// operator-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    #[serde(rename = "CEID")]
    pub ceid: String,

    #[serde(rename = "mod")]
    pub modifier: String,

    pub msg: String,
}

/// All details grouped under a single error name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CondensedGroup {
    pub err: String,
    pub dtls: Vec<Detail>,
}

/// The condensed policy table: groups in first-seen order, details within a
/// group in first-seen order. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CondensedPolicy {
    groups: Vec<CondensedGroup>,
}

impl CondensedPolicy {
    pub fn groups(&self) -> &[CondensedGroup] {
        &self.groups
    }

    /// Total number of detail entries across all groups.
    pub fn detail_count(&self) -> usize {
        self.groups.iter().map(|g| g.dtls.len()).sum()
    }

    /// Looks up the detail entry for an error and search modifier.
    ///
    /// If there is no exact modifier match, falls back to the entry with an
    /// empty modifier - it is the catch-all for that error.
    pub fn find(&self, error: &str, modifier: &str) -> Option<&Detail> {
        let group = self.groups.iter().find(|g| g.err == error)?;

        group
            .dtls
            .iter()
            .find(|d| d.modifier == modifier)
            .or_else(|| {
                if modifier.is_empty() {
                    None
                } else {
                    group.dtls.iter().find(|d| d.modifier.is_empty())
                }
            })
    }
}

impl From<Vec<CondensedGroup>> for CondensedPolicy {
    fn from(groups: Vec<CondensedGroup>) -> Self {
        Self { groups }
    }
}

/// Splits a raw policy key into `(error, modifier)` at the first `||`.
/// A key without the separator has an empty modifier.
pub fn split_event_key(key: &str) -> (&str, &str) {
    match key.find(MODIFIER_SEPARATOR) {
        Some(pos) => (&key[..pos], &key[pos + MODIFIER_SEPARATOR.len()..]),
        None => (key, ""),
    }
}

/// Condenses the raw policy table into per-error groups.
///
/// Entries whose error name contains a space are dropped: the vendor table
/// carries some non-BMC errors and those are the ones with spaces. Each
/// surviving key contributes exactly one detail to exactly one group.
pub fn condense(table: &PolicyTable) -> CondensedPolicy {
    let mut condensed = CondensedPolicy::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (key, event) in &table.events {
        let (error, modifier) = split_event_key(key);

        if error.contains(' ') {
            warn!("skipping policy entry '{error}' because of spaces");
            continue;
        }

        let detail = Detail {
            ceid: event.common_event_id.clone(),
            modifier: modifier.to_string(),
            msg: event.message.clone(),
        };

        match index.get(error) {
            Some(&slot) => condensed.groups[slot].dtls.push(detail),
            None => {
                index.insert(error.to_string(), condensed.groups.len());
                condensed.groups.push(CondensedGroup {
                    err: error.to_string(),
                    dtls: vec![detail],
                });
            }
        }
    }

    condensed
}

/// Loads the raw policy table. A document without a top-level `events` key
/// fails to parse and is fatal.
pub fn load_policy_table(path: &Path) -> Result<PolicyTable> {
    let content = fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ReportError::ParseJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a previously condensed policy document.
pub fn load_condensed(path: &Path) -> Result<CondensedPolicy> {
    let content = fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ReportError::ParseJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the condensed policy, compactly by default or with 2-space
/// indentation when `prettify` is set.
pub fn write_condensed(path: &Path, condensed: &CondensedPolicy, prettify: bool) -> Result<()> {
    let json = if prettify {
        serde_json::to_string_pretty(condensed)
    } else {
        serde_json::to_string(condensed)
    }
    .map_err(|source| ReportError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, json).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
