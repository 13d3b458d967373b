//! Error catalog builder.
//!
//! Walks directories of `*.errors.yaml` documents, derives each declared
//! error's fully qualified name from the document's location, attaches call-out
//! and inheritance metadata from the sibling `*.metadata.yaml` document, and
//! flattens everything into one report:
//!
//! ```json
//! {
//!   "desc":"Callout IIC device",
//!   "error":"xyz.openbmc_project.Common.Callout.Error.IIC",
//!   "file":"xyz/openbmc_project/Common/Callout.errors.yaml",
//!   "metadata":[
//!     "CALLOUT_IIC_BUS",
//!     "CALLOUT_IIC_ADDR",
//!     "Inherits xyz.openbmc_project.Common.Callout.Error.Device"
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{ReportError, Result};

const ERROR_SUFFIX: &str = ".errors.yaml";
const METADATA_SUFFIX: &str = ".metadata.yaml";

/// One declared error in an `*.errors.yaml` document (the document root is a
/// sequence of these). Both fields are required; a document missing either
/// fails to parse.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDefinition {
    pub name: String,
    pub description: String,
}

/// One entry of a `*.metadata.yaml` document, matched to its error by `name`.
///
/// ```yaml
/// - name: SlaveDetectionFailure
///   meta:
///     - str: "ERRNO=%d"
///       type: int32
///   inherits:
///     - xyz.openbmc_project.Callout
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataEntry {
    pub name: String,

    #[serde(default)]
    pub meta: Vec<MetaField>,

    #[serde(default)]
    pub inherits: Vec<String>,
}

/// A single call-out field pattern, e.g. `str: "ERRNO=%d"` with `type: int32`.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaField {
    #[serde(rename = "str")]
    pub pattern: String,

    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// One flattened error entry in the generated report.
///
/// Fields are declared in alphabetical order so plain serialization produces
/// the sorted-key output the report consumers expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub desc: String,
    pub error: String,
    pub file: String,
    pub metadata: Vec<String>,
}

/// Finds every `*.errors.yaml` document under `root`, as paths relative to
/// it, in lexicographic traversal order.
///
/// A root that does not exist contributes nothing; only a document that later
/// fails to parse is fatal.
pub fn find_error_yaml(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        debug!("yaml directory {} does not exist, skipping", root.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| ReportError::Walk {
            path: root.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(ERROR_SUFFIX) {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            files.push(relative.to_path_buf());
        }
    }

    Ok(files)
}

/// Derives the fully qualified error prefix from a document's relative
/// location: `xyz/openbmc_project/Common.errors.yaml` becomes
/// `xyz.openbmc_project.Common.Error.`.
pub fn error_base(relative: &Path) -> String {
    let dotted = relative
        .iter()
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(".");

    let mut base = dotted
        .strip_suffix(ERROR_SUFFIX)
        .map(str::to_owned)
        .unwrap_or(dotted);
    base.push_str(".Error.");
    base
}

/// Inserts `.Error` before the last dotted segment of an inherited base
/// reference: `xyz.openbmc_project.Callout` becomes
/// `xyz.openbmc_project.Error.Callout`. A reference without a dot is
/// returned unchanged.
pub fn insert_error_segment(reference: &str) -> String {
    match reference.rfind('.') {
        Some(dot) => format!("{}.Error{}", &reference[..dot], &reference[dot..]),
        None => reference.to_string(),
    }
}

/// Collects the report strings for one error from the parsed metadata
/// entries.
///
/// Every entry matching `name` contributes the KEY portion of each `meta`
/// pattern (`ERRNO=%d` becomes `ERRNO`, split at the first `=`) in
/// declaration order, then a single `Inherits a,b` string when the entry
/// lists base errors.
pub fn metadata_strings(name: &str, entries: &[MetadataEntry]) -> Vec<String> {
    let mut data = Vec::new();

    for entry in entries.iter().filter(|e| e.name == name) {
        for field in &entry.meta {
            let key = match field.pattern.split_once('=') {
                Some((key, _)) => key,
                None => field.pattern.as_str(),
            };
            data.push(key.to_string());
        }

        if !entry.inherits.is_empty() {
            let bases: Vec<String> = entry
                .inherits
                .iter()
                .map(|r| insert_error_segment(r))
                .collect();
            data.push(format!("Inherits {}", bases.join(",")));
        }
    }

    data
}

/// Reads one error document (and its optional metadata sibling) and returns
/// its records in declaration order.
pub fn read_error_yaml(root: &Path, relative: &Path) -> Result<Vec<ErrorRecord>> {
    let base = error_base(relative);
    let file = relative.to_string_lossy().into_owned();

    // A missing metadata sibling just means no metadata; a malformed one is
    // fatal like any other parse failure.
    let metadata_file = match file.strip_suffix(ERROR_SUFFIX) {
        Some(stem) => format!("{stem}{METADATA_SUFFIX}"),
        None => file.clone(),
    };
    let metadata_path = root.join(&metadata_file);
    let metadata: Vec<MetadataEntry> = if metadata_path.exists() {
        let content = fs::read_to_string(&metadata_path).map_err(|source| ReportError::Read {
            path: metadata_path.clone(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ReportError::ParseYaml {
            path: metadata_path.clone(),
            source,
        })?
    } else {
        Vec::new()
    };

    let path = root.join(relative);
    let content = fs::read_to_string(&path).map_err(|source| ReportError::Read {
        path: path.clone(),
        source,
    })?;
    let definitions: Vec<ErrorDefinition> =
        serde_yaml::from_str(&content).map_err(|source| ReportError::ParseYaml {
            path: path.clone(),
            source,
        })?;

    let records = definitions
        .iter()
        .map(|def| ErrorRecord {
            desc: def.description.clone(),
            error: format!("{base}{}", def.name),
            file: file.clone(),
            metadata: metadata_strings(&def.name, &metadata),
        })
        .collect();

    Ok(records)
}

/// Collects every declared error under the given roots into one flat list,
/// preserving per-root and per-document order.
pub fn collect_errors<I, P>(roots: I) -> Result<Vec<ErrorRecord>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut all = Vec::new();

    for root in roots {
        let root = root.as_ref();
        let files = find_error_yaml(root)?;
        info!(
            "found {} error definition files under {}",
            files.len(),
            root.display()
        );

        for relative in files {
            let mut records = read_error_yaml(root, &relative)?;
            all.append(&mut records);
        }
    }

    Ok(all)
}

/// Writes the flattened error report with 2-space indentation.
pub fn write_error_report(path: &Path, records: &[ErrorRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).map_err(|source| ReportError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, json).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_base_derivation() {
        assert_eq!(
            error_base(Path::new("xyz/openbmc_project/Common.errors.yaml")),
            "xyz.openbmc_project.Common.Error."
        );
        assert_eq!(error_base(Path::new("Top.errors.yaml")), "Top.Error.");
    }

    #[test]
    fn test_insert_error_segment() {
        assert_eq!(
            insert_error_segment("xyz.openbmc_project.Callout"),
            "xyz.openbmc_project.Error.Callout"
        );
        assert_eq!(insert_error_segment("Callout"), "Callout");
    }

    #[test]
    fn test_metadata_keys_precede_inherits() {
        let entries: Vec<MetadataEntry> = serde_yaml::from_str(
            r#"
- name: IIC
  meta:
    - str: "CALLOUT_IIC_BUS=%s"
      type: string
    - str: "CALLOUT_IIC_ADDR=%hu"
      type: uint16
  inherits:
    - xyz.openbmc_project.Common.Callout.Device
- name: Other
  meta:
    - str: "UNRELATED=%d"
      type: int32
"#,
        )
        .unwrap();

        let strings = metadata_strings("IIC", &entries);
        assert_eq!(
            strings,
            vec![
                "CALLOUT_IIC_BUS",
                "CALLOUT_IIC_ADDR",
                "Inherits xyz.openbmc_project.Common.Callout.Error.Device",
            ]
        );
    }

    #[test]
    fn test_metadata_multiple_inherits_comma_joined() {
        let entries: Vec<MetadataEntry> = serde_yaml::from_str(
            r#"
- name: Fail
  inherits:
    - com.A.Base
    - com.B.Base
"#,
        )
        .unwrap();

        assert_eq!(
            metadata_strings("Fail", &entries),
            vec!["Inherits com.A.Error.Base,com.B.Error.Base"]
        );
    }

    #[test]
    fn test_metadata_pattern_without_equals_kept_whole() {
        let entries: Vec<MetadataEntry> = serde_yaml::from_str(
            r#"
- name: Fail
  meta:
    - str: "PLAIN"
      type: string
"#,
        )
        .unwrap();

        assert_eq!(metadata_strings("Fail", &entries), vec!["PLAIN"]);
    }

    #[test]
    fn test_metadata_no_match_is_empty() {
        let entries: Vec<MetadataEntry> = serde_yaml::from_str("- name: Other").unwrap();
        assert!(metadata_strings("Fail", &entries).is_empty());
    }

    #[test]
    fn test_error_definition_requires_description() {
        let result: std::result::Result<Vec<ErrorDefinition>, _> =
            serde_yaml::from_str("- name: NoDescription");
        assert!(result.is_err());
    }
}
