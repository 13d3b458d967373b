//! Crosscheck between the YAML error catalog and the condensed policy table.
//!
//! Reports which declared errors have no policy entry and which policy
//! entries cover no declared error, plus totals for both sides.

use std::fs;
use std::path::Path;

use crate::catalog::ErrorRecord;
use crate::error::{ReportError, Result};
use crate::policy::CondensedPolicy;

/// Renders the reconciliation report.
///
/// Both sides are treated as plain lists: ordering and duplicates are kept,
/// and containment is a linear scan of the full other list. An identifier
/// declared twice in the YAML is reported twice when it has no policy entry,
/// but a single policy entry satisfies all of its occurrences.
pub fn crosscheck(records: &[ErrorRecord], policy: &CondensedPolicy) -> String {
    let yaml_errors: Vec<&str> = records.iter().map(|r| r.error.as_str()).collect();
    let policy_errors: Vec<&str> = policy.groups().iter().map(|g| g.err.as_str()).collect();

    let mut out = String::new();

    out.push_str("YAML errors not in policy table:\n\n");
    for error in &yaml_errors {
        if !policy_errors.contains(error) {
            out.push_str(&format!("    {error}\n"));
        }
    }
    out.push_str(&format!(
        "\n{} total errors in the YAML\n\n",
        yaml_errors.len()
    ));

    out.push_str("Policy errors not in YAML:\n\n");
    for error in &policy_errors {
        if !yaml_errors.contains(error) {
            out.push_str(&format!("    {error}\n"));
        }
    }
    out.push_str(&format!(
        "\n{} total errors (with {} total details blocks) in the policy table\n\n",
        policy_errors.len(),
        policy.detail_count()
    ));

    out
}

/// Writes the rendered report.
pub fn write_crosscheck(path: &Path, report: &str) -> Result<()> {
    fs::write(path, report).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(error: &str) -> ErrorRecord {
        ErrorRecord {
            desc: String::new(),
            error: error.to_string(),
            file: String::new(),
            metadata: Vec::new(),
        }
    }

    fn policy(json: &str) -> CondensedPolicy {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_duplicates_reported_per_occurrence() {
        let records = vec![record("A"), record("B"), record("A")];
        let policy = policy(r#"[{"err":"B","dtls":[{"CEID":"c","mod":"","msg":"m"}]}]"#);

        let report = crosscheck(&records, &policy);

        assert_eq!(
            report,
            "YAML errors not in policy table:\n\n\
             \x20   A\n\
             \x20   A\n\
             \n3 total errors in the YAML\n\n\
             Policy errors not in YAML:\n\n\
             \n1 total errors (with 1 total details blocks) in the policy table\n\n"
        );
    }

    #[test]
    fn test_policy_only_errors_listed() {
        let records = vec![record("A")];
        let policy = policy(
            r#"[
                {"err":"A","dtls":[{"CEID":"c1","mod":"","msg":"m"}]},
                {"err":"C","dtls":[{"CEID":"c2","mod":"m1","msg":"m"},{"CEID":"c3","mod":"m2","msg":"m"}]}
            ]"#,
        );

        let report = crosscheck(&records, &policy);

        assert!(report.contains("    C\n"));
        assert!(!report.contains("    A\n"));
        assert!(report.contains("2 total errors (with 3 total details blocks)"));
    }

    #[test]
    fn test_empty_inputs() {
        let report = crosscheck(&[], &CondensedPolicy::default());

        assert_eq!(
            report,
            "YAML errors not in policy table:\n\n\
             \n0 total errors in the YAML\n\n\
             Policy errors not in YAML:\n\n\
             \n0 total errors (with 0 total details blocks) in the policy table\n\n"
        );
    }
}
