//! Tooling for reconciling the vendor error policy table with the
//! platform's declared error taxonomy.
//!
//! Two pipelines share this crate:
//!
//! * the policy condenser ([`policy`]) reshapes the raw `policyTable.json`
//!   into a compact error-indexed form consumed on the BMC, and
//! * the catalog builder ([`catalog`]) flattens every `*.errors.yaml`
//!   declaration (plus `*.metadata.yaml` call-out data) into one report,
//!   optionally crosschecked ([`crosscheck`]) against the condensed policy.
//!
//! Both run as one-shot CLI tools (`condense_policy`, `error_reports`):
//! read everything, transform in memory, write everything. Any parse or I/O
//! failure is fatal; there is no partial output.

pub mod catalog;
pub mod crosscheck;
pub mod error;
pub mod policy;

pub use error::{ReportError, Result};
