//! Onboarding: department-based group provisioning from a TSV export.

pub mod record;
pub mod router;

pub use record::{read_records, read_records_from_path, ParsedRow, ProvisioningRecord};
pub use router::{DepartmentRoute, DepartmentRouter, Provisioner, RecordOutcome};
