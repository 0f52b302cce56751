//! Department routing and membership reconciliation.

use std::time::Instant;

use gwadmin_directory::{DirectoryClient, DirectoryError, MembershipChange};
use tracing::{debug, info, instrument, warn};

use crate::batch::BatchResult;
use crate::config::GroupMappings;
use crate::provisioning::record::{ParsedRow, ProvisioningRecord};

/// Target groups for department codes containing `pattern`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentRoute {
    pub name: String,
    pub pattern: String,
    pub groups: Vec<String>,
}

impl DepartmentRoute {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>, groups: Vec<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            groups,
        }
    }

    /// Case-sensitive substring match on the department code.
    pub fn matches(&self, department: &str) -> bool {
        department.contains(&self.pattern)
    }
}

/// Ordered routes; the first matching route wins.
#[derive(Debug, Clone, Default)]
pub struct DepartmentRouter {
    routes: Vec<DepartmentRoute>,
}

impl DepartmentRouter {
    pub fn new(routes: Vec<DepartmentRoute>) -> Self {
        Self { routes }
    }

    /// Sales, then engineering, then the catch-all `NULL` department.
    pub fn from_mappings(mappings: &GroupMappings) -> Self {
        Self::new(vec![
            DepartmentRoute::new("sales", "SALES", mappings.sales.clone()),
            DepartmentRoute::new("eng", "ENG", mappings.eng.clone()),
            DepartmentRoute::new("catch_all", "NULL", mappings.catch_all.clone()),
        ])
    }

    pub fn resolve(&self, department: &str) -> Option<&DepartmentRoute> {
        self.routes.iter().find(|route| route.matches(department))
    }
}

/// What reconciling one row did.
#[derive(Debug)]
pub enum RecordOutcome {
    /// Row could not be read.
    Malformed { reason: String },
    /// Activation marker absent.
    Inactive,
    /// No route matched the department code.
    Unrouted { department: String },
    Reconciled {
        route: String,
        /// Target groups the user already belonged to.
        held: Vec<String>,
        added: Vec<String>,
        /// Groups a dry run would have added.
        planned: Vec<String>,
        failed: Vec<DirectoryError>,
    },
    /// The user's current groups could not be listed.
    Failed(DirectoryError),
}

/// Applies department routes to onboarding records.
pub struct Provisioner<'a> {
    client: &'a DirectoryClient,
    router: DepartmentRouter,
}

impl<'a> Provisioner<'a> {
    pub fn new(client: &'a DirectoryClient, router: DepartmentRouter) -> Self {
        Self { client, router }
    }

    /// Brings one record's memberships in line with its department route.
    #[instrument(skip(self, record), fields(line = record.line, email = %record.email))]
    pub async fn reconcile(&self, record: &ProvisioningRecord, dry_run: bool) -> RecordOutcome {
        if !record.is_activation() {
            debug!("Activation marker absent");
            return RecordOutcome::Inactive;
        }

        let Some(route) = self.router.resolve(&record.department) else {
            debug!(department = %record.department, "No route for department");
            return RecordOutcome::Unrouted {
                department: record.department.clone(),
            };
        };

        let current = match self.client.list_user_groups(&record.email).await {
            Ok(groups) => groups,
            Err(e) => return RecordOutcome::Failed(e),
        };

        let mut held = Vec::new();
        let mut added = Vec::new();
        let mut planned = Vec::new();
        let mut failed = Vec::new();

        for group in &route.groups {
            if current.iter().any(|g| g.eq_ignore_ascii_case(group)) {
                held.push(group.clone());
                continue;
            }

            if dry_run {
                planned.push(group.clone());
                continue;
            }

            match self.client.add_membership(group, &record.email).await {
                Ok(MembershipChange::Added { .. }) => added.push(group.clone()),
                Ok(MembershipChange::AlreadyMember { .. }) => held.push(group.clone()),
                Err(e) => {
                    warn!(group = %group, "{}", e);
                    failed.push(e);
                }
            }
        }

        RecordOutcome::Reconciled {
            route: route.name.clone(),
            held,
            added,
            planned,
            failed,
        }
    }

    /// Reconciles every row, reporting each outcome to `on_item`.
    pub async fn run<F>(&self, rows: &[ParsedRow], dry_run: bool, mut on_item: F) -> BatchResult
    where
        F: FnMut(usize, &str, &RecordOutcome),
    {
        let start = Instant::now();
        let mut result = BatchResult::new("provision");

        for row in rows {
            let (line, email, outcome) = match row {
                ParsedRow::Malformed { line, reason } => (
                    *line,
                    String::new(),
                    RecordOutcome::Malformed {
                        reason: reason.clone(),
                    },
                ),
                ParsedRow::Record(record) => (
                    record.line,
                    record.email.clone(),
                    self.reconcile(record, dry_run).await,
                ),
            };

            on_item(line, &email, &outcome);
            record_outcome(&mut result, line, email, outcome);
        }

        result.set_duration(start.elapsed().as_millis() as u64);
        info!("{}", result.summary());
        result
    }
}

fn record_outcome(result: &mut BatchResult, line: usize, email: String, outcome: RecordOutcome) {
    match outcome {
        RecordOutcome::Malformed { reason } => result.add_skipped(line, email, reason),
        RecordOutcome::Inactive => result.add_skipped(line, email, "not activated".to_string()),
        RecordOutcome::Unrouted { department } => {
            result.add_skipped(line, email, format!("no route for department '{department}'"))
        }
        RecordOutcome::Failed(e) => result.add_failure(line, email, e.to_string()),
        RecordOutcome::Reconciled {
            route,
            added,
            planned,
            failed,
            ..
        } => {
            if !failed.is_empty() {
                let errors: Vec<String> = failed.iter().map(ToString::to_string).collect();
                result.add_failure(line, email, errors.join("; "));
            } else if !planned.is_empty() {
                result.add_pending(line, email, format!("{route}: would add {}", planned.join(", ")));
            } else if added.is_empty() {
                result.add_skipped(line, email, format!("{route}: already in all groups"));
            } else {
                result.add_success(line, email, Some(format!("{route}: added {}", added.join(", "))));
            }
        }
    }
}
