//! Batch operation result types
//!
//! Types for tracking batch operation outcomes with per-item status.

use serde::{Deserialize, Serialize};

/// Status of a single batch item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchItemStatus {
    /// Operation completed successfully
    Success,
    /// Operation failed (API error)
    Failed,
    /// Item skipped (inactive, unrouted, already in the target state, malformed)
    Skipped,
    /// Dry-run: changes were computed but not sent
    Pending,
}

/// Result for a single item in a batch operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemResult {
    /// Line number in the input file (1-based)
    pub line: usize,
    /// Account the item concerns
    pub name: String,
    /// Result status
    pub status: BatchItemStatus,
    /// What was done, or why the item was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of a completed batch operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// Type of operation performed
    pub operation: String,
    /// Total items attempted
    pub total: usize,
    /// Number of successful operations
    pub success_count: usize,
    /// Number of failed operations
    pub failure_count: usize,
    /// Number of skipped items
    pub skipped_count: usize,
    /// Number of dry-run items
    pub pending_count: usize,
    /// Per-item results
    pub items: Vec<BatchItemResult>,
    /// Total operation duration in milliseconds
    pub duration_ms: u64,
}

impl BatchResult {
    /// Create a new empty batch result
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            total: 0,
            success_count: 0,
            failure_count: 0,
            skipped_count: 0,
            pending_count: 0,
            items: Vec::new(),
            duration_ms: 0,
        }
    }

    fn push(&mut self, line: usize, name: String, status: BatchItemStatus, detail: Option<String>, error: Option<String>) {
        self.total += 1;
        match status {
            BatchItemStatus::Success => self.success_count += 1,
            BatchItemStatus::Failed => self.failure_count += 1,
            BatchItemStatus::Skipped => self.skipped_count += 1,
            BatchItemStatus::Pending => self.pending_count += 1,
        }
        self.items.push(BatchItemResult {
            line,
            name,
            status,
            detail,
            error,
        });
    }

    /// Add a successful item
    pub fn add_success(&mut self, line: usize, name: String, detail: Option<String>) {
        self.push(line, name, BatchItemStatus::Success, detail, None);
    }

    /// Add a failed item
    pub fn add_failure(&mut self, line: usize, name: String, error: String) {
        self.push(line, name, BatchItemStatus::Failed, None, Some(error));
    }

    /// Add a skipped item
    pub fn add_skipped(&mut self, line: usize, name: String, reason: String) {
        self.push(line, name, BatchItemStatus::Skipped, Some(reason), None);
    }

    /// Add a dry-run item
    pub fn add_pending(&mut self, line: usize, name: String, detail: String) {
        self.push(line, name, BatchItemStatus::Pending, Some(detail), None);
    }

    /// Set the duration
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    /// Check if any items failed
    pub fn has_failures(&self) -> bool {
        self.failure_count > 0
    }

    /// One-line summary for the terminal
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}: {} processed, {} succeeded, {} failed, {} skipped",
            self.operation, self.total, self.success_count, self.failure_count, self.skipped_count
        );
        if self.pending_count > 0 {
            summary.push_str(&format!(", {} pending (dry-run)", self.pending_count));
        }
        summary
    }
}
