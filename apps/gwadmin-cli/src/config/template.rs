//! Starter configuration written by `gwadmin init`.

use std::path::Path;

use crate::error::{CliError, CliResult};

/// Starter configuration with placeholder credentials and example groups.
pub const STARTER_CONFIG: &str = r#"# gwadmin configuration

credentials:
  # Service account JSON key with domain-wide delegation
  key_file: PATH_TO_THE_SECRETS_FILE
  # Administrator the service account acts as
  delegate: admin_user@example.com
  scopes: "https://www.googleapis.com/auth/admin.directory.group,https://www.googleapis.com/auth/admin.directory.user"

directory:
  domain: example.com
  page_size: 200
  request_timeout_secs: 30
  reuse_tokens: true
  # suspended: delete/undelete only suspended accounts
  # unconditional: skip the status check
  delete_gate: suspended
  restore_org_unit: /

groups:
  sales: all@example.com,sales@example.com,employees@example.com
  eng: all@example.com,eng@example.com,us-employees@example.com
  catch_all: all@example.com,employees@example.com

provision:
  file: PATH_TO_TSV_EXPORT

batch:
  file: PATH_TO_FILE
  action: unsuspend
"#;

/// Writes [`STARTER_CONFIG`] to `path`, creating parent directories.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_starter_config(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::Validation(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, STARTER_CONFIG)?;
    Ok(())
}
