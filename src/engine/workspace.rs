use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use chrono::Utc;

use super::registry::LanguageProfile;

/// Entry-class name used when the source declares no public class
pub const DEFAULT_CLASS_NAME: &str = "Main";

// Distinguishes workspaces created within the same nanosecond.
static WORKSPACE_SEQ: AtomicU64 = AtomicU64::new(0);

/// An exclusive, disposable directory holding one execution's staged
/// source and any compiled artifact.
///
/// Removal is tied to `Drop`, so every exit path of an execution
/// (success, stage failure, timeout, panic) releases the directory.
#[derive(Debug)]
pub struct Workspace {
    id: String,
    path: PathBuf,
}

impl Workspace {
    /// Allocates a fresh uniquely named directory under `root`.
    pub fn create(root: &Path) -> Result<Self> {
        let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let seq = WORKSPACE_SEQ.fetch_add(1, Ordering::Relaxed);
        let id = format!("{stamp}-{seq}");
        let path = root.join(&id);
        fs::create_dir_all(&path).with_context(|| {
            format!("failed to create execution directory {}", path.display())
        })?;
        Ok(Self { id, path })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the submitted source verbatim into the workspace and returns
    /// the staged filename.
    ///
    /// The filename stem is `main` for every language except those run by
    /// class name, where it must match the declared public entry class for
    /// the artifact lookup to work.
    pub fn stage(&self, profile: &LanguageProfile, code: &str) -> Result<String> {
        let stem = if profile.stages_by_class_name() {
            extract_entry_class(code).unwrap_or_else(|| DEFAULT_CLASS_NAME.to_string())
        } else {
            "main".to_string()
        };
        let file_name = format!("{stem}{}", profile.extension);
        let file_path = self.path.join(&file_name);
        fs::write(&file_path, code)
            .with_context(|| format!("failed to write code file {}", file_path.display()))?;
        Ok(file_name)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_dir_all(&self.path) {
                log::warn!("failed to remove workspace {}: {e}", self.path.display());
            }
        }
    }
}

/// Scans the source for a `public class <Name>` declaration and returns
/// the declared name with any trailing `{` stripped.
///
/// Best-effort by design: a declaration split across lines or hidden
/// inside a comment will not be recognized, and callers fall back to
/// [`DEFAULT_CLASS_NAME`].
fn extract_entry_class(code: &str) -> Option<String> {
    for line in code.lines() {
        let line = line.trim();
        if !line.starts_with("public class ") {
            continue;
        }
        if let Some(name) = line.split_whitespace().nth(2) {
            let name = name.trim_end_matches('{');
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    None
}
