mod registry;
mod stages;
mod workspace;

pub use registry::{CompileTemplate, LanguageProfile, LanguageRegistry, RunTemplate};
pub use workspace::{DEFAULT_CLASS_NAME, Workspace};

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;

use stages::{COMPILE_TIMEOUT, StageOutcome, invoke};

/// Terminal failure of one execution request. Variants carry captured
/// process output where any exists, so output and error are not mutually
/// exclusive.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("failed to set up execution workspace: {0}")]
    Setup(#[source] anyhow::Error),
    #[error("compilation failed")]
    Compilation { diagnostics: String },
    #[error("program exited with status {}", fmt_status(.status))]
    Run {
        output: String,
        status: Option<i32>,
    },
    #[error("failed to launch program: {0}")]
    Launch(#[source] anyhow::Error),
    #[error("execution timeout after {0:?}")]
    Timeout(Duration),
}

fn fmt_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

impl ExecutionError {
    /// Captured process output accompanying the failure, when any exists.
    /// Compiler diagnostics are prefixed so callers can tell them apart
    /// from runtime output by framing alone.
    pub fn captured_output(&self) -> Option<String> {
        match self {
            Self::Compilation { diagnostics } => {
                Some(format!("Compilation Error:\n{diagnostics}"))
            }
            Self::Run { output, .. } if !output.is_empty() => Some(output.clone()),
            _ => None,
        }
    }
}

/// Sequences workspace staging, the optional build stage, the timeout-raced
/// run stage, and unconditional cleanup for one request at a time.
///
/// Shared read-only across concurrent executions; each call owns its own
/// workspace and child process, so no locking is involved.
pub struct Executor {
    registry: LanguageRegistry,
    workspace_root: PathBuf,
}

impl Executor {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_registry(workspace_root, LanguageRegistry::builtin())
    }

    pub fn with_registry(
        workspace_root: impl Into<PathBuf>,
        registry: LanguageRegistry,
    ) -> Result<Self> {
        let workspace_root = workspace_root.into();
        std::fs::create_dir_all(&workspace_root).with_context(|| {
            format!(
                "failed to create workspace root {}",
                workspace_root.display()
            )
        })?;
        Ok(Self {
            registry,
            workspace_root,
        })
    }

    /// Supported language identifiers, sorted
    pub fn languages(&self) -> Vec<&str> {
        self.registry.names()
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Compiles (if the language requires it) and runs one submission.
    ///
    /// Every failure is terminal for the request; nothing is retried. The
    /// workspace is removed on every path out of this function, including
    /// panic unwind, because removal hangs off the workspace's `Drop`.
    pub async fn execute(&self, language: &str, code: &str) -> Result<String, ExecutionError> {
        let profile = self
            .registry
            .get(language)
            .ok_or_else(|| ExecutionError::UnsupportedLanguage(language.to_string()))?;

        let workspace =
            Workspace::create(&self.workspace_root).map_err(ExecutionError::Setup)?;
        log::debug!("created workspace {} for {language}", workspace.id());

        let source_file = workspace.stage(profile, code).map_err(ExecutionError::Setup)?;

        if let Some(template) = &profile.compile {
            let (program, args) = template.command(&source_file);
            // Build-stage launch failures keep the compilation framing, so
            // callers can tell the failing stage apart from run failures.
            let outcome = invoke(&program, &args, workspace.path(), COMPILE_TIMEOUT)
                .await
                .map_err(|e| ExecutionError::Compilation {
                    diagnostics: format!("failed to launch compiler: {e:#}"),
                })?;
            match outcome {
                StageOutcome::Completed(out) if out.success => {
                    log::debug!("compiled {source_file} in workspace {}", workspace.id());
                }
                StageOutcome::Completed(out) => {
                    return Err(ExecutionError::Compilation {
                        diagnostics: out.output,
                    });
                }
                StageOutcome::TimedOut => return Err(ExecutionError::Timeout(COMPILE_TIMEOUT)),
            }
        }

        let (program, args) = profile.run.command(&source_file, workspace.path());
        let outcome = invoke(&program, &args, workspace.path(), profile.timeout)
            .await
            .map_err(ExecutionError::Launch)?;
        match outcome {
            StageOutcome::Completed(out) if out.success => Ok(out.output),
            StageOutcome::Completed(out) => Err(ExecutionError::Run {
                output: out.output,
                status: out.status,
            }),
            StageOutcome::TimedOut => Err(ExecutionError::Timeout(profile.timeout)),
        }
    }
}
