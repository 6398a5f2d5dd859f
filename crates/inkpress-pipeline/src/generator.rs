//! Invocation of the external page generator.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::BuildConfig;

/// Errors from resolving or running the generator.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("no usable interpreter among candidates: {0}")]
    NoInterpreter(String),

    #[error("failed to run generator: {0}")]
    Spawn(std::io::Error),

    #[error("generator exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },
}

/// Runs the page generator as a subprocess.
///
/// The generator produces HTML posts, an index page, and rss.xml into the
/// staging directory it is handed.
#[derive(Debug)]
pub struct SiteGenerator {
    interpreter: PathBuf,
    script: PathBuf,
    workdir: PathBuf,
}

impl SiteGenerator {
    /// Resolve the interpreter from the configured candidate list.
    ///
    /// Relative multi-component candidates (a project-local virtualenv
    /// path) are anchored at the source root; bare names are searched on
    /// PATH.
    pub fn resolve(config: &BuildConfig) -> Result<Self, GeneratorError> {
        let candidates: Vec<PathBuf> = config
            .interpreters
            .iter()
            .map(|c| {
                if c.components().count() > 1 && c.is_relative() {
                    config.source_dir.join(c)
                } else {
                    c.clone()
                }
            })
            .collect();

        let interpreter = resolve_command(&candidates).ok_or_else(|| {
            let names: Vec<String> = candidates
                .iter()
                .map(|c| c.display().to_string())
                .collect();
            GeneratorError::NoInterpreter(names.join(", "))
        })?;

        Ok(Self {
            interpreter,
            script: config.generator_script.clone(),
            workdir: config.source_dir.clone(),
        })
    }

    /// The resolved interpreter command.
    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// Run the generator, writing its output into `staging_dir`.
    pub async fn generate(&self, staging_dir: &Path) -> Result<(), GeneratorError> {
        tracing::info!(
            "generating content with {} {}",
            self.interpreter.display(),
            self.script.display()
        );

        let output = tokio::process::Command::new(&self.interpreter)
            .arg(&self.script)
            .arg(staging_dir)
            .current_dir(&self.workdir)
            .output()
            .await
            .map_err(GeneratorError::Spawn)?;

        if !output.status.success() {
            return Err(GeneratorError::Failed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

/// Pick the first candidate command that exists and is executable.
///
/// Candidates with a path separator are probed directly; bare names are
/// searched on PATH.
pub fn resolve_command(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find_map(|candidate| {
        if candidate.components().count() > 1 {
            is_executable(candidate).then(|| candidate.clone())
        } else {
            search_path(candidate)
        }
    })
}

fn search_path(name: &Path) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|p| is_executable(p))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.is_file()
        && fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
