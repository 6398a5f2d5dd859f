//! Asset copying and optional image optimization.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use rayon::prelude::*;
use walkdir::WalkDir;

/// Optimizer binaries tried in order when building for production.
pub const IMAGE_OPTIMIZER_CANDIDATES: &[&str] = &["oxipng", "optipng"];

/// Errors from the asset steps.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to copy {path}: {source}")]
    Copy {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to optimize {path}: {message}")]
    Optimize { path: String, message: String },
}

/// Copy a directory tree, preserving relative layout.
///
/// A missing source directory is not an error; those steps are optional
/// (a blog without videos simply has no videos/ directory). Returns the
/// number of files copied.
pub fn copy_tree(source: &Path, dest: &Path) -> Result<usize, AssetError> {
    if !source.is_dir() {
        tracing::debug!("skipping missing asset directory {}", source.display());
        return Ok(0);
    }

    let files: Vec<(PathBuf, PathBuf)> = WalkDir::new(source)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(source).unwrap_or(e.path());
            (e.path().to_path_buf(), dest.join(relative))
        })
        .collect();

    files.par_iter().try_for_each(|(from, to)| {
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|e| AssetError::Copy {
                path: to.display().to_string(),
                source: e,
            })?;
        }
        fs::copy(from, to).map_err(|e| AssetError::Copy {
            path: from.display().to_string(),
            source: e,
        })?;
        Ok(())
    })?;

    Ok(files.len())
}

/// Run every PNG under `dir` through the optimizer binary in place.
///
/// The optimizer is an external collaborator, resolved the same way as the
/// generator interpreter. Returns the number of files processed.
pub fn optimize_images(dir: &Path, optimizer: &Path) -> Result<usize, AssetError> {
    let pngs: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path().is_file()
                && e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    pngs.par_iter().try_for_each(|png| {
        let output = Command::new(optimizer)
            .arg(png)
            .output()
            .map_err(|e| AssetError::Optimize {
                path: png.display().to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(AssetError::Optimize {
                path: png.display().to_string(),
                message: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    })?;

    Ok(pngs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copies_nested_tree() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("images");
        let dst = temp.path().join("out");
        fs::create_dir_all(src.join("diagrams")).unwrap();
        fs::write(src.join("logo.png"), b"png").unwrap();
        fs::write(src.join("diagrams").join("arch.png"), b"png").unwrap();

        let copied = copy_tree(&src, &dst).unwrap();

        assert_eq!(copied, 2);
        assert!(dst.join("logo.png").is_file());
        assert!(dst.join("diagrams").join("arch.png").is_file());
    }

    #[test]
    fn missing_source_dir_copies_nothing() {
        let temp = tempdir().unwrap();
        let copied = copy_tree(&temp.path().join("videos"), &temp.path().join("out")).unwrap();

        assert_eq!(copied, 0);
    }
}
