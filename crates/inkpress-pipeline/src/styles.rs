//! Stylesheet bundling: gather, compile, and minify CSS for inlining.

use std::fs;
use std::path::PathBuf;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

/// Errors from compiling a stylesheet bundle.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("failed to read stylesheet {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse stylesheet {path}: {message}")]
    Parse { path: String, message: String },
}

/// An ordered list of stylesheets compiled into one blob for inlining.
#[derive(Debug, Clone)]
pub struct StyleBundle {
    sheets: Vec<PathBuf>,
}

impl StyleBundle {
    /// Create a bundle over the given sheets, in inclusion order.
    pub fn new(sheets: Vec<PathBuf>) -> Self {
        Self { sheets }
    }

    /// Compile every sheet and concatenate the results.
    ///
    /// Each sheet is parsed individually so a syntax error names the file
    /// it came from.
    pub fn compile(&self, minify: bool) -> Result<String, StyleError> {
        let mut combined = String::new();

        for sheet in &self.sheets {
            let css = fs::read_to_string(sheet).map_err(|e| StyleError::Read {
                path: sheet.display().to_string(),
                source: e,
            })?;

            let compiled = process_css(&css, minify).map_err(|message| StyleError::Parse {
                path: sheet.display().to_string(),
                message,
            })?;

            combined.push_str(&compiled);
            if !minify {
                combined.push('\n');
            }
        }

        Ok(combined)
    }
}

/// Parse and re-emit CSS through lightningcss.
fn process_css(css: &str, minify: bool) -> Result<String, String> {
    let stylesheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| format!("CSS parse error: {}", e))?;

    let out = stylesheet
        .to_css(PrinterOptions {
            minify,
            ..Default::default()
        })
        .map_err(|e| format!("CSS print error: {}", e))?;

    Ok(out.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn concatenates_sheets_in_order() {
        let temp = tempdir().unwrap();
        let a = temp.path().join("a.css");
        let b = temp.path().join("b.css");
        fs::write(&a, ".first { color: red; }").unwrap();
        fs::write(&b, ".second { color: blue; }").unwrap();

        let css = StyleBundle::new(vec![a, b]).compile(true).unwrap();

        let first = css.find(".first").unwrap();
        let second = css.find(".second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn minified_output_is_compact() {
        let temp = tempdir().unwrap();
        let sheet = temp.path().join("style.css");
        fs::write(&sheet, ".post {\n    margin: 0 auto;\n    padding: 1rem;\n}\n").unwrap();

        let css = StyleBundle::new(vec![sheet]).compile(true).unwrap();

        assert!(!css.contains('\n'));
        assert!(css.contains(".post"));
    }

    #[test]
    fn parse_error_names_the_file() {
        let temp = tempdir().unwrap();
        let bad = temp.path().join("broken.css");
        fs::write(&bad, ".oops { color: ").unwrap();

        let err = StyleBundle::new(vec![bad]).compile(true).unwrap_err();

        match err {
            StyleError::Parse { path, .. } => assert!(path.contains("broken.css")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn missing_sheet_is_a_read_error() {
        let err = StyleBundle::new(vec![PathBuf::from("/does/not/exist.css")])
            .compile(true)
            .unwrap_err();

        assert!(matches!(err, StyleError::Read { .. }));
    }
}
