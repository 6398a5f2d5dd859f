//! blog.toml configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use inkpress_pipeline::BuildConfig;

/// Configuration file structure (blog.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    site: SiteConfig,
    #[serde(default)]
    styles: StylesConfig,
    #[serde(default)]
    build: BuildSettings,
    #[serde(default)]
    generator: GeneratorConfig,
}

#[derive(Debug, Deserialize)]
struct SiteConfig {
    #[serde(default = "default_source")]
    source: String,
    #[serde(default = "default_output")]
    output: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            output: default_output(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct StylesConfig {
    /// Stylesheet inlined into post pages
    post: Option<String>,
    /// Stylesheet inlined into the index page
    index: Option<String>,
    /// Stylesheets bundled into every page after the page stylesheet
    shared: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct BuildSettings {
    #[serde(default = "default_minify")]
    minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct GeneratorConfig {
    /// Generator script, relative to the source root
    script: Option<String>,
    /// Interpreter candidates, tried in order
    interpreters: Option<Vec<String>>,
}

fn default_source() -> String {
    ".".to_string()
}
fn default_output() -> String {
    "output".to_string()
}
fn default_minify() -> bool {
    true
}

impl ConfigFile {
    /// Load configuration from blog.toml if it exists.
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
            let config: ConfigFile = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
            tracing::info!("Loaded config from {}", path.display());
            return Ok(config);
        }
        Ok(ConfigFile::default())
    }

    /// Turn the file into a pipeline configuration, applying CLI overrides.
    pub fn into_build_config(
        self,
        output: Option<PathBuf>,
        production: bool,
        minify: Option<bool>,
        live_reload: bool,
    ) -> BuildConfig {
        let defaults = BuildConfig::default();

        BuildConfig {
            source_dir: PathBuf::from(&self.site.source),
            output_dir: output.unwrap_or_else(|| PathBuf::from(&self.site.output)),
            generator_script: self
                .generator
                .script
                .map(PathBuf::from)
                .unwrap_or(defaults.generator_script),
            interpreters: self
                .generator
                .interpreters
                .map(|list| list.into_iter().map(PathBuf::from).collect())
                .unwrap_or(defaults.interpreters),
            post_style: self
                .styles
                .post
                .map(PathBuf::from)
                .unwrap_or(defaults.post_style),
            index_style: self
                .styles
                .index
                .map(PathBuf::from)
                .unwrap_or(defaults.index_style),
            shared_styles: self
                .styles
                .shared
                .map(|list| list.into_iter().map(PathBuf::from).collect())
                .unwrap_or(defaults.shared_styles),
            minify: minify.unwrap_or(self.build.minify),
            production,
            live_reload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: ConfigFile = toml::from_str("").unwrap();
        let build = config.into_build_config(None, false, None, false);

        assert_eq!(build.output_dir, PathBuf::from("output"));
        assert!(build.minify);
        assert!(!build.production);
    }

    #[test]
    fn overrides_win_over_file_values() {
        let config: ConfigFile = toml::from_str(
            r#"
[site]
output = "dist"

[build]
minify = true
"#,
        )
        .unwrap();

        let build =
            config.into_build_config(Some(PathBuf::from("elsewhere")), true, Some(false), true);

        assert_eq!(build.output_dir, PathBuf::from("elsewhere"));
        assert!(!build.minify);
        assert!(build.production);
        assert!(build.live_reload);
    }

    #[test]
    fn generator_table_is_honored() {
        let config: ConfigFile = toml::from_str(
            r#"
[generator]
script = "build_site.py"
interpreters = ["venv/bin/python", "python3"]
"#,
        )
        .unwrap();

        let build = config.into_build_config(None, false, None, false);

        assert_eq!(build.generator_script, PathBuf::from("build_site.py"));
        assert_eq!(build.interpreters.len(), 2);
    }
}
