//! Configuration file (mdxfix.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mdxfix_batch::DEFAULT_EXTENSIONS;
use mdxfix_core::RuleConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub docs: DocsConfig,
    #[serde(default)]
    pub rules: RuleConfig,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize)]
pub struct DocsConfig {
    #[serde(default = "default_docs_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            dir: default_docs_dir(),
            extensions: default_extensions(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_backup")]
    pub backup: bool,
    #[serde(default)]
    pub parallel: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            backup: default_backup(),
            parallel: false,
        }
    }
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}
fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}
fn default_backup() -> bool {
    true
}

/// Load configuration if the file exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

pub const DEFAULT_CONFIG: &str = r#"# mdxfix configuration

[docs]
# Directory scanned when no paths are given
dir = "docs"

# File extensions to rewrite
extensions = ["md", "mdx"]

[rules]
# Wrap {{ ... }} template tokens in inline code
double_curly = true

# Wrap {% ... %} tags
percent_tags = true

# Wrap short {token} expressions (key: value braces are left alone)
single_curly = true

# Rewrite <br> and <hr> as <br /> and <hr />
void_elements = true

# Angle-bracket placeholders: "literal", "generic" or "off"
placeholders = "literal"

# Exact placeholders wrapped in "literal" and "generic" modes
placeholder_literals = ["<YOUR_API_KEY>", "<access_token>", "</id>", "</cli>", "</dir>"]

[output]
# Keep a .bak copy of each file before its first rewrite
backup = true

# Rewrite files in parallel (`--no-parallel` turns it off for one run)
parallel = false
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use mdxfix_core::PlaceholderMode;
    use tempfile::tempdir;

    #[test]
    fn default_config_parses_to_defaults() {
        let config: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap();

        assert_eq!(config.docs.dir, PathBuf::from("docs"));
        assert_eq!(config.docs.extensions, vec!["md", "mdx"]);
        assert_eq!(config.rules, RuleConfig::default());
        assert!(config.output.backup);
        assert!(!config.output.parallel);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config: ConfigFile = toml::from_str(
            r#"
[rules]
placeholders = "generic"
single_curly = false
"#,
        )
        .unwrap();

        assert_eq!(config.rules.placeholders, PlaceholderMode::Generic);
        assert!(!config.rules.single_curly);
        assert!(config.rules.double_curly);
        assert_eq!(config.rules.placeholder_literals.len(), 5);
        assert_eq!(config.docs.dir, PathBuf::from("docs"));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = load_config(&temp.path().join("mdxfix.toml")).unwrap();

        assert!(config.output.backup);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("mdxfix.toml");
        fs::write(&path, "[rules\nplaceholders = 1").unwrap();

        let err = load_config(&path).unwrap_err();

        assert!(err.to_string().contains("Failed to parse"));
    }
}
