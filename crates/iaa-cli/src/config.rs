//! Configuration file loading and merging with command-line overrides.
//!
//! Precedence, highest first: command-line flags (and their environment
//! variables), the `iaa.toml` file, built-in defaults.

use anyhow::{Context, Result};
use iaa_core::{RunConfig, Selector, Variant};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "iaa.toml";

pub const DEFAULT_RUN: u32 = 3;
pub const DEFAULT_GROUP: &str = "experiment1";
pub const DEFAULT_DATA_DIR: &str = "data";

/// Contents of `iaa.toml`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub data_dir: Option<PathBuf>,
    pub run: Option<u32>,
    pub group: Option<String>,
    pub batch: Option<Selector>,
    pub questions: Option<Selector>,
    pub remove_not_val: Option<bool>,
    pub variants: Option<Vec<Variant>>,
    #[serde(default)]
    pub clean: CleanConfig,
}

/// `[clean]` table: how the clean dataset is produced.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CleanConfig {
    /// Program and fixed arguments. Absent means the clean dataset already exists.
    pub command: Option<Vec<String>>,
    #[serde(default)]
    pub timeout_secs: u64,
}

/// Values supplied on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub run: Option<u32>,
    pub group: Option<String>,
    pub batch: Option<Selector>,
    pub questions: Option<Selector>,
    pub keep_not_val: bool,
    pub variants: Vec<Variant>,
    pub clean_cmd: Option<String>,
    pub clean_timeout_secs: Option<u64>,
}

/// Fully resolved settings for one `report` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub selection: RunConfig,
    pub variants: Vec<Variant>,
    pub clean_command: Option<Vec<String>>,
    pub clean_timeout_secs: u64,
}

impl FileConfig {
    /// Load `path`, or the default file if present. A missing explicit path
    /// is an error; a missing default file is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !path.exists() {
            if required {
                anyhow::bail!("config file not found: {}", path.display());
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Merge file values and overrides into final settings.
pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Settings> {
    let mut selection = RunConfig::new(
        overrides.run.or(file.run).unwrap_or(DEFAULT_RUN),
        overrides
            .group
            .or(file.group)
            .unwrap_or_else(|| DEFAULT_GROUP.to_string()),
    )
    .with_batch(overrides.batch.or(file.batch).unwrap_or_default())
    .with_questions(overrides.questions.or(file.questions).unwrap_or_default());

    if overrides.keep_not_val {
        selection = selection.with_remove_not_val(false);
    } else if let Some(remove) = file.remove_not_val {
        selection = selection.with_remove_not_val(remove);
    }
    selection.validate()?;

    let variants = if !overrides.variants.is_empty() {
        overrides.variants
    } else {
        file.variants.unwrap_or_else(|| Variant::ALL.to_vec())
    };

    let clean_command = match overrides.clean_cmd {
        Some(cmd) => Some(split_command(&cmd)),
        None => file.clean.command,
    }
    .filter(|argv| !argv.is_empty());

    Ok(Settings {
        data_dir: overrides
            .data_dir
            .or(file.data_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        selection,
        variants,
        clean_command,
        clean_timeout_secs: overrides
            .clean_timeout_secs
            .unwrap_or(file.clean.timeout_secs),
    })
}

/// Split a command string on whitespace. No shell quoting is interpreted;
/// use the `[clean] command` array in `iaa.toml` for arguments with spaces.
fn split_command(cmd: &str) -> Vec<String> {
    cmd.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file_or_flags() {
        let settings = resolve(FileConfig::default(), Overrides::default()).unwrap();
        assert_eq!(settings.selection, RunConfig::new(3, "experiment1"));
        assert_eq!(settings.variants, vec![Variant::Original, Variant::Clean]);
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert!(settings.clean_command.is_none());
    }

    #[test]
    fn test_file_values_apply() {
        let file = FileConfig::parse(
            r#"
            data_dir = "/srv/experiments"
            run = 5
            group = "experiment2"
            batch = "b3"
            questions = "*"
            remove_not_val = false
            variants = ["clean"]

            [clean]
            command = ["python3", "remove_contradictory_answers.py"]
            timeout_secs = 120
            "#,
        )
        .unwrap();

        let settings = resolve(file, Overrides::default()).unwrap();
        assert_eq!(settings.selection.run, 5);
        assert_eq!(settings.selection.group, "experiment2");
        assert_eq!(settings.selection.batch, Selector::Exact("b3".to_string()));
        assert!(!settings.selection.remove_not_val);
        assert_eq!(settings.variants, vec![Variant::Clean]);
        assert_eq!(settings.clean_timeout_secs, 120);
        assert_eq!(
            settings.clean_command,
            Some(vec![
                "python3".to_string(),
                "remove_contradictory_answers.py".to_string()
            ])
        );
    }

    #[test]
    fn test_flags_override_file() {
        let file = FileConfig {
            run: Some(5),
            group: Some("experiment2".to_string()),
            ..FileConfig::default()
        };
        let overrides = Overrides {
            run: Some(7),
            clean_cmd: Some("./clean.sh --fast".to_string()),
            variants: vec![Variant::Original],
            ..Overrides::default()
        };

        let settings = resolve(file, overrides).unwrap();
        assert_eq!(settings.selection.run, 7);
        assert_eq!(settings.selection.group, "experiment2");
        assert_eq!(settings.variants, vec![Variant::Original]);
        assert_eq!(
            settings.clean_command,
            Some(vec!["./clean.sh".to_string(), "--fast".to_string()])
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(FileConfig::parse("runs = 3").is_err());
    }

    #[test]
    fn test_bad_variant_rejected() {
        assert!(FileConfig::parse(r#"variants = ["raw"]"#).is_err());
    }

    #[test]
    fn test_invalid_group_rejected() {
        let overrides = Overrides {
            group: Some("../outside".to_string()),
            ..Overrides::default()
        };
        assert!(resolve(FileConfig::default(), overrides).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iaa.toml");
        std::fs::write(&path, "run = 4\n").unwrap();
        let file = FileConfig::load(Some(&path)).unwrap();
        assert_eq!(file.run, Some(4));
    }
}
