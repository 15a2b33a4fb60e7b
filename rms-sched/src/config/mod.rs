//! Run configuration loading.
//!
//! Every setting has a default, so the configuration file is optional and
//! every key in it is optional too.  The expected YAML structure is:
//! ```yaml
//! idle_label: "Idle"          # label for idle runs in the diagram
//! exit_token: "exit"          # input line that ends collection
//! hyperperiod_limit: 10000000 # longest horizon the simulator will run
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::hyperperiod::DEFAULT_HYPERPERIOD_LIMIT;
use crate::input::DEFAULT_EXIT_TOKEN;
use crate::scheduler::RmsSimulator;
use crate::task::Tick;
use crate::trace::DEFAULT_IDLE_LABEL;

// ── Private YAML deserialization type ─────────────────────────────────────────

/// Mirrors the YAML file layout.  Kept private; callers use [`RunConfig`].
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RunConfigFile {
    idle_label: Option<String>,
    exit_token: Option<String>,
    hyperperiod_limit: Option<Tick>,
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Settings for one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Label printed for idle runs in the scheduling diagram.
    pub idle_label: String,
    /// Input line that terminates task-set collection.
    pub exit_token: String,
    /// Longest hyperperiod (in ticks) the simulator will run.
    pub hyperperiod_limit: Tick,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            idle_label: DEFAULT_IDLE_LABEL.to_string(),
            exit_token: DEFAULT_EXIT_TOKEN.to_string(),
            hyperperiod_limit: DEFAULT_HYPERPERIOD_LIMIT,
        }
    }
}

impl RunConfig {
    /// Parse and validate the YAML file at `path`.
    ///
    /// Keys absent from the file keep their default value.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid YAML, names
    /// an unknown key, or fails [`validate`](Self::validate).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading run configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))
    }

    /// Parse and validate a YAML document.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: RunConfigFile = if content.trim().is_empty() {
            RunConfigFile::default()
        } else {
            serde_yaml::from_str(content).context("Failed to parse YAML")?
        };

        let defaults = Self::default();
        let config = Self {
            idle_label: file.idle_label.unwrap_or(defaults.idle_label),
            exit_token: file.exit_token.unwrap_or(defaults.exit_token),
            hyperperiod_limit: file.hyperperiod_limit.unwrap_or(defaults.hyperperiod_limit),
        };
        config.validate()?;

        debug!(
            idle_label = %config.idle_label,
            exit_token = %config.exit_token,
            hyperperiod_limit = config.hyperperiod_limit,
            "Run configuration"
        );

        Ok(config)
    }

    /// Check the invariants the rest of the pipeline relies on.
    ///
    /// * `idle_label` has at least two characters, so it can never be read
    ///   as a single-symbol task id.
    /// * `exit_token` is not blank.
    /// * `hyperperiod_limit` is positive.
    pub fn validate(&self) -> Result<()> {
        if self.idle_label.chars().count() < 2 {
            bail!(
                "idle_label '{}' must be at least two characters so it cannot match a task id",
                self.idle_label
            );
        }
        if self.exit_token.trim().is_empty() {
            bail!("exit_token must not be empty");
        }
        if self.hyperperiod_limit == 0 {
            bail!("hyperperiod_limit must be positive");
        }
        Ok(())
    }

    /// Simulator honouring this configuration's horizon limit.
    pub fn simulator(&self) -> RmsSimulator {
        RmsSimulator::with_limit(self.hyperperiod_limit)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
