use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::data::aggregate::AggregateSettings;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Interactive data-industry salary dashboard", long_about = None)]
pub struct Cli {
    /// Dataset to open on start-up (.csv, .json or .parquet)
    pub dataset: Option<PathBuf>,

    /// JSON settings file; command-line flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of roles in the "top roles by mean salary" chart
    #[arg(long)]
    pub top_roles: Option<usize>,

    /// Number of buckets in the salary histogram
    #[arg(long)]
    pub bins: Option<usize>,

    /// Role whose mean salary is broken down by country
    #[arg(long)]
    pub country_role: Option<String>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Dashboard settings: defaults, then the JSON file, then the command line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub dataset: Option<PathBuf>,
    pub top_roles: usize,
    pub histogram_bins: usize,
    pub country_role: String,
    pub table_row_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            top_roles: 10,
            histogram_bins: 30,
            country_role: "Data Scientist".to_string(),
            table_row_height: 18.0,
        }
    }
}

impl DashboardConfig {
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(path) = &cli.dataset {
            config.dataset = Some(path.clone());
        }
        if let Some(n) = cli.top_roles {
            config.top_roles = n;
        }
        if let Some(n) = cli.bins {
            config.histogram_bins = n;
        }
        if let Some(role) = &cli.country_role {
            config.country_role = role.clone();
        }

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.top_roles == 0 {
            bail!("top_roles must be at least 1");
        }
        if self.histogram_bins == 0 {
            bail!("histogram_bins must be at least 1");
        }
        if !(self.table_row_height.is_finite() && self.table_row_height > 0.0) {
            bail!("table_row_height must be a positive number");
        }
        Ok(())
    }

    pub fn aggregate_settings(&self) -> AggregateSettings {
        AggregateSettings {
            top_roles: self.top_roles,
            histogram_bins: self.histogram_bins,
            country_role: self.country_role.clone(),
        }
    }
}
