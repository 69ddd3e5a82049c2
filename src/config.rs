use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::error::DashboardError;
use crate::data::model::{Metric, ALL_SECTORS};

/// Environment variable naming the JSON config file.
pub const CONFIG_ENV: &str = "TECH_DASHBOARD_CONFIG";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field is optional in the file.
///
/// ```json
/// {
///   "dataset": "data/China vs Japan Technology.csv",
///   "default_metric": "Tech Exports (in USD)",
///   "country_colors": { "Korea": "#43a047" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset opened at startup.
    pub dataset: Option<PathBuf>,
    /// Metric label selected initially.
    pub default_metric: String,
    pub default_sector: String,
    /// `#rrggbb` per country. Entries here override the built-in ones.
    pub country_colors: BTreeMap<String, String>,
    /// Scatter bubble radius range, in points.
    pub bubble_radius: [f32; 2],
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            default_metric: Metric::MarketShare.label().to_string(),
            default_sector: ALL_SECTORS.to_string(),
            country_colors: default_country_colors(),
            bubble_radius: [5.0, 20.0],
            window_size: [1280.0, 900.0],
        }
    }
}

fn default_country_colors() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("China".to_string(), "#1e88e5".to_string()),
        ("Japan".to_string(), "#ff5722".to_string()),
    ])
}

impl DashboardConfig {
    /// Parse a config file. Colours listed in the file are merged over the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: DashboardConfig =
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;

        let mut colors = default_country_colors();
        colors.append(&mut config.country_colors);
        config.country_colors = colors;
        Ok(config)
    }

    /// Config from [`CONFIG_ENV`], falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        let path = PathBuf::from(path);
        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    /// The configured initial metric.
    pub fn metric(&self) -> Result<Metric, DashboardError> {
        Metric::from_label(&self.default_metric)
            .ok_or_else(|| DashboardError::UnknownMetric(self.default_metric.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.metric(), Ok(Metric::MarketShare));
        assert_eq!(config.default_sector, "All");
        assert_eq!(config.country_colors["China"], "#1e88e5");
        assert_eq!(config.bubble_radius, [5.0, 20.0]);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{"default_metric": "Tech Exports (in USD)", "country_colors": {{"Korea": "#43a047"}}}}"##
        )
        .unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.metric(), Ok(Metric::TechExports));
        assert_eq!(config.default_sector, "All");
        assert_eq!(config.country_colors.len(), 3);
        assert_eq!(config.country_colors["Korea"], "#43a047");
        assert_eq!(config.country_colors["Japan"], "#ff5722");
    }

    #[test]
    fn unknown_metric_is_rejected() {
        let config = DashboardConfig {
            default_metric: "GDP".into(),
            ..Default::default()
        };
        assert_eq!(config.metric(), Err(DashboardError::UnknownMetric("GDP".into())));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(DashboardConfig::from_file(file.path()).is_err());
    }
}
