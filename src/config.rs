use std::path::PathBuf;

/// Startup settings. The data path may be overridden by the first
/// positional argument; everything else is fixed.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    /// Group count of the two ranking charts.
    pub top_n: usize,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/medals_final_modified.csv"),
            top_n: 10,
            window_size: [1400.0, 900.0],
            min_window_size: [800.0, 500.0],
        }
    }
}

impl DashboardConfig {
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = args.nth(1) {
            config.data_path = PathBuf::from(path);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_path_overrides_default() {
        let args = ["medal-dashboard", "other.parquet"].map(String::from);
        let config = DashboardConfig::from_args(args.into_iter());
        assert_eq!(config.data_path, PathBuf::from("other.parquet"));
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn test_defaults_without_arguments() {
        let config = DashboardConfig::from_args(["medal-dashboard".to_string()].into_iter());
        assert_eq!(config.data_path, PathBuf::from("data/medals_final_modified.csv"));
    }
}
