use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Path or http(s) URL of the defects file.
    pub data_location: String,
    /// When set, relative `data_location` values resolve against it.
    pub data_base_url: Option<String>,
    pub out_path: String,
    pub host: String,
    pub port: u16,
    /// Always starts and ends with `/`.
    pub base_path: String,
    pub theme: Theme,
    pub currency: String,
    pub top_n: usize,
    pub fetch_retries: u32,
    pub fetch_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_location: "data/defects_data.csv".to_string(),
            data_base_url: None,
            out_path: "out/dashboard/index.html".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            base_path: "/".to_string(),
            theme: Theme::Light,
            currency: "£".to_string(),
            top_n: 5,
            fetch_retries: 3,
            fetch_timeout_secs: 30,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            data_location: std::env::var("DEFECTS_CSV").unwrap_or(d.data_location),
            data_base_url: std::env::var("DASH_DATA_BASE_URL").ok().filter(|v| !v.trim().is_empty()),
            out_path: std::env::var("DASH_OUT").unwrap_or(d.out_path),
            host: std::env::var("DASH_HOST").unwrap_or(d.host),
            port: std::env::var("DASH_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(d.port),
            base_path: normalize_base_path(&std::env::var("DASH_BASE_PATH").unwrap_or(d.base_path)),
            theme: std::env::var("DASH_THEME").map(|v| Theme::parse(&v)).unwrap_or(d.theme),
            currency: std::env::var("DASH_CURRENCY").unwrap_or(d.currency),
            top_n: std::env::var("DASH_TOP_N").ok().and_then(|v| v.parse().ok()).filter(|n| *n > 0).unwrap_or(d.top_n),
            fetch_retries: std::env::var("FETCH_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(d.fetch_retries),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.fetch_timeout_secs),
        }
    }

    pub fn with_base_path(mut self, raw: &str) -> Self {
        self.base_path = normalize_base_path(raw);
        self
    }
}

/// `data-analysis` -> `/data-analysis/`, `` -> `/`.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_is_normalized() {
        assert_eq!(normalize_base_path(""), "/");
        assert_eq!(normalize_base_path("/"), "/");
        assert_eq!(normalize_base_path("data-analysis"), "/data-analysis/");
        assert_eq!(normalize_base_path("/data-analysis/"), "/data-analysis/");
    }

    #[test]
    fn theme_parse_defaults_to_light() {
        assert_eq!(Theme::parse("DARK"), Theme::Dark);
        assert_eq!(Theme::parse("solarized"), Theme::Light);
    }
}
