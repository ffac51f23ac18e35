use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::retry::{retry_async, RetryConfig};
use super::{parse_defects, DataError, ParsedDataset};
use crate::config::DashboardConfig;
use crate::logging::{info, obj, v_num, v_str, warn, Domain, ProfileScope};

#[async_trait]
pub trait DefectSource: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch_text(&self) -> Result<String, DataError>;

    /// Local file backing this source, if any.
    fn local_path(&self) -> Option<&Path> {
        None
    }
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DefectSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_text(&self) -> Result<String, DataError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DataError::io(&self.path, e))
    }

    fn local_path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

pub struct HttpSource {
    client: Client,
    url: Url,
    retry: RetryConfig,
}

impl HttpSource {
    pub fn new(url: Url, retry: RetryConfig, timeout: Duration) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| DataError::Request {
                url: url.to_string(),
                source,
            })?;
        Ok(Self { client, url, retry })
    }

    async fn fetch_once(&self) -> Result<String, DataError> {
        let url = self.url.to_string();
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|source| DataError::Request {
                url: url.clone(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::Http {
                url,
                status: status.as_u16(),
            });
        }
        resp.text()
            .await
            .map_err(|source| DataError::Request { url, source })
    }
}

#[async_trait]
impl DefectSource for HttpSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch_text(&self) -> Result<String, DataError> {
        retry_async(&self.retry, "fetch_defects", || self.fetch_once()).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    File(PathBuf),
    Remote(Url),
}

/// Absolute http(s) URLs are fetched; relative names resolve against
/// `base_url` when one is configured; everything else is a file path.
pub fn resolve_location(location: &str, base_url: Option<&str>) -> Result<Location, DataError> {
    let location = location.trim();
    if let Ok(url) = Url::parse(location) {
        if matches!(url.scheme(), "http" | "https") {
            return Ok(Location::Remote(url));
        }
    }
    match base_url {
        Some(base) if !Path::new(location).is_absolute() => {
            let base = if base.ends_with('/') {
                base.to_string()
            } else {
                format!("{}/", base)
            };
            let base = Url::parse(&base).map_err(|_| DataError::Location(base.clone()))?;
            let joined = base
                .join(location.trim_start_matches("./"))
                .map_err(|_| DataError::Location(location.to_string()))?;
            Ok(Location::Remote(joined))
        }
        _ => Ok(Location::File(PathBuf::from(location))),
    }
}

pub fn source_for(cfg: &DashboardConfig) -> Result<Box<dyn DefectSource>, DataError> {
    match resolve_location(&cfg.data_location, cfg.data_base_url.as_deref())? {
        Location::File(path) => Ok(Box::new(FileSource::new(path))),
        Location::Remote(url) => {
            let retry = RetryConfig {
                max_retries: cfg.fetch_retries,
                ..Default::default()
            };
            let timeout = Duration::from_secs(cfg.fetch_timeout_secs);
            Ok(Box::new(HttpSource::new(url, retry, timeout)?))
        }
    }
}

/// Fetch and parse; an empty result is `DataError::NoData`.
pub async fn load_dataset(source: &dyn DefectSource) -> Result<ParsedDataset, DataError> {
    let _scope = ProfileScope::with_context("load_dataset", &[("source", v_str(&source.describe()))]);
    let text = source.fetch_text().await?;
    info(
        Domain::Load,
        "fetched",
        obj(&[
            ("source", v_str(&source.describe())),
            ("bytes", v_num(text.len() as f64)),
        ]),
    );

    let parsed = parse_defects(&text)?;
    if parsed.skipped_rows > 0 || parsed.bad_rows > 0 {
        warn(
            Domain::Parse,
            "rows_dropped",
            obj(&[
                ("skipped_rows", v_num(parsed.skipped_rows as f64)),
                ("bad_rows", v_num(parsed.bad_rows as f64)),
            ]),
        );
    }
    if parsed.records.is_empty() {
        return Err(DataError::NoData);
    }
    info(
        Domain::Parse,
        "parsed",
        obj(&[("records", v_num(parsed.records.len() as f64))]),
    );
    Ok(parsed)
}
