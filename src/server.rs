//! Local dashboard server.
//!
//! Every dashboard or API request reloads the source, so edits to the CSV
//! show up on refresh.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use crate::analysis::Summary;
use crate::config::DashboardConfig;
use crate::data::source::{load_dataset, source_for};
use crate::data::{DataError, ParsedDataset};
use crate::logging::{self, error, info, obj, v_num, v_str, warn, Domain, Level};
use crate::render::html::{render_dashboard, render_error_page, render_no_data_page, RenderOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    RawCsv,
    Summary,
    Health,
    NotFound,
    MethodNotAllowed,
}

/// Map a request line onto a route under `base_path` (which starts and ends with `/`).
pub fn route(request_line: &str, base_path: &str) -> Route {
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("");
    let path = target.split(['?', '#']).next().unwrap_or("");

    let rest = match path.strip_prefix(base_path) {
        Some(rest) => rest,
        None if path == base_path.trim_end_matches('/') && !path.is_empty() => "",
        None => return Route::NotFound,
    };
    let found = match rest {
        "" | "index.html" => Route::Dashboard,
        "defects_data.csv" => Route::RawCsv,
        "api/summary" => Route::Summary,
        "api/health" => Route::Health,
        _ => Route::NotFound,
    };
    if found != Route::NotFound && method != "GET" {
        return Route::MethodNotAllowed;
    }
    found
}

#[derive(Debug)]
pub struct Response {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Response {
    fn new(status: &'static str, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    fn json(status: &'static str, value: serde_json::Value) -> Self {
        Self::new(status, "application/json", value.to_string())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!(
            "HTTP/1.1 {}\r\n\
             Content-Type: {}\r\n\
             Access-Control-Allow-Origin: *\r\n\
             Cache-Control: no-store\r\n\
             Connection: close\r\n\
             Content-Length: {}\r\n\r\n",
            self.status,
            self.content_type,
            self.body.len()
        )
        .into_bytes();
        out.extend_from_slice(&self.body);
        out
    }
}

fn render_options(cfg: &DashboardConfig, source: String) -> RenderOptions {
    RenderOptions {
        theme: cfg.theme,
        currency: cfg.currency.clone(),
        source,
        generated_at: logging::ts_now(),
    }
}

async fn load(cfg: &DashboardConfig) -> (String, Result<ParsedDataset, DataError>) {
    match source_for(cfg) {
        Ok(source) => {
            let described = source.describe();
            (described, load_dataset(source.as_ref()).await)
        }
        Err(e) => (cfg.data_location.clone(), Err(e)),
    }
}

async fn dashboard(cfg: &DashboardConfig) -> Response {
    let (source, loaded) = load(cfg).await;
    let opts = render_options(cfg, source);
    let page = match loaded {
        Ok(parsed) => {
            let summary = Summary::compute(&parsed.records, cfg.top_n);
            render_dashboard(&parsed.records, &summary, &opts)
        }
        Err(DataError::NoData) => render_no_data_page(&opts),
        Err(e) => {
            error(Domain::Serve, "load_failed", obj(&[("error", v_str(&e.to_string()))]));
            render_error_page(&e.to_string(), &opts)
        }
    };
    Response::new("200 OK", "text/html; charset=utf-8", page)
}

async fn summary(cfg: &DashboardConfig) -> Response {
    match load(cfg).await.1 {
        Ok(parsed) => {
            let summary = Summary::compute(&parsed.records, cfg.top_n);
            match serde_json::to_value(&summary) {
                Ok(v) => Response::json("200 OK", v),
                Err(e) => Response::json(
                    "500 Internal Server Error",
                    serde_json::json!({ "error": e.to_string() }),
                ),
            }
        }
        Err(DataError::NoData) => {
            Response::json("404 Not Found", serde_json::json!({ "error": "no data" }))
        }
        Err(e) => Response::json("502 Bad Gateway", serde_json::json!({ "error": e.to_string() })),
    }
}

async fn raw_csv(cfg: &DashboardConfig) -> Response {
    let source = match source_for(cfg) {
        Ok(s) => s,
        Err(e) => return Response::new("502 Bad Gateway", "text/plain", e.to_string()),
    };
    let Some(path) = source.local_path() else {
        return Response::new("404 Not Found", "text/plain", "Not Found");
    };
    match tokio::fs::read(path).await {
        Ok(bytes) => Response::new("200 OK", "text/csv; charset=utf-8", bytes),
        Err(_) => Response::new("404 Not Found", "text/plain", "Not Found"),
    }
}

pub async fn respond(route: Route, cfg: &DashboardConfig) -> Response {
    match route {
        Route::Dashboard => dashboard(cfg).await,
        Route::RawCsv => raw_csv(cfg).await,
        Route::Summary => summary(cfg).await,
        Route::Health => Response::json("200 OK", serde_json::json!({ "status": "ok" })),
        Route::NotFound => Response::new("404 Not Found", "text/plain", "Not Found"),
        Route::MethodNotAllowed => Response::new("405 Method Not Allowed", "text/plain", "Method Not Allowed"),
    }
}

/// Upper bound on request line plus headers.
pub const MAX_HEAD_BYTES: u64 = 8192;

#[derive(Debug, PartialEq, Eq)]
pub enum RequestHead {
    Line(String),
    TooLarge,
    Closed,
}

/// Read the request line and drain headers, never reading more than
/// `MAX_HEAD_BYTES`. Bodies are never needed.
pub async fn read_head<R: AsyncRead + Unpin>(reader: R) -> std::io::Result<RequestHead> {
    let mut lines = BufReader::new(reader.take(MAX_HEAD_BYTES)).lines();
    let Some(request_line) = lines.next_line().await? else {
        return Ok(RequestHead::Closed);
    };
    let mut complete = false;
    while let Some(line) = lines.next_line().await? {
        if line.is_empty() {
            complete = true;
            break;
        }
    }
    if !complete && lines.get_ref().get_ref().limit() == 0 {
        return Ok(RequestHead::TooLarge);
    }
    Ok(RequestHead::Line(request_line))
}

async fn handle(stream: TcpStream, cfg: Arc<DashboardConfig>) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let (request_line, response) = match read_head(reader).await? {
        RequestHead::Closed => return Ok(()),
        RequestHead::TooLarge => (
            String::new(),
            Response::new("431 Request Header Fields Too Large", "text/plain", "Request Too Large"),
        ),
        RequestHead::Line(line) => {
            let response = respond(route(&line, &cfg.base_path), &cfg).await;
            (line, response)
        }
    };
    logging::log(
        Level::Debug,
        Domain::Serve,
        "request",
        obj(&[
            ("request", v_str(&request_line)),
            ("status", v_str(response.status)),
            ("bytes", v_num(response.body.len() as f64)),
        ]),
    );
    writer.write_all(&response.to_bytes()).await?;
    writer.shutdown().await
}

pub async fn bind(cfg: &DashboardConfig) -> Result<TcpListener> {
    let addr = format!("{}:{}", cfg.host, cfg.port);
    TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))
}

/// Accept connections forever; each one gets its own task.
pub async fn run(listener: TcpListener, cfg: DashboardConfig) -> Result<()> {
    let local = listener.local_addr()?;
    info(
        Domain::Serve,
        "listening",
        obj(&[
            ("url", v_str(&format!("http://{}{}", local, cfg.base_path))),
            ("data", v_str(&cfg.data_location)),
        ]),
    );
    let cfg = Arc::new(cfg);
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                warn(Domain::Serve, "accept_failed", obj(&[("error", v_str(&e.to_string()))]));
                continue;
            }
        };
        let cfg = Arc::clone(&cfg);
        tokio::spawn(async move {
            if let Err(e) = handle(stream, cfg).await {
                warn(
                    Domain::Serve,
                    "connection_error",
                    obj(&[("peer", v_str(&peer.to_string())), ("error", v_str(&e.to_string()))]),
                );
            }
        });
    }
}

pub async fn serve(cfg: DashboardConfig) -> Result<()> {
    let listener = bind(&cfg).await?;
    run(listener, cfg).await
}
