use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};

use defectdash::analysis::Summary;
use defectdash::config::{DashboardConfig, Theme};
use defectdash::data::source::{load_dataset, source_for};
use defectdash::data::{analyze_csv, default_manifest_path, validate_schema, DataError, ParsedDataset};
use defectdash::logging::{self, info, obj, v_num, v_str, Domain};
use defectdash::model::Severity;
use defectdash::render::html::{render_dashboard, render_error_page, render_no_data_page, RenderOptions};
use defectdash::render::text::{summary_report, table_report};
use defectdash::sample;
use defectdash::server;
use defectdash::table::{Column, SortDir, TableQuery};

#[derive(Parser)]
#[command(name = "defectdash", version, about = "Manufacturing defects dashboard")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// CSV path or http(s) URL (overrides DEFECTS_CSV)
    #[arg(long, global = true)]
    data: Option<String>,

    /// light or dark
    #[arg(long, global = true)]
    theme: Option<String>,

    #[arg(long, global = true)]
    currency: Option<String>,

    /// How many defect types count as "top"
    #[arg(long, global = true)]
    top_n: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Print overview cards and breakdowns
    Summary {
        /// Emit the summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the defect table with search, filter and sort
    Table {
        #[arg(long)]
        search: Option<String>,
        /// Critical, Moderate, Minor or all
        #[arg(long)]
        severity: Option<String>,
        /// Column to sort by (e.g. cost, date, id, type)
        #[arg(long)]
        sort: Option<Column>,
        #[arg(long, default_value = "asc")]
        dir: SortDir,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Write the static HTML dashboard
    Render {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Serve the dashboard over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        base_path: Option<String>,
    },
    /// Validate the header and write a manifest next to a local CSV
    Manifest,
    /// Write a synthetic dataset
    Generate {
        #[arg(long, default_value_t = 1000)]
        rows: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value = "data/defects_data.csv")]
        out: PathBuf,
    },
}

fn config_from(global: &GlobalArgs) -> DashboardConfig {
    let mut cfg = DashboardConfig::from_env();
    if let Some(data) = &global.data {
        cfg.data_location = data.clone();
    }
    if let Some(theme) = &global.theme {
        cfg.theme = Theme::parse(theme);
    }
    if let Some(currency) = &global.currency {
        cfg.currency = currency.clone();
    }
    if let Some(n) = global.top_n.filter(|n| *n > 0) {
        cfg.top_n = n;
    }
    cfg
}

async fn load(cfg: &DashboardConfig) -> Result<(String, ParsedDataset), DataError> {
    let source = source_for(cfg)?;
    let parsed = load_dataset(source.as_ref()).await?;
    Ok((source.describe(), parsed))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(())
}

async fn render(cfg: &DashboardConfig, out: &Path) -> Result<()> {
    let mut opts = RenderOptions {
        theme: cfg.theme,
        currency: cfg.currency.clone(),
        source: cfg.data_location.clone(),
        generated_at: logging::ts_now(),
    };
    let loaded = load(cfg).await;
    let page = match &loaded {
        Ok((source, parsed)) => {
            opts.source = source.clone();
            let summary = Summary::compute(&parsed.records, cfg.top_n);
            render_dashboard(&parsed.records, &summary, &opts)
        }
        Err(DataError::NoData) => render_no_data_page(&opts),
        Err(e) => render_error_page(&e.to_string(), &opts),
    };
    ensure_parent(out)?;
    fs::write(out, page).with_context(|| format!("writing {}", out.display()))?;
    info(
        Domain::Render,
        "dashboard_written",
        obj(&[("path", v_str(&out.display().to_string())), ("ok", loaded.is_ok().into())]),
    );
    match loaded {
        Ok(_) => {
            println!("wrote {}", out.display());
            Ok(())
        }
        Err(e) => bail!("wrote {} with a placeholder page: {}", out.display(), e),
    }
}

fn manifest(cfg: &DashboardConfig) -> Result<()> {
    let path = PathBuf::from(&cfg.data_location);
    let schema = validate_schema(&path)?;
    if !schema.ok {
        bail!("schema mismatch: {}", schema.message);
    }
    let (manifest, report) = analyze_csv(&path, Utc::now())?;
    let out = default_manifest_path(&path);
    let payload = serde_json::json!({ "manifest": manifest, "report": report });
    fs::write(&out, serde_json::to_string_pretty(&payload)?)
        .with_context(|| format!("writing {}", out.display()))?;
    println!("wrote manifest {}", out.display());
    Ok(())
}

fn generate(rows: usize, seed: u64, out: &Path) -> Result<()> {
    let records = sample::generate(rows, seed);
    ensure_parent(out)?;
    let file = fs::File::create(out).with_context(|| format!("creating {}", out.display()))?;
    sample::write_csv(&records, file)?;
    info(
        Domain::System,
        "sample_written",
        obj(&[("path", v_str(&out.display().to_string())), ("rows", v_num(rows as f64))]),
    );
    println!("wrote {} rows to {}", rows, out.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = config_from(&cli.global);
    info(
        Domain::System,
        "startup",
        obj(&[
            ("data", v_str(&cfg.data_location)),
            ("theme", v_str(cfg.theme.as_str())),
            ("top_n", v_num(cfg.top_n as f64)),
        ]),
    );

    match cli.command {
        Command::Summary { json } => {
            let (source, parsed) = load(&cfg).await?;
            let summary = Summary::compute(&parsed.records, cfg.top_n);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary_report(&summary, &cfg.currency, &source));
            }
        }
        Command::Table {
            search,
            severity,
            sort,
            dir,
            offset,
            limit,
        } => {
            let (_, parsed) = load(&cfg).await?;
            let query = TableQuery {
                search,
                severity: severity
                    .filter(|s| !s.trim().eq_ignore_ascii_case("all"))
                    .map(|s| Severity::parse(&s)),
                sort: sort.map(|col| (col, dir)),
                offset,
                limit,
            };
            print!("{}", table_report(&query.apply(&parsed.records), &cfg.currency));
        }
        Command::Render { out } => {
            let out = out.unwrap_or_else(|| PathBuf::from(&cfg.out_path));
            render(&cfg, &out).await?;
        }
        Command::Serve {
            host,
            port,
            base_path,
        } => {
            if let Some(host) = host {
                cfg.host = host;
            }
            if let Some(port) = port {
                cfg.port = port;
            }
            if let Some(base) = base_path {
                cfg = cfg.with_base_path(&base);
            }
            server::serve(cfg).await?;
        }
        Command::Manifest => manifest(&cfg)?,
        Command::Generate { rows, seed, out } => generate(rows, seed, &out)?,
    }
    Ok(())
}
