//! Self-contained HTML dashboard.
//!
//! Aggregates and charts are rendered here; the table is rendered too but
//! also embedded as JSON so the page can search, filter and sort it
//! without a round trip.

use std::fmt::Write as FmtWrite;

use serde::Serialize;

use super::charts::{self, Slice};
use super::description as text;
use super::{escape_html, money};
use crate::analysis::{GroupStat, Summary};
use crate::config::Theme;
use crate::model::{DefectRecord, Severity};
use crate::table::{Column, SortKeys};

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub currency: String,
    /// Where the data came from, shown in the footer.
    pub source: String,
    pub generated_at: String,
}

#[derive(Serialize)]
struct TablePayload<'a> {
    currency: &'a str,
    columns: Vec<(&'static str, &'static str)>,
    rows: &'a [DefectRecord],
    /// Parallel to `rows`.
    keys: Vec<SortKeys>,
}

/// JSON inside `<script>` must not be able to close the tag.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\!--")
}

/// Substitute `__NAME__` placeholders in one pass; inserted values are
/// never rescanned.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;
    while let Some(start) = rest.find("__") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("__") else { break };
        let name = &after[..end];
        match vars.iter().find(|(k, _)| *k == name) {
            Some((_, value)) => {
                out.push_str(&rest[..start]);
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[..start + 2]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn card(svg_class: &str, label: &str, value: &str) -> String {
    format!(
        r#"<div class="card accent-{}"><div class="card-label">{}</div><div class="card-val">{}</div></div>"#,
        svg_class,
        escape_html(label),
        escape_html(value)
    )
}

fn summary_cards(summary: &Summary, currency: &str) -> String {
    let mut html = String::from(r#"<div class="grid">"#);
    html.push_str(&card("blue", "Total Defects", &summary.total_defects.to_string()));
    html.push_str(&card("green", "Average Cost", &money(currency, summary.cost.average)));
    html.push_str(&card("yellow", "Total Cost", &money(currency, summary.cost.total)));
    html.push_str(&card("red", "Critical Defects", &summary.severity.critical.to_string()));
    html.push_str("</div>");
    html
}

fn severity_slices(summary: &Summary) -> Vec<Slice<'static>> {
    Severity::known()
        .into_iter()
        .map(|s| Slice {
            label: match s {
                Severity::Critical => "Critical",
                Severity::Moderate => "Moderate",
                _ => "Minor",
            },
            value: summary.severity.count(&s) as f64,
            color: s.color(),
        })
        .collect()
}

fn paper(title: &str, caption: &str, body: &str) -> String {
    format!(
        r#"<div class="paper"><h3>{}</h3><p class="caption">{}</p>{}</div>"#,
        escape_html(title),
        escape_html(caption),
        body
    )
}

fn daily_points(summary: &Summary) -> Vec<(&str, f64)> {
    summary
        .daily
        .iter()
        .map(|p| (p.date.as_str(), p.count as f64))
        .collect()
}

fn charts_section(summary: &Summary) -> String {
    let bars: Vec<(&str, f64)> = summary
        .by_type
        .iter()
        .map(|g| (g.key.as_str(), g.count as f64))
        .collect();
    let mut html = String::from(r#"<div class="stack">"#);
    html.push_str(&paper(
        "Severity Breakdown",
        text::SEVERITY_CAPTION,
        &charts::donut(&severity_slices(summary), 320, 220),
    ));
    html.push_str(&paper(
        "Top Defect Types",
        text::TYPES_CAPTION,
        &charts::bar_chart(&bars, 400, 220, "#1976d2"),
    ));
    html.push_str(&paper(
        "Defects Over Time",
        text::TIMELINE_CAPTION,
        &charts::line_chart(&daily_points(summary), 500, 220, "#388e3c"),
    ));
    html.push_str("</div>");
    html
}

fn group_table(title: &str, groups: &[GroupStat], currency: &str) -> String {
    let mut html = format!(
        r#"<div class="paper"><h3>{}</h3><div class="table-wrap"><table><thead><tr><th>Group</th><th class="num">Count</th><th class="num">Share</th><th class="num">Total Cost</th><th class="num">Avg Cost</th></tr></thead><tbody>"#,
        escape_html(title)
    );
    for g in groups {
        let _ = write!(
            html,
            r#"<tr><td>{}</td><td class="num">{}</td><td class="num">{:.1}%</td><td class="num">{}</td><td class="num">{}</td></tr>"#,
            escape_html(&g.key),
            g.count,
            g.percent,
            money(currency, g.total_cost),
            money(currency, g.avg_cost)
        );
    }
    html.push_str("</tbody></table></div></div>");
    html
}

fn findings(summary: &Summary) -> String {
    let mut parts = vec![format!(
        "{:.1}% of recorded defects are critical.",
        summary.critical_share()
    )];
    if let Some(g) = summary.most_common_type() {
        parts.push(format!("{} is the most common defect type ({} records).", g.key, g.count));
    }
    if let Some(g) = summary.most_common_location() {
        parts.push(format!("Most defects are found in the {} area.", g.key.to_lowercase()));
    }
    if let Some((first, last)) = summary.date_range() {
        parts.push(format!("Records span {} to {}.", first, last));
    }
    format!(r#"<p class="findings">{}</p>"#, escape_html(&parts.join(" ")))
}

fn analysis_section(summary: &Summary, currency: &str) -> String {
    let mut html = format!(
        r#"<h2>Data Analysis</h2><p class="caption">{}</p>"#,
        escape_html(text::ANALYSIS_INTRO)
    );
    html.push_str(&summary_cards(summary, currency));
    html.push_str(&findings(summary));

    let mut chips = String::from(r#"<div class="chips">"#);
    for s in Severity::known() {
        let _ = write!(
            chips,
            r#"<span class="chip {}">{}: {}</span>"#,
            s.badge(),
            s.label(),
            summary.severity.count(&s)
        );
    }
    chips.push_str("</div>");

    let mut top = String::from(r#"<ul class="toplist">"#);
    for g in summary.top_types() {
        let _ = write!(
            top,
            r#"<li><span class="cap">{}</span><span class="chip primary">{}</span></li>"#,
            escape_html(&g.key),
            g.count
        );
    }
    top.push_str("</ul>");

    html.push_str(r#"<div class="row3">"#);
    html.push_str(&paper(
        "Severity Breakdown",
        text::SEVERITY_CAPTION,
        &format!("{}{}", charts::donut(&severity_slices(summary), 260, 200), chips),
    ));
    html.push_str(&paper("Top Defect Types", text::TYPES_CAPTION, &top));
    html.push_str(&paper(
        "Defects Over Time",
        text::TIMELINE_CAPTION,
        &charts::line_chart(&daily_points(summary), 260, 200, "#388e3c"),
    ));
    html.push_str("</div>");

    let mut cost = String::from(
        r#"<div class="paper"><h3>Cost Statistics</h3><div class="table-wrap"><table><tbody>"#,
    );
    let opt = |v: Option<f64>| v.map(|x| money(currency, x)).unwrap_or_else(|| "-".to_string());
    for (label, value) in [
        ("Median cost", opt(summary.cost.median)),
        ("Minimum cost", opt(summary.cost.min)),
        ("Maximum cost", opt(summary.cost.max)),
        ("Records with a cost", summary.cost.priced.to_string()),
    ] {
        let _ = write!(
            cost,
            r#"<tr><td>{}</td><td class="num">{}</td></tr>"#,
            label,
            escape_html(&value)
        );
    }
    cost.push_str("</tbody></table></div></div>");

    let mut sev = String::from(
        r#"<div class="paper"><h3>Cost by Severity</h3><div class="table-wrap"><table><thead><tr><th>Severity</th><th class="num">Count</th><th class="num">Share</th><th class="num">Total Cost</th><th class="num">Avg Cost</th></tr></thead><tbody>"#,
    );
    for s in &summary.severity_breakdown {
        let _ = write!(
            sev,
            r#"<tr><td><span class="dot" style="background:{}"></span>{}</td><td class="num">{}</td><td class="num">{:.1}%</td><td class="num">{}</td><td class="num">{}</td></tr>"#,
            s.color,
            escape_html(&s.severity),
            s.count,
            s.percent,
            money(currency, s.total_cost),
            money(currency, s.avg_cost)
        );
    }
    sev.push_str("</tbody></table></div></div>");

    let months: Vec<(&str, f64)> = summary
        .monthly
        .iter()
        .map(|p| (p.date.as_str(), p.count as f64))
        .collect();

    html.push_str(r#"<div class="row2">"#);
    html.push_str(&cost);
    html.push_str(&sev);
    html.push_str(&group_table("By Location", &summary.by_location, currency));
    html.push_str(&group_table("By Inspection Method", &summary.by_inspection, currency));
    html.push_str(&group_table("By Repair Action", &summary.by_repair_action, currency));
    html.push_str(&paper(
        "Defects per Month",
        "Monthly totals over parsed dates.",
        &charts::bar_chart(&months, 400, 220, "#7b1fa2"),
    ));
    html.push_str("</div>");
    html
}

fn table_section(records: &[DefectRecord], currency: &str) -> String {
    let mut html = String::from(
        r#"<div class="paper"><h3>Raw Data Table</h3><div class="controls"><input id="search" type="search" placeholder="Search all columns"><select id="severity"><option value="">All severities</option><option value="critical">Critical</option><option value="moderate">Moderate</option><option value="minor">Minor</option></select><span id="row-count" class="caption"></span></div><div class="table-wrap tall"><table id="defects"><thead><tr>"#,
    );
    for col in Column::ALL {
        let _ = write!(
            html,
            r#"<th data-field="{}">{}</th>"#,
            col.field(),
            col.label()
        );
    }
    html.push_str("</tr></thead><tbody>");
    for rec in records {
        html.push_str("<tr>");
        for col in Column::ALL {
            let value = col.value(rec);
            match col {
                Column::Severity => {
                    let _ = write!(
                        html,
                        r#"<td><span class="chip {}">{}</span></td>"#,
                        rec.severity().badge(),
                        escape_html(value)
                    );
                }
                Column::Description => {
                    let _ = write!(
                        html,
                        r#"<td><span class="ellipsis" title="{v}">{v}</span></td>"#,
                        v = escape_html(value)
                    );
                }
                Column::RepairCost => {
                    let _ = write!(html, "<td>{}{}</td>", escape_html(currency), escape_html(value));
                }
                _ => {
                    let _ = write!(html, "<td>{}</td>", escape_html(value));
                }
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div></div>");
    html
}

fn description_section() -> String {
    let mut cols = String::from(r#"<ul class="glossary">"#);
    for (name, desc) in text::COLUMNS {
        let _ = write!(
            cols,
            r#"<li><span class="chip primary">{}</span> {}</li>"#,
            name,
            escape_html(desc)
        );
    }
    cols.push_str("</ul>");

    let mut uses = String::from("<ul>");
    for (title, desc) in text::POTENTIAL_USES {
        let _ = write!(uses, "<li><strong>{}:</strong> {}</li>", title, escape_html(desc));
    }
    uses.push_str("</ul>");

    format!(
        r#"<div class="paper"><h2>Dataset Description</h2><div class="row2"><div><h3>About This Dataset</h3><p>{}</p><h3>Data Columns</h3>{}</div><div><h3>Potential Uses</h3>{}<h3>Data Quality Notes</h3><p>{}</p></div></div></div>"#,
        escape_html(text::ABOUT),
        cols,
        uses,
        escape_html(text::DATA_QUALITY_NOTES)
    )
}

fn footer(opts: &RenderOptions) -> String {
    format!(
        "Source {} &middot; generated {}",
        escape_html(&opts.source),
        escape_html(&opts.generated_at)
    )
}

pub fn render_dashboard(records: &[DefectRecord], summary: &Summary, opts: &RenderOptions) -> String {
    let payload = TablePayload {
        currency: &opts.currency,
        columns: Column::ALL.iter().map(|c| (c.field(), c.label())).collect(),
        rows: records,
        keys: records.iter().map(SortKeys::of).collect(),
    };
    let json_blob = serde_json::to_string(&payload).unwrap_or_else(|_| "null".to_string());

    let overview = format!(
        "<h2>Dashboard Overview</h2>{}{}",
        summary_cards(summary, &opts.currency),
        charts_section(summary)
    );

    fill(
        TEMPLATE,
        &[
            ("STYLE", STYLE),
            ("THEME", opts.theme.as_str()),
            ("TITLE", text::TITLE),
            ("SUBTITLE", text::SUBTITLE),
            ("OVERVIEW", &overview),
            ("CHARTS", &charts_section(summary)),
            ("TABLE", &table_section(records, &opts.currency)),
            ("ANALYSIS", &analysis_section(summary, &opts.currency)),
            ("DESCRIPTION", &description_section()),
            ("FOOTER", &footer(opts)),
            ("DASHBOARD_DATA", &script_safe(&json_blob)),
        ],
    )
}

fn message_page(heading: &str, message: &str, opts: &RenderOptions) -> String {
    let body = format!(
        r#"<div class="paper error"><h2>{}</h2><p>{}</p></div>"#,
        escape_html(heading),
        escape_html(message)
    );
    fill(
        MESSAGE_TEMPLATE,
        &[
            ("STYLE", STYLE),
            ("THEME", opts.theme.as_str()),
            ("TITLE", text::TITLE),
            ("BODY", &body),
            ("FOOTER", &footer(opts)),
        ],
    )
}

pub fn render_error_page(message: &str, opts: &RenderOptions) -> String {
    message_page("Error Loading Data", message, opts)
}

pub fn render_no_data_page(opts: &RenderOptions) -> String {
    message_page(
        "No Data Available",
        "No valid data was found. Please check your data file.",
        opts,
    )
}

const STYLE: &str = r#"
    :root {
      --bg: #f5f7fa; --bg-raised: #ffffff; --fg: #1f2933; --fg-muted: #616e7c;
      --accent: #1976d2; --green: #388e3c; --yellow: #f9a825; --red: #d32f2f;
      --border: #e4e7eb; --radius: 8px; --shadow: 0 1px 3px rgba(0,0,0,0.12);
      --sans: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
      --mono: 'JetBrains Mono', 'SF Mono', monospace;
    }
    [data-theme="dark"] {
      --bg: #0d1117; --bg-raised: #161b22; --fg: #c9d1d9; --fg-muted: #8b949e;
      --accent: #58a6ff; --border: #30363d; --shadow: 0 1px 3px rgba(0,0,0,0.4);
    }
    *, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
    body { font-family: var(--sans); background: var(--bg); color: var(--fg); line-height: 1.5; }
    header { padding: 1.5rem; background: var(--accent); color: #fff; }
    header h1 { font-size: 1.5rem; }
    nav { display: flex; gap: 0.25rem; padding: 0.5rem 1.5rem; border-bottom: 1px solid var(--border); background: var(--bg-raised); flex-wrap: wrap; }
    .nav-button { border: none; background: none; color: var(--fg-muted); padding: 0.4rem 0.8rem; border-radius: 4px; cursor: pointer; font-size: 0.85rem; }
    .nav-button.active { color: var(--accent); background: rgba(25,118,210,0.1); font-weight: 600; }
    main { max-width: 1280px; margin: 0 auto; padding: 1.5rem; }
    h2 { margin-bottom: 1rem; font-size: 1.2rem; }
    h3 { margin: 0.5rem 0; font-size: 0.95rem; }
    .tab { display: none; }
    .tab.active { display: block; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 0.75rem; margin-bottom: 1.5rem; }
    .card { background: var(--bg-raised); border: 1px solid var(--border); border-top: 3px solid var(--border); border-radius: var(--radius); padding: 0.9rem; box-shadow: var(--shadow); }
    .card.accent-blue { border-top-color: var(--accent); }
    .card.accent-green { border-top-color: var(--green); }
    .card.accent-yellow { border-top-color: var(--yellow); }
    .card.accent-red { border-top-color: var(--red); }
    .card-label { font-size: 0.75rem; color: var(--fg-muted); text-transform: uppercase; letter-spacing: 0.04em; }
    .card-val { font-size: 1.6rem; font-weight: 700; font-family: var(--mono); }
    .paper { background: var(--bg-raised); border: 1px solid var(--border); border-radius: var(--radius); padding: 1.25rem; box-shadow: var(--shadow); margin-bottom: 1rem; }
    .paper.error h2 { color: var(--red); }
    .caption { color: var(--fg-muted); font-size: 0.85rem; margin-bottom: 0.75rem; }
    .stack > .paper { margin-bottom: 1.5rem; }
    .row2 { display: grid; grid-template-columns: repeat(auto-fit, minmax(420px, 1fr)); gap: 1rem; }
    .row3 { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 1rem; }
    .chart { width: 100%; max-width: 640px; height: auto; color: var(--fg); }
    .chips { display: flex; gap: 0.4rem; justify-content: center; margin-top: 0.75rem; flex-wrap: wrap; }
    .chip { display: inline-block; padding: 0.1rem 0.55rem; border-radius: 999px; font-size: 0.75rem; background: var(--border); }
    .chip.error { background: var(--red); color: #fff; }
    .chip.warning { background: var(--yellow); color: #000; }
    .chip.success { background: var(--green); color: #fff; }
    .chip.primary { background: var(--accent); color: #fff; }
    .toplist { list-style: none; }
    .toplist li { display: flex; justify-content: space-between; padding: 0.3rem 0; border-bottom: 1px solid var(--border); }
    .cap { text-transform: capitalize; }
    .glossary { list-style: none; }
    .glossary li { margin-bottom: 0.35rem; font-size: 0.85rem; }
    .dot { display: inline-block; width: 8px; height: 8px; border-radius: 50%; margin-right: 0.4rem; }
    .controls { display: flex; gap: 0.5rem; align-items: center; margin-bottom: 0.75rem; flex-wrap: wrap; }
    .controls input, .controls select { padding: 0.35rem 0.5rem; border: 1px solid var(--border); border-radius: 4px; background: var(--bg); color: var(--fg); }
    .table-wrap { overflow-x: auto; border: 1px solid var(--border); border-radius: var(--radius); }
    .table-wrap.tall { max-height: 600px; overflow-y: auto; }
    table { width: 100%; border-collapse: collapse; font-size: 0.8rem; }
    th { position: sticky; top: 0; background: var(--bg-raised); text-align: left; padding: 0.5rem 0.7rem; font-weight: 700; border-bottom: 1px solid var(--border); cursor: pointer; white-space: nowrap; }
    th.sorted-asc::after { content: " \25B2"; }
    th.sorted-desc::after { content: " \25BC"; }
    td { padding: 0.45rem 0.7rem; border-bottom: 1px solid var(--border); }
    tbody tr:hover { background: rgba(30,136,229,0.08); }
    .num { text-align: right; font-family: var(--mono); }
    .ellipsis { display: block; max-width: 200px; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }
    ul { padding-left: 1.2rem; }
    footer { text-align: center; color: var(--fg-muted); font-size: 0.75rem; padding: 1.5rem; }
"#;

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en" data-theme="__THEME__">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>__TITLE__</title>
  <style>__STYLE__</style>
</head>
<body>
  <header><h1>__TITLE__</h1><p>__SUBTITLE__</p></header>
  <nav>
    <button class="nav-button active" data-tab="overview">Overview</button>
    <button class="nav-button" data-tab="charts">Charts &amp; Visualizations</button>
    <button class="nav-button" data-tab="table">Raw Data Table</button>
    <button class="nav-button" data-tab="analysis">Detailed Analysis</button>
    <button class="nav-button" data-tab="description">Dataset Description</button>
  </nav>
  <main>
    <section class="tab active" id="tab-overview">__OVERVIEW__</section>
    <section class="tab" id="tab-charts">__CHARTS__</section>
    <section class="tab" id="tab-table">__TABLE__</section>
    <section class="tab" id="tab-analysis">__ANALYSIS__</section>
    <section class="tab" id="tab-description">__DESCRIPTION__</section>
  </main>
  <footer>__FOOTER__</footer>
  <script id="dashboard-data" type="application/json">__DASHBOARD_DATA__</script>
  <script>
  (() => {
    document.querySelectorAll('.nav-button').forEach(btn => {
      btn.addEventListener('click', () => {
        document.querySelectorAll('.nav-button').forEach(b => b.classList.toggle('active', b === btn));
        document.querySelectorAll('.tab').forEach(t => t.classList.toggle('active', t.id === 'tab-' + btn.dataset.tab));
      });
    });

    const D = JSON.parse(document.getElementById('dashboard-data').textContent);
    if (!D || !D.rows) return;
    const table = document.getElementById('defects');
    const tbody = table.querySelector('tbody');
    const search = document.getElementById('search');
    const sevSel = document.getElementById('severity');
    const count = document.getElementById('row-count');
    let sortField = null, sortDir = 1;

    const esc = s => String(s).replace(/[&<>"']/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'}[c]));
    const badge = s => ({critical: 'error', moderate: 'warning', minor: 'success'}[String(s).trim().toLowerCase()] || 'default');
    D.rows.forEach((r, i) => { r.sortKeys = D.keys[i] || {}; });
    const text = (x, y) => (x < y ? -1 : x > y ? 1 : 0);
    const cmp = (a, b) => {
      const ka = a.sortKeys, kb = b.sortKeys;
      if (sortField === 'repair_cost') {
        const x = ka.cost ?? null, y = kb.cost ?? null;
        if (x === null && y === null) return 0;
        if (x === null) return 1;
        if (y === null) return -1;
        return x - y;
      }
      if (sortField === 'defect_date') {
        const x = ka.date ?? null, y = kb.date ?? null;
        if (x !== y) {
          if (x === null) return -1;
          if (y === null) return 1;
          return text(x, y);
        }
        return text(a.defect_date, b.defect_date);
      }
      if (sortField === 'defect_id' || sortField === 'product_id') {
        const k = sortField === 'defect_id' ? 'id' : 'product';
        const x = ka[k] ?? null, y = kb[k] ?? null;
        if (x !== null && y !== null) return x - y;
        return text(String(a[sortField]), String(b[sortField]));
      }
      return text(String(a[sortField]).toLowerCase(), String(b[sortField]).toLowerCase());
    };

    function render() {
      const q = search.value.trim().toLowerCase();
      const sev = sevSel.value;
      let rows = D.rows.filter(r =>
        (!q || D.columns.some(([f]) => String(r[f]).toLowerCase().includes(q))) &&
        (!sev || String(r.severity).trim().toLowerCase() === sev));
      if (sortField) {
        rows = rows.slice().sort((a, b) => cmp(a, b) * sortDir);
      }
      tbody.innerHTML = rows.map(r => '<tr>' + D.columns.map(([f]) => {
        if (f === 'severity') return `<td><span class="chip ${badge(r[f])}">${esc(r[f])}</span></td>`;
        if (f === 'defect_description') return `<td><span class="ellipsis" title="${esc(r[f])}">${esc(r[f])}</span></td>`;
        if (f === 'repair_cost') return `<td>${esc(D.currency)}${esc(r[f])}</td>`;
        return `<td>${esc(r[f])}</td>`;
      }).join('') + '</tr>').join('');
      count.textContent = `${rows.length} of ${D.rows.length} rows`;
    }

    table.querySelectorAll('th').forEach(th => {
      th.addEventListener('click', () => {
        const f = th.dataset.field;
        sortDir = sortField === f ? -sortDir : 1;
        sortField = f;
        table.querySelectorAll('th').forEach(h => h.classList.remove('sorted-asc', 'sorted-desc'));
        th.classList.add(sortDir > 0 ? 'sorted-asc' : 'sorted-desc');
        render();
      });
    });
    search.addEventListener('input', render);
    sevSel.addEventListener('change', render);
    count.textContent = `${D.rows.length} of ${D.rows.length} rows`;
  })();
  </script>
</body>
</html>"##;

const MESSAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en" data-theme="__THEME__">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>__TITLE__</title>
  <style>__STYLE__</style>
</head>
<body>
  <header><h1>__TITLE__</h1></header>
  <main>__BODY__</main>
  <footer>__FOOTER__</footer>
</body>
</html>"##;
