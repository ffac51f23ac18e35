//! Inline SVG charts. Output is a standalone `<svg>` element sized by
//! `viewBox`, so it scales with its container.

use std::f64::consts::PI;
use std::fmt::Write as FmtWrite;

use super::escape_html;

pub const INNER_RADIUS: f64 = 40.0;
pub const OUTER_RADIUS: f64 = 80.0;
pub const PADDING_DEG: f64 = 4.0;

const AXIS: &str = "#9e9e9e";
const PAD: f64 = 36.0;

pub struct Slice<'a> {
    pub label: &'a str,
    pub value: f64,
    pub color: &'a str,
}

pub fn no_data(width: u32, height: u32) -> String {
    format!(
        r##"<svg class="chart" viewBox="0 0 {w} {h}" role="img"><text x="{x}" y="{y}" text-anchor="middle" fill="{AXIS}" font-size="13">No data available for charts.</text></svg>"##,
        w = width,
        h = height,
        x = width / 2,
        y = height / 2,
    )
}

/// Point on a circle; 0 degrees is twelve o'clock, increasing clockwise.
fn polar(cx: f64, cy: f64, r: f64, deg: f64) -> (f64, f64) {
    let rad = (deg - 90.0) * PI / 180.0;
    (cx + r * rad.cos(), cy + r * rad.sin())
}

fn arc_path(cx: f64, cy: f64, start: f64, end: f64) -> String {
    let (ox0, oy0) = polar(cx, cy, OUTER_RADIUS, start);
    let (ox1, oy1) = polar(cx, cy, OUTER_RADIUS, end);
    let (ix1, iy1) = polar(cx, cy, INNER_RADIUS, end);
    let (ix0, iy0) = polar(cx, cy, INNER_RADIUS, start);
    let large = if end - start > 180.0 { 1 } else { 0 };
    format!(
        "M{:.2},{:.2} A{r},{r} 0 {large} 1 {:.2},{:.2} L{:.2},{:.2} A{ir},{ir} 0 {large} 0 {:.2},{:.2} Z",
        ox0,
        oy0,
        ox1,
        oy1,
        ix1,
        iy1,
        ix0,
        iy0,
        r = OUTER_RADIUS,
        ir = INNER_RADIUS,
        large = large,
    )
}

/// Donut chart with a gap between slices and a legend on the right.
pub fn donut(slices: &[Slice], width: u32, height: u32) -> String {
    let total: f64 = slices.iter().map(|s| s.value.max(0.0)).sum();
    if total <= 0.0 {
        return no_data(width, height);
    }
    let cx = OUTER_RADIUS + 10.0;
    let cy = height as f64 / 2.0;
    let visible: Vec<&Slice> = slices.iter().filter(|s| s.value > 0.0).collect();

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg class="chart donut" viewBox="0 0 {} {}" role="img">"#,
        width, height
    );

    if visible.len() == 1 {
        let s = visible[0];
        let _ = write!(
            svg,
            r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="none" stroke="{c}" stroke-width="{sw:.2}"><title>{l}: {v}</title></circle>"#,
            cx = cx,
            cy = cy,
            r = (OUTER_RADIUS + INNER_RADIUS) / 2.0,
            c = s.color,
            sw = OUTER_RADIUS - INNER_RADIUS,
            l = escape_html(s.label),
            v = s.value,
        );
    } else {
        let mut angle = 0.0;
        for s in &visible {
            let sweep = s.value / total * 360.0;
            let start = angle + PADDING_DEG / 2.0;
            let end = (angle + sweep - PADDING_DEG / 2.0).max(start + 0.5);
            let _ = write!(
                svg,
                r#"<path d="{}" fill="{}"><title>{}: {}</title></path>"#,
                arc_path(cx, cy, start, end),
                s.color,
                escape_html(s.label),
                s.value
            );
            angle += sweep;
        }
    }

    let legend_x = cx + OUTER_RADIUS + 20.0;
    for (i, s) in slices.iter().enumerate() {
        let y = 24.0 + i as f64 * 22.0;
        let _ = write!(
            svg,
            r#"<rect x="{x:.1}" y="{y:.1}" width="12" height="12" rx="2" fill="{c}"/><text x="{tx:.1}" y="{ty:.1}" font-size="12" fill="currentColor">{l} ({v})</text>"#,
            x = legend_x,
            y = y,
            c = s.color,
            tx = legend_x + 18.0,
            ty = y + 10.0,
            l = escape_html(s.label),
            v = s.value,
        );
    }
    svg.push_str("</svg>");
    svg
}

fn nice_max(max: f64) -> f64 {
    if max <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(max.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|v| *v >= max)
        .unwrap_or(10.0 * magnitude);
    step
}

fn axes(svg: &mut String, width: f64, height: f64, y_max: f64) {
    let _ = write!(
        svg,
        r#"<line x1="{p}" y1="{b}" x2="{r}" y2="{b}" stroke="{a}"/><line x1="{p}" y1="{t}" x2="{p}" y2="{b}" stroke="{a}"/>"#,
        p = PAD,
        t = PAD / 2.0,
        b = height - PAD,
        r = width - PAD / 2.0,
        a = AXIS,
    );
    for tick in 0..=4 {
        let v = y_max * tick as f64 / 4.0;
        let y = height - PAD - (height - PAD * 1.5) * tick as f64 / 4.0;
        let _ = write!(
            svg,
            r#"<text x="{x:.1}" y="{y:.1}" font-size="10" text-anchor="end" fill="{a}">{v}</text>"#,
            x = PAD - 4.0,
            y = y + 3.0,
            a = AXIS,
            v = if y_max >= 4.0 { format!("{:.0}", v) } else { format!("{:.1}", v) },
        );
    }
}

/// Vertical bars on a band scale, one per label, in the given order.
pub fn bar_chart(bars: &[(&str, f64)], width: u32, height: u32, color: &str) -> String {
    if bars.is_empty() {
        return no_data(width, height);
    }
    let (w, h) = (width as f64, height as f64);
    let y_max = nice_max(bars.iter().map(|b| b.1).fold(0.0, f64::max));
    let plot_w = w - PAD * 1.5;
    let plot_h = h - PAD * 1.5;
    let band = plot_w / bars.len() as f64;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg class="chart bar" viewBox="0 0 {} {}" role="img">"#,
        width, height
    );
    axes(&mut svg, w, h, y_max);
    for (i, (label, value)) in bars.iter().enumerate() {
        let bh = plot_h * value.max(0.0) / y_max;
        let x = PAD + band * i as f64 + band * 0.1;
        let y = h - PAD - bh;
        let _ = write!(
            svg,
            r#"<rect x="{x:.2}" y="{y:.2}" width="{bw:.2}" height="{bh:.2}" fill="{c}"><title>{l}: {v}</title></rect><text x="{lx:.2}" y="{ly:.2}" font-size="10" text-anchor="middle" fill="currentColor">{l}</text>"#,
            x = x,
            y = y,
            bw = band * 0.8,
            bh = bh,
            c = color,
            l = escape_html(label),
            v = value,
            lx = x + band * 0.4,
            ly = h - PAD + 14.0,
        );
    }
    svg.push_str("</svg>");
    svg
}

/// Polyline over a point scale with markers and thinned x labels.
pub fn line_chart(points: &[(&str, f64)], width: u32, height: u32, color: &str) -> String {
    if points.is_empty() {
        return no_data(width, height);
    }
    let (w, h) = (width as f64, height as f64);
    let y_max = nice_max(points.iter().map(|p| p.1).fold(0.0, f64::max));
    let plot_w = w - PAD * 1.5;
    let plot_h = h - PAD * 1.5;
    let step = if points.len() > 1 {
        plot_w / (points.len() - 1) as f64
    } else {
        0.0
    };
    let x_of = |i: usize| {
        if points.len() == 1 {
            PAD + plot_w / 2.0
        } else {
            PAD + step * i as f64
        }
    };
    let y_of = |v: f64| h - PAD - plot_h * v.max(0.0) / y_max;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg class="chart line" viewBox="0 0 {} {}" role="img">"#,
        width, height
    );
    axes(&mut svg, w, h, y_max);

    let coords: Vec<String> = points
        .iter()
        .enumerate()
        .map(|(i, (_, v))| format!("{:.2},{:.2}", x_of(i), y_of(*v)))
        .collect();
    let _ = write!(
        svg,
        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
        coords.join(" "),
        color
    );

    let label_every = (points.len() / 8).max(1);
    for (i, (label, value)) in points.iter().enumerate() {
        let _ = write!(
            svg,
            r#"<circle cx="{:.2}" cy="{:.2}" r="2.5" fill="{}"><title>{}: {}</title></circle>"#,
            x_of(i),
            y_of(*value),
            color,
            escape_html(label),
            value
        );
        if i % label_every == 0 {
            let _ = write!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" font-size="9" text-anchor="middle" fill="currentColor">{}</text>"#,
                x_of(i),
                h - PAD + 14.0,
                escape_html(label)
            );
        }
    }
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slices<'a>(values: [f64; 3]) -> Vec<Slice<'a>> {
        vec![
            Slice { label: "Critical", value: values[0], color: "#d32f2f" },
            Slice { label: "Moderate", value: values[1], color: "#fbc02d" },
            Slice { label: "Minor", value: values[2], color: "#388e3c" },
        ]
    }

    #[test]
    fn donut_draws_one_path_per_nonzero_slice() {
        let svg = donut(&slices([3.0, 0.0, 5.0]), 320, 220);
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("Moderate (0)"));
    }

    #[test]
    fn donut_single_slice_is_a_ring() {
        let svg = donut(&slices([0.0, 4.0, 0.0]), 320, 220);
        assert!(svg.contains("<circle"));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn empty_charts_show_placeholder() {
        assert!(donut(&slices([0.0, 0.0, 0.0]), 320, 220).contains("No data"));
        assert!(bar_chart(&[], 400, 220, "#1976d2").contains("No data"));
        assert!(line_chart(&[], 500, 220, "#388e3c").contains("No data"));
    }

    #[test]
    fn bar_labels_are_escaped() {
        let svg = bar_chart(&[("<script>", 2.0), ("Cosmetic", 1.0)], 400, 220, "#1976d2");
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;"));
    }

    #[test]
    fn line_has_marker_per_point() {
        let pts = [("2024-01-01", 1.0), ("2024-01-02", 3.0), ("2024-01-03", 2.0)];
        let svg = line_chart(&pts, 500, 220, "#388e3c");
        assert!(svg.contains("<polyline"));
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn nice_max_rounds_up() {
        assert_eq!(nice_max(0.0), 1.0);
        assert_eq!(nice_max(7.0), 10.0);
        assert_eq!(nice_max(42.0), 50.0);
        assert_eq!(nice_max(180.0), 200.0);
    }
}
