//! Views over a loaded dataset: SVG charts, the HTML dashboard, the terminal
//! report and the fixed descriptive text.

pub mod charts;
pub mod description;
pub mod html;
pub mod text;

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Two decimals, no grouping.
pub fn money(currency: &str, value: f64) -> String {
    format!("{}{:.2}", currency, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"x" & 'y'</b>"#),
            "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(money("£", 1234.5), "£1234.50");
        assert_eq!(money("$", 0.0), "$0.00");
    }
}
