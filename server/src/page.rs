//! HTML for the chart form.
//!
//! The page is small enough to build with `format!`; the chart SVG from the
//! renderer is inlined as-is, everything else is escaped.

use movie_stats::{ChartColor, ChartRequest, MovieStats, SecondaryMetric};
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
form{display:flex;gap:1em;align-items:end;flex-wrap:wrap;margin-bottom:1em}\
label{display:flex;flex-direction:column;font-size:0.9em}\
.chart svg{max-width:100%;height:auto}\
.error{color:#b00020}";

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn option(out: &mut String, value: &str, label: &str, selected: bool) {
    let _ = write!(
        out,
        "<option value=\"{}\"{}>{}</option>",
        escape_html(value),
        if selected { " selected" } else { "" },
        escape_html(label)
    );
}

/// The selection form, preselecting `request`'s values.
///
/// `language_name` is the display name of the selected language, if known.
fn render_form(stats: &MovieStats, request: &ChartRequest, language_name: Option<&str>) -> String {
    let mut html = String::from("<form method=\"post\" action=\"/\">");

    html.push_str("<label>Language<select name=\"language\">");
    for name in stats.catalog().sorted_names() {
        option(&mut html, name, name, Some(name) == language_name);
    }
    html.push_str("</select></label>");

    html.push_str("<label>Compare with<select name=\"secondary\">");
    for metric in SecondaryMetric::ALL {
        option(&mut html, metric.key(), metric.label(), metric == request.metric);
    }
    html.push_str("</select></label>");

    for (field, title, current) in [
        ("color1", "Budget color", request.primary_color),
        ("color2", "Second color", request.secondary_color),
    ] {
        let _ = write!(html, "<label>{}<select name=\"{}\">", title, field);
        for color in ChartColor::ALL {
            option(&mut html, color.name(), color.name(), color == current);
        }
        html.push_str("</select></label>");
    }

    html.push_str("<button type=\"submit\">Plot</button></form>");
    html
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{}</title><style>{}</style></head><body>{}</body></html>",
        escape_html(title),
        STYLE,
        body
    )
}

/// Full page: heading with the language name, form, inline chart.
pub fn render_page(
    stats: &MovieStats,
    request: &ChartRequest,
    language_name: &str,
    svg: &str,
) -> String {
    let body = format!(
        "<h1>{} Movies</h1>{}<div class=\"chart\">{}</div>",
        escape_html(language_name),
        render_form(stats, request, Some(language_name)),
        svg
    );
    document(&format!("{} Movies", language_name), &body)
}

/// Page for a rejected or failed request; keeps the form usable.
pub fn render_error_page(stats: &MovieStats, request: &ChartRequest, message: &str) -> String {
    let language_name = stats
        .catalog()
        .resolve(&request.language)
        .ok()
        .and_then(|code| stats.catalog().name(code));

    let body = format!(
        "<h1>Movie Statistics</h1><p class=\"error\">{}</p>{}",
        escape_html(message),
        render_form(stats, request, language_name)
    );
    document("Movie Statistics", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape_html("Modern Greek (1453-)"), "Modern Greek (1453-)");
    }

    #[test]
    fn test_option_marks_selection() {
        let mut html = String::new();
        option(&mut html, "crew", "Average # of Crew Members", true);
        option(&mut html, "cast", "Average # of Cast Members", false);
        assert_eq!(
            html,
            "<option value=\"crew\" selected>Average # of Crew Members</option>\
             <option value=\"cast\">Average # of Cast Members</option>"
        );
    }
}
