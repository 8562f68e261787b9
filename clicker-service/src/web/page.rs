use shared::{Mode, ScoreEntry, VisitCount};

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

pub fn render_index(visits: VisitCount, boards: &[(Mode, Vec<ScoreEntry>)]) -> String {
    INDEX_TEMPLATE
        .replace("{{VISIT_DIGITS}}", &render_digits(visits))
        .replace("{{LEADERBOARDS}}", &render_boards(boards))
}

fn render_digits(visits: VisitCount) -> String {
    visits
        .digits()
        .into_iter()
        .map(|d| format!(r#"<div class="digit">{}</div>"#, d))
        .collect()
}

fn render_boards(boards: &[(Mode, Vec<ScoreEntry>)]) -> String {
    let mut html = String::new();

    for (mode, entries) in boards {
        html.push_str(&format!(
            r#"<div class="mode-scores"><h3>{} Mode</h3><ul>"#,
            escape_html(&mode.label())
        ));
        for entry in entries {
            html.push_str(&format!(
                "<li>{}: {}</li>",
                escape_html(&entry.username),
                entry.score
            ));
        }
        html.push_str("</ul></div>");
    }

    html
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
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
