use crate::domain::model::CheckResult;

pub const EMPTY_STATE_MESSAGE: &str = "No results.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClass {
    Positive,
    Negative,
}

impl RowClass {
    pub fn css_class(self) -> &'static str {
        match self {
            RowClass::Positive => "ok",
            RowClass::Negative => "no",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow<'a> {
    pub index: usize,
    pub number: &'a str,
    pub status: &'a str,
    pub class: RowClass,
}

/// 結果表格，只是結果序列的投影，不持有資料
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable<'a> {
    rows: Vec<TableRow<'a>>,
}

pub fn present<'a>(results: &'a [CheckResult], active_label: &str) -> ResultTable<'a> {
    let rows = results
        .iter()
        .enumerate()
        .map(|(i, result)| TableRow {
            index: i + 1,
            number: result.number.as_str(),
            status: &result.status,
            class: if result.status == active_label {
                RowClass::Positive
            } else {
                RowClass::Negative
            },
        })
        .collect();

    ResultTable { rows }
}

impl<'a> ResultTable<'a> {
    pub fn rows(&self) -> &[TableRow<'a>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render_text(&self) -> String {
        if self.is_empty() {
            return EMPTY_STATE_MESSAGE.to_string();
        }

        let index_width = self.rows.len().to_string().len().max("No".len());
        let number_width = self
            .rows
            .iter()
            .map(|r| r.number.len())
            .max()
            .unwrap_or(0)
            .max("Number".len());

        let mut lines = Vec::with_capacity(self.rows.len() + 3);
        lines.push(format!("Results ({})", self.rows.len()));
        lines.push(format!(
            "{:>iw$}  {:<nw$}  Status",
            "No",
            "Number",
            iw = index_width,
            nw = number_width
        ));
        lines.push(format!(
            "{}  {}  {}",
            "-".repeat(index_width),
            "-".repeat(number_width),
            "-".repeat(6)
        ));

        for row in &self.rows {
            let marker = match row.class {
                RowClass::Positive => "✅",
                RowClass::Negative => "❌",
            };
            lines.push(format!(
                "{:>iw$}  {:<nw$}  {} {}",
                row.index,
                row.number,
                marker,
                row.status,
                iw = index_width,
                nw = number_width
            ));
        }

        lines.join("\n")
    }

    pub fn render_html(&self) -> String {
        if self.is_empty() {
            return format!("<p class=\"small muted\">{}</p>", EMPTY_STATE_MESSAGE);
        }

        let mut html = format!(
            "<h3>Results ({})</h3>\n<table><thead><tr><th>No</th><th>Number</th><th>Status</th></tr></thead><tbody>\n",
            self.rows.len()
        );
        for row in &self.rows {
            html.push_str(&format!(
                "<tr><td>{}</td><td><code>{}</code></td><td class=\"{}\">{}</td></tr>\n",
                row.index,
                escape_html(row.number),
                row.class.css_class(),
                escape_html(row.status)
            ));
        }
        html.push_str("</tbody></table>");
        html
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
