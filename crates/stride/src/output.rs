//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one id per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Status accent: green for the "good" state, yellow otherwise.
pub fn status_accent(label: &str, good: bool, color: bool) -> String {
    if !color {
        return label.to_owned();
    }
    if good {
        label.green().to_string()
    } else {
        label.yellow().to_string()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one id per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Pagination footer for table output, e.g. `page 1/4 · 73 total`.
pub fn page_footer(page: u32, size: u32, total: u64) -> String {
    let pages = if size == 0 {
        1
    } else {
        total.div_ceil(u64::from(size)).max(1)
    };
    format!("page {}/{pages} · {total} total", u64::from(page) + 1)
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let result = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    result.unwrap_or_else(|e| format!("<serialization error: {e}>"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("<serialization error: {e}>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        id: i64,
        login: String,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Login")]
        login: String,
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                id: 1,
                login: "ada".into(),
            },
            Item {
                id: 2,
                login: "grace".into(),
            },
        ]
    }

    #[test]
    fn plain_emits_one_id_per_line() {
        let out = render_list(
            &OutputFormat::Plain,
            &items(),
            |i| ItemRow {
                id: i.id,
                login: i.login.clone(),
            },
            |i| i.id.to_string(),
        );
        assert_eq!(out, "1\n2");
    }

    #[test]
    fn json_compact_is_single_line() {
        let out = render_list(
            &OutputFormat::JsonCompact,
            &items(),
            |i| ItemRow {
                id: i.id,
                login: i.login.clone(),
            },
            |i| i.id.to_string(),
        );
        assert!(!out.contains('\n'));
        assert!(out.contains("\"login\":\"ada\""));
    }

    #[test]
    fn table_rendering_snapshot() {
        let out = render_list(
            &OutputFormat::Table,
            &items(),
            |i| ItemRow {
                id: i.id,
                login: i.login.clone(),
            },
            |i| i.id.to_string(),
        );
        insta::assert_snapshot!(out, @r"
        ╭────┬───────╮
        │ ID │ Login │
        ├────┼───────┤
        │ 1  │ ada   │
        │ 2  │ grace │
        ╰────┴───────╯
        ");
    }

    #[test]
    fn page_footer_rounds_pages_up() {
        assert_eq!(page_footer(0, 20, 73), "page 1/4 · 73 total");
        assert_eq!(page_footer(3, 20, 73), "page 4/4 · 73 total");
        assert_eq!(page_footer(0, 20, 0), "page 1/1 · 0 total");
    }
}
