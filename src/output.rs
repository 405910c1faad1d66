// src/output.rs
use std::io::{self, Write};

use repo_lines_core::{AccountSnapshot, Completeness, LanguageMap, Served};
use serde_json::{Value, json};

use crate::args::OutputFormat;

pub fn emit_languages(out: &mut impl Write, format: OutputFormat, labels: &[&str]) -> io::Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", json!(labels)),
        OutputFormat::Table => labels.iter().try_for_each(|label| writeln!(out, "{label}")),
    }
}

pub fn emit_account(
    out: &mut impl Write,
    format: OutputFormat,
    served: &Served<std::sync::Arc<AccountSnapshot>>,
) -> io::Result<()> {
    let snapshot = &*served.value;
    match format {
        OutputFormat::Json => {
            let document = envelope(json!(snapshot), served);
            writeln!(out, "{}", serde_json::to_string_pretty(&document).map_err(io::Error::other)?)
        }
        OutputFormat::Table => {
            writeln!(
                out,
                "{}: {} repositories ({} processed), {} languages",
                snapshot.account_id, snapshot.total_repos, snapshot.processed_repos, snapshot.total_languages
            )?;
            let rows = snapshot.languages.iter().map(|(label, stats)| Row {
                label,
                lines: stats.stats.lines,
                code: stats.stats.code,
                comments: stats.stats.comments,
                blank: stats.stats.blank,
                files: stats.stats.files,
                repos: Some(stats.repos),
            });
            write_table(out, rows.collect())?;
            write_footer(out, served)
        }
    }
}

pub fn emit_repository(
    out: &mut impl Write,
    format: OutputFormat,
    full_name: &str,
    served: &Served<std::sync::Arc<LanguageMap>>,
) -> io::Result<()> {
    let languages = &*served.value;
    match format {
        OutputFormat::Json => {
            let document = envelope(json!({ "repository": full_name, "languages": languages }), served);
            writeln!(out, "{}", serde_json::to_string_pretty(&document).map_err(io::Error::other)?)
        }
        OutputFormat::Table => {
            writeln!(out, "{full_name}: {} languages, {} files", languages.len(), languages.total_files())?;
            let rows = languages.iter().map(|(label, stats)| Row {
                label,
                lines: stats.lines,
                code: stats.code,
                comments: stats.comments,
                blank: stats.blank,
                files: stats.files,
                repos: None,
            });
            write_table(out, rows.collect())?;
            write_footer(out, served)
        }
    }
}

fn envelope<T>(data: Value, served: &Served<T>) -> Value {
    json!({
        "data": data,
        "cached": served.cached,
        "cacheAge": served.cache_age.map(|age| age.as_secs()),
        "completeness": served.completeness,
        "skipped": served.diagnostics,
    })
}

struct Row<'a> {
    label: &'a str,
    lines: u64,
    code: u64,
    comments: u64,
    blank: u64,
    files: u64,
    repos: Option<u64>,
}

/// Rows sorted by line count, largest first, then a TOTAL row.
fn write_table(out: &mut impl Write, mut rows: Vec<Row<'_>>) -> io::Result<()> {
    rows.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.label.cmp(b.label)));
    let with_repos = rows.iter().any(|row| row.repos.is_some());
    let width = rows.iter().map(|row| row.label.len()).max().unwrap_or(0).max("TOTAL".len());

    write!(
        out,
        "{:<width$} {:>10} {:>10} {:>10} {:>10} {:>8}",
        "LANGUAGE", "LINES", "CODE", "COMMENTS", "BLANK", "FILES"
    )?;
    if with_repos {
        write!(out, " {:>6}", "REPOS")?;
    }
    writeln!(out)?;

    let mut total = (0, 0, 0, 0, 0);
    for row in &rows {
        write!(
            out,
            "{:<width$} {:>10} {:>10} {:>10} {:>10} {:>8}",
            row.label, row.lines, row.code, row.comments, row.blank, row.files
        )?;
        if let Some(repos) = row.repos {
            write!(out, " {repos:>6}")?;
        }
        writeln!(out)?;
        total.0 += row.lines;
        total.1 += row.code;
        total.2 += row.comments;
        total.3 += row.blank;
        total.4 += row.files;
    }
    writeln!(out, "{:<width$} {:>10} {:>10} {:>10} {:>10} {:>8}", "TOTAL", total.0, total.1, total.2, total.3, total.4)
}

fn write_footer<T>(out: &mut impl Write, served: &Served<T>) -> io::Result<()> {
    if let Completeness::Partial { interruption } = served.completeness {
        writeln!(out, "partial result: {interruption:?}")?;
    }
    if !served.diagnostics.is_empty() {
        writeln!(out, "skipped: {} item(s)", served.diagnostics.total())?;
    }
    if let Some(age) = served.cache_age {
        writeln!(out, "cached {}s ago", age.as_secs())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use repo_lines_core::SkipDiagnostics;
    use repo_lines_domain::accumulate;

    use super::*;

    fn served(languages: LanguageMap) -> Served<Arc<LanguageMap>> {
        Served {
            value: Arc::new(languages),
            cached: false,
            cache_age: None,
            completeness: Completeness::Complete,
            diagnostics: SkipDiagnostics::new(),
        }
    }

    fn sample() -> LanguageMap {
        let mut map = LanguageMap::new();
        map.record_file("Rust", accumulate("fn a() {}\n// x\n"), 16);
        map.record_file("Python", accumulate("x = 1"), 5);
        map
    }

    #[test]
    fn table_lists_largest_language_first_with_total() {
        let mut out = Vec::new();
        emit_repository(&mut out, OutputFormat::Table, "octo/demo", &served(sample())).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("octo/demo: 2 languages"));
        assert!(lines[1].starts_with("LANGUAGE"));
        assert!(lines[2].starts_with("Rust"));
        assert!(lines[3].starts_with("Python"));
        assert!(lines[4].starts_with("TOTAL"));
        assert!(lines[4].contains(" 4 "));
    }

    #[test]
    fn json_wraps_data_with_serving_metadata() {
        let mut out = Vec::new();
        emit_repository(&mut out, OutputFormat::Json, "octo/demo", &served(sample())).unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["cached"], false);
        assert_eq!(value["completeness"]["status"], "complete");
        assert_eq!(value["data"]["languages"]["Rust"]["lines"], 3);
        assert_eq!(value["data"]["repository"], "octo/demo");
    }
}
