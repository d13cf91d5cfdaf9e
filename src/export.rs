use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::api::{ConfigDetail, EvaluationResult};
use crate::scores::title_case;
use crate::series::ScoreTable;

pub struct ExportReport {
    pub path: PathBuf,
    pub score_rows: usize,
    pub score_columns: usize,
    pub performance_rows: usize,
    pub runs: usize,
}

/// `alpha_config` at 2026-10-15 09:30 -> `alpha_config-20261015-093000.xlsx`.
pub fn export_file_name(config_name: &str, stamp: &str, extension: &str) -> String {
    let safe: String = config_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    let safe = if safe.is_empty() { "config".to_string() } else { safe };
    format!("{safe}-{stamp}.{extension}")
}

pub fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

/// Writes the visible score columns, the performance series and the runs.
/// Gaps in a score column stay blank cells.
pub fn export_workbook(
    path: &Path,
    detail: &ConfigDetail,
    visible: &ScoreTable,
) -> Result<ExportReport> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).context("create export dir")?;
        }
    }

    let mut workbook = Workbook::new();

    let scores = workbook.add_worksheet();
    scores.set_name("Scores").context("name scores sheet")?;
    write_scores(scores, visible)?;

    let performance = workbook.add_worksheet();
    performance
        .set_name("Performance")
        .context("name performance sheet")?;
    write_header(performance, &["Date", "Efficiency"])?;
    for (idx, point) in detail.performance_data.iter().enumerate() {
        let row = idx as u32 + 1;
        performance
            .write_string(row, 0, &point.date)
            .with_context(|| format!("write performance row {row}"))?;
        performance
            .write_number(row, 1, point.efficiency)
            .with_context(|| format!("write performance row {row}"))?;
    }

    let runs = workbook.add_worksheet();
    runs.set_name("Runs").context("name runs sheet")?;
    write_header(runs, &["Run ID", "Date", "Efficiency", "Evaluation"])?;
    for (idx, run) in detail.recent_runs.iter().enumerate() {
        let row = idx as u32 + 1;
        let evaluation = match run.evaluation_result {
            EvaluationResult::Good => "Good",
            EvaluationResult::Bad => "Bad",
        };
        runs.write_string(row, 0, &run.id)
            .and_then(|ws| ws.write_string(row, 1, &run.date))
            .and_then(|ws| ws.write_number(row, 2, run.efficiency))
            .and_then(|ws| ws.write_string(row, 3, evaluation))
            .with_context(|| format!("write run row {row}"))?;
    }

    workbook
        .save(path)
        .with_context(|| format!("save {}", path.display()))?;

    Ok(ExportReport {
        path: path.to_path_buf(),
        score_rows: visible.rows.len(),
        score_columns: visible.keys.len(),
        performance_rows: detail.performance_data.len(),
        runs: detail.recent_runs.len(),
    })
}

fn write_header(worksheet: &mut Worksheet, titles: &[&str]) -> Result<()> {
    for (col, title) in titles.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *title)
            .with_context(|| format!("write header column {col}"))?;
    }
    Ok(())
}

fn write_scores(worksheet: &mut Worksheet, table: &ScoreTable) -> Result<()> {
    let mut titles = vec!["X".to_string()];
    titles.extend(table.keys.iter().map(|k| title_case(k)));
    let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
    write_header(worksheet, &refs)?;

    for (idx, row) in table.rows.iter().enumerate() {
        let r = idx as u32 + 1;
        worksheet
            .write_number(r, 0, row.x)
            .with_context(|| format!("write score row {r}"))?;
        for (col, value) in row.values.iter().enumerate() {
            if let Some(v) = value {
                worksheet
                    .write_number(r, col as u16 + 1, *v)
                    .with_context(|| format!("write score cell ({r},{col})"))?;
            }
        }
    }
    Ok(())
}
