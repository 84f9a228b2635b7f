//! Output rendering
//!
//! Tables, name lists and dataset summaries as plain text, CSV or JSON.

use crate::config::OutputFormat;
use anyhow::Result;
use smspec_reader::{DatasetSummary, Table};

const INDEX_HEADER: &str = "DATE";

/// Render a table with its index (if any) as the first column
pub fn render_table(table: &Table, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(table)?);
    }

    let mut header: Vec<String> = Vec::new();
    if table.index().is_some() {
        header.push(INDEX_HEADER.to_string());
    }
    header.extend(table.column_names().map(str::to_string));

    let rows: Vec<Vec<String>> = (0..table.num_rows())
        .map(|row| {
            let mut cells = Vec::with_capacity(header.len());
            if let Some(index) = table.index() {
                cells.push(index[row].to_string());
            }
            for column in table.columns() {
                cells.push(column.data().format_value(row).unwrap_or_default());
            }
            cells
        })
        .collect();

    match format {
        OutputFormat::Csv => render_csv(&header, &rows),
        _ => Ok(render_txt(&header, &rows)),
    }
}

/// Render a list of names (wells, keywords, dates, ...)
pub fn render_list(title: &str, items: &[String], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(items)?,
        OutputFormat::Csv => {
            let rows: Vec<Vec<String>> = items.iter().map(|item| vec![item.clone()]).collect();
            render_csv(&[title.to_string()], &rows)?
        }
        OutputFormat::Txt => {
            let mut out = format!("{} ({}):\n", title, items.len());
            for item in items {
                out.push_str("  ");
                out.push_str(item);
                out.push('\n');
            }
            out
        }
    })
}

/// Render the dataset overview shown when nothing else is requested
pub fn render_summary(summary: &DatasetSummary, format: OutputFormat) -> Result<String> {
    let path = summary.path.display().to_string();
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(summary)?,
        OutputFormat::Csv => {
            let header = ["path", "vectors", "timesteps", "companion_files", "keywords"]
                .map(str::to_string);
            let row = vec![
                path,
                summary.vectors.to_string(),
                summary.timesteps.to_string(),
                summary.companion_files.to_string(),
                summary.keywords.to_string(),
            ];
            render_csv(&header, &[row])?
        }
        OutputFormat::Txt => format!(
            "File:            {}\nVectors:         {}\nTimesteps:       {}\nData files:      {}\nKeywords:        {}\n",
            path, summary.vectors, summary.timesteps, summary.companion_files, summary.keywords
        ),
    })
}

fn render_txt(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut out = line(header);
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.as_slice()));
        out.push('\n');
    }
    out
}

fn render_csv(header: &[String], rows: &[Vec<String>]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    String::from_utf8(wtr.into_inner()?)
        .map_err(|e| anyhow::anyhow!("Failed to convert CSV to string: {}", e))
}
