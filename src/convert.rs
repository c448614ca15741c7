// 🔄 Spreadsheet Converter
// Results workbook (every sheet) or CSV sheet exports → data.json
//
// Headers are matched loosely ("Année", "annee ", "ANNEE" are the same
// column). Rows without a year or a candidate are dropped. Finals rows are
// detected here accent-insensitively and rewritten to the finals label.

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::classify::{first_integer, fold_text};
use crate::entry::{Entry, LevelValue};
use crate::places::{is_finals_place, FINALS_LABEL};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvertReport {
    pub rows_read: usize,
    pub kept: usize,
    pub dropped: usize,
    pub finals: usize,
}

impl ConvertReport {
    fn absorb(&mut self, other: &ConvertReport) {
        self.rows_read += other.rows_read;
        self.kept += other.kept;
        self.dropped += other.dropped;
        self.finals += other.finals;
    }
}

#[derive(Serialize)]
struct SnapshotFile<'a> {
    entries: &'a [Entry],
}

// ============================================================================
// CELL HELPERS
// ============================================================================

/// Column key: no accents, lowercase, no whitespace ("Année " → "annee")
pub fn normalize_header(name: &str) -> String {
    fold_text(name.trim_start_matches('\u{feff}'))
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Integer cell, spreadsheet style: "2024", "2024.0" and " 3 " all parse
pub fn parse_int(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    if let Ok(n) = cell.parse::<i64>() {
        return Some(n);
    }
    cell.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}

fn text_cell(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// First integer in the cell, otherwise the text itself
fn level_cell(cell: Option<&str>) -> Option<LevelValue> {
    let text = text_cell(cell)?;
    Some(match first_integer(&text) {
        Some(n) => LevelValue::Int(n),
        None => LevelValue::Text(text),
    })
}

/// Finals spelling, ignoring accents as well as case and padding
pub fn is_finals_cell(cell: &str) -> bool {
    is_finals_place(&fold_text(cell))
}

/// Pick `;` for French Excel exports, `,` otherwise
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}

// ============================================================================
// CONVERSION
// ============================================================================

/// Map one sheet's rows to entries
///
/// `headers` are raw header cells; every row is matched to them by
/// position, and short rows simply lack the trailing columns.
pub fn convert_sheet<H, R>(headers: &[H], rows: &[R], source: &str) -> (Vec<Entry>, ConvertReport)
where
    H: AsRef<str>,
    R: AsRef<[String]>,
{
    let headers: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();
    debug!(source, ?headers, "columns");

    let mut report = ConvertReport::default();
    let mut entries = Vec::new();

    for record in rows {
        report.rows_read += 1;

        let row: HashMap<&str, &str> = headers
            .iter()
            .map(String::as_str)
            .zip(record.as_ref().iter().map(String::as_str))
            .collect();

        match row_entry(&row) {
            Some(entry) => {
                if entry.final_flag {
                    report.finals += 1;
                }
                entries.push(entry);
            }
            None => report.dropped += 1,
        }
    }

    report.kept = entries.len();
    info!(
        source,
        rows = report.rows_read,
        kept = report.kept,
        dropped = report.dropped,
        "sheet converted"
    );

    (entries, report)
}

/// One entry per row; rows without a year or a candidate give nothing
fn row_entry(row: &HashMap<&str, &str>) -> Option<Entry> {
    let cell = |key: &str| row.get(key).copied();

    let mut place = text_cell(cell("ville"));
    let final_flag = place.as_deref().map(is_finals_cell).unwrap_or(false);
    if final_flag {
        place = Some(FINALS_LABEL.to_string());
    }

    let entry = Entry {
        year: cell("annee").and_then(parse_int).filter(|y| *y != 0),
        place,
        candidate_name: text_cell(cell("candidat")),
        level: level_cell(cell("niveau")),
        distinction_text: text_cell(cell("distinction")),
        teacher_name: text_cell(cell("professeur")),
        rank: cell("rang").and_then(parse_int),
        final_flag,
        original_index: 0,
    };

    if entry.year.is_none() || entry.candidate_name.is_none() {
        return None;
    }
    Some(entry)
}

/// Convert one CSV export
pub fn convert_str(text: &str, source: &str) -> Result<(Vec<Entry>, ConvertReport)> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(text))
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("Failed to read CSV headers: {}", source))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read CSV row {} of {}", line + 2, source))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(convert_sheet(&headers, &rows, source))
}

/// Spreadsheet cell as text, the way a CSV export would write it
fn sheet_cell(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        _ => String::new(),
    }
}

/// Convert every sheet of a workbook (.xlsx, .xlsm, .xls, .ods), in
/// workbook order; the first row of each sheet holds its headers
pub fn convert_workbook<P: AsRef<Path>>(path: P) -> Result<(Vec<Entry>, ConvertReport)> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {:?}", path))?;

    let names: Vec<String> = workbook.sheet_names().to_vec();
    if names.is_empty() {
        anyhow::bail!("No sheet found in workbook: {:?}", path);
    }

    let mut all = Vec::new();
    let mut report = ConvertReport::default();

    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .with_context(|| format!("Failed to read sheet {:?} of {:?}", name, path))?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header) => header.iter().map(sheet_cell).collect(),
            None => {
                warn!(file = %path.display(), sheet = %name, "empty sheet skipped");
                continue;
            }
        };
        let body: Vec<Vec<String>> = rows
            .map(|row| row.iter().map(sheet_cell).collect())
            .collect();

        let source = format!("{}#{}", path.display(), name);
        let (entries, sheet) = convert_sheet(&headers, &body, &source);
        all.extend(entries);
        report.absorb(&sheet);
    }

    Ok((all, report))
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_lowercase().as_str(), "xlsx" | "xlsm" | "xls" | "ods"))
        .unwrap_or(false)
}

/// Convert every input and concatenate, in argument order
///
/// Workbooks contribute all of their sheets; any other file is read as a
/// CSV export of a single sheet.
pub fn convert_files<P: AsRef<Path>>(paths: &[P]) -> Result<(Vec<Entry>, ConvertReport)> {
    let mut all = Vec::new();
    let mut report = ConvertReport::default();

    for path in paths {
        let path = path.as_ref();

        let (entries, sheet) = if is_workbook(path) {
            convert_workbook(path)?
        } else {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read CSV file: {:?}", path))?;
            convert_str(&text, &path.display().to_string())?
        };

        if entries.is_empty() {
            warn!(file = %path.display(), "input produced no entries");
        }

        all.extend(entries);
        report.absorb(&sheet);
    }

    Ok((all, report))
}

/// Serialize entries as the `{ "entries": [...] }` data file
pub fn to_snapshot_json(entries: &[Entry]) -> Result<String> {
    serde_json::to_string_pretty(&SnapshotFile { entries }).context("Failed to serialize entries")
}

pub fn write_snapshot<P: AsRef<Path>>(path: P, entries: &[Entry]) -> Result<()> {
    let path = path.as_ref();
    let json = to_snapshot_json(entries)?;
    fs::write(path, json).with_context(|| format!("Failed to write data file: {:?}", path))?;

    info!(file = %path.display(), entries = entries.len(), "data file written");
    Ok(())
}
