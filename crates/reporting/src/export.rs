// In crates/reporting/src/export.rs

use crate::{Result, to_f64};
use chrono::NaiveDate;
use core_types::{ErrorRecord, RunReport, TickerRecord};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

/// Writes a run report as a three-sheet xlsx workbook.
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    output_dir: PathBuf,
    file_prefix: String,
    include_run_stamp: bool,
    window: usize,
}

impl XlsxExporter {
    pub fn new(output_dir: PathBuf, file_prefix: String, include_run_stamp: bool, window: usize) -> Self {
        Self {
            output_dir,
            file_prefix,
            include_run_stamp,
            window,
        }
    }

    /// `<output_dir>/<file_prefix>_<YYYY-MM-DD>.xlsx`
    pub fn file_path(&self, date: NaiveDate) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.xlsx", self.file_prefix, date.format("%Y-%m-%d")))
    }

    pub fn below_sheet_name(&self) -> String {
        format!("Below_SMA{}", self.window)
    }

    pub fn record_header(&self) -> Vec<String> {
        vec![
            "Ticker".to_string(),
            "Latest Close".to_string(),
            format!("SMA{}", self.window),
            "Status".to_string(),
        ]
    }

    /// Data rows for a record sheet, in report order.
    pub fn record_rows(&self, report: &RunReport, records: &[Rc<TickerRecord>]) -> Vec<Vec<Cell>> {
        let mut rows = self.stamp_row(report);
        rows.extend(records.iter().map(|r| {
            vec![
                Cell::Text(r.ticker.to_string()),
                Cell::Number(to_f64(r.latest_close)),
                r.latest_sma.map_or(Cell::Blank, |v| Cell::Number(to_f64(v))),
                Cell::Text(r.status.to_string()),
            ]
        }));
        rows
    }

    /// Data rows for the error sheet, in report order.
    pub fn error_rows(&self, report: &RunReport, errors: &[ErrorRecord]) -> Vec<Vec<Cell>> {
        let mut rows = self.stamp_row(report);
        rows.extend(
            errors
                .iter()
                .map(|e| vec![Cell::Text(e.ticker.to_string()), Cell::Text(e.error.clone())]),
        );
        rows
    }

    fn stamp_row(&self, report: &RunReport) -> Vec<Vec<Cell>> {
        if self.include_run_stamp {
            vec![vec![Cell::Text(format!("Scan run at {}", report.run_stamp()))]]
        } else {
            Vec::new()
        }
    }

    /// Writes the workbook named after the run date and returns its path.
    pub fn export(&self, report: &RunReport) -> Result<PathBuf> {
        let path = self.file_path(report.run_at.date_naive());
        self.export_to(report, &path)?;
        Ok(path)
    }

    pub fn export_to(&self, report: &RunReport, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let record_header = self.record_header();
        let error_header = vec!["Ticker".to_string(), "Error".to_string()];

        write_sheet(
            workbook.add_worksheet(),
            "Summary",
            &record_header,
            &self.record_rows(report, &report.summary),
            &header_format,
        )?;
        write_sheet(
            workbook.add_worksheet(),
            &self.below_sheet_name(),
            &record_header,
            &self.record_rows(report, &report.below_threshold),
            &header_format,
        )?;
        write_sheet(
            workbook.add_worksheet(),
            "Missing_Data",
            &error_header,
            &self.error_rows(report, &report.errors),
            &header_format,
        )?;

        workbook.save(path)?;
        tracing::info!(path = %path.display(), "Exported run report.");
        Ok(())
    }
}

fn write_sheet(
    sheet: &mut Worksheet,
    name: &str,
    header: &[String],
    rows: &[Vec<Cell>],
    header_format: &Format,
) -> Result<()> {
    sheet.set_name(name)?;
    for (col, title) in header.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, title, header_format)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let row_num = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(text) => {
                    sheet.write_string(row_num, col as u16, text)?;
                }
                Cell::Number(value) => {
                    sheet.write_number(row_num, col as u16, *value)?;
                }
                Cell::Blank => {}
            }
        }
    }
    Ok(())
}
