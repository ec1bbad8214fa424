// src/export/logic.rs

use crate::core::finance::MonthlySeries;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::xlsx::export_xlsx;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Write a monthly series to `file`.
    ///
    /// `file` must be an absolute path; an existing file is only replaced
    /// with `force` or after confirmation.
    pub fn export_series(
        series: &MonthlySeries,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(series, path)?,
            ExportFormat::Json => export_json(series, path)?,
            ExportFormat::Xlsx => export_xlsx(series, path)?,
        }

        Ok(())
    }
}
