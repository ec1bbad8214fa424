// src/export/xlsx.rs

use crate::core::finance::MonthlySeries;
use crate::errors::{AppError, AppResult};
use crate::export::{HEADERS, notify_export_success};
use crate::models::MonthlyFinance;
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const MONEY_FORMAT: &str = "#,##0";

/// Styled XLSX with banded rows, a totals row and auto column widths.
pub(crate) fn export_xlsx(series: &MonthlySeries, path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(format!("Finance {}", series.year))
        .map_err(to_export_error)?;

    // ---------------------------
    // Header
    // ---------------------------
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &header_format)
            .map_err(to_export_error)?;
    }

    worksheet.set_freeze_panes(1, 0).ok();

    let mut col_widths: Vec<usize> = HEADERS.iter().map(|h| UnicodeWidthStr::width(*h)).collect();

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    // ---------------------------
    // Rows
    // ---------------------------
    for (row_index, m) in series.months.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band = if row_index % 2 == 0 { band1 } else { band2 };
        let label = format!("{}-{:02}", series.year, m.month);

        write_row(worksheet, row, &label, m, band, false, &mut col_widths)?;
    }

    // ---------------------------
    // Totals
    // ---------------------------
    let total_row = (series.months.len() + 1) as u32;
    let totals = series.totals()?;
    write_row(
        worksheet,
        total_row,
        "Total",
        &totals,
        Color::RGB(0xD9E1F2),
        true,
        &mut col_widths,
    )?;

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_export_error)?;
    }

    workbook.save(path).map_err(to_export_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

fn write_row(
    worksheet: &mut Worksheet,
    row: u32,
    label: &str,
    m: &MonthlyFinance,
    bg: Color,
    bold: bool,
    col_widths: &mut [usize],
) -> AppResult<()> {
    let mut text_fmt = Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);
    let mut num_fmt = Format::new()
        .set_num_format(MONEY_FORMAT)
        .set_align(FormatAlign::Right)
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);
    if bold {
        text_fmt = text_fmt.set_bold();
        num_fmt = num_fmt.set_bold();
    }

    worksheet
        .write_with_format(row, 0, label, &text_fmt)
        .map_err(to_export_error)?;
    col_widths[0] = col_widths[0].max(UnicodeWidthStr::width(label));

    let values = [
        m.revenue,
        m.expenses,
        m.salary_expenses,
        m.other_expenses,
        m.profit,
    ];

    for (i, v) in values.iter().enumerate() {
        let col = i + 1;
        worksheet
            .write_with_format(row, col as u16, *v as f64, &num_fmt)
            .map_err(to_export_error)?;
        // thousands separators widen the rendered value
        let rendered = crate::utils::formatting::money(*v);
        col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(rendered.as_str()));
    }

    Ok(())
}

fn to_export_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
