use crate::cli::commands::print_warnings;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{ExpenseClassifier, FeeEngine, FinancialAggregator, Snapshot};
use crate::db::store::{SqliteStore, Store};
use crate::errors::AppResult;
use crate::export::{ExportFormat, ExportLogic};
use crate::ui::messages::header;
use crate::utils::colors::{RESET, color_for_amount};
use crate::utils::money;
use crate::utils::path::expand_home_str;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Report {
        year,
        format,
        file,
        force,
    } = cmd
    else {
        return Ok(());
    };

    let store = SqliteStore::new(&cfg.database);
    let classifier = ExpenseClassifier::new(&cfg.salary_marker)?;

    let snapshot = Snapshot::load(&store)?;
    let expenses = store.expenses(Some(*year))?;

    let engine = FeeEngine::new(
        &snapshot.fees,
        &snapshot.classes,
        &snapshot.registry,
        cfg.proration,
    );
    let series = FinancialAggregator::new(&engine, &expenses, &classifier).build_monthly_series(*year)?;

    header(format!("Finance {}", year));

    let mut table = Table::new(vec![
        Column::left("MONTH"),
        Column::right("REVENUE"),
        Column::right("SALARY"),
        Column::right("OTHER"),
        Column::right("EXPENSES"),
        Column::right("PROFIT"),
    ]);
    let totals = series.totals()?;
    for m in series.months.iter().chain(std::iter::once(&totals)) {
        let label = if m.month == 0 {
            "Total".to_string()
        } else {
            format!("{}-{:02}", year, m.month)
        };
        table.add_row(vec![
            label,
            money(m.revenue),
            money(m.salary_expenses),
            money(m.other_expenses),
            money(m.expenses),
            money(m.profit),
        ]);
    }
    print!("{}", table.render());

    println!(
        "\nProfit {}: {}{} VND{}",
        year,
        color_for_amount(totals.profit),
        money(totals.profit),
        RESET
    );

    let mut warnings = snapshot.fee_warnings.clone();
    warnings.extend(series.warnings.iter().cloned());
    crate::core::audit::report(&warnings);
    print_warnings(&warnings);

    if let Some(file) = file {
        let format = format.unwrap_or(ExportFormat::Csv);
        ExportLogic::export_series(&series, format, &expand_home_str(file), *force)?;
    }

    Ok(())
}
