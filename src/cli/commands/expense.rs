use crate::cli::parser::{Commands, ExpenseAction, ExpenseArgs};
use crate::config::Config;
use crate::core::ExpenseClassifier;
use crate::db::store::{SqliteStore, Store};
use crate::errors::{AppError, AppResult};
use crate::models::Expense;
use crate::ui::messages::{info, success};
use crate::utils::date::check_month;
use crate::utils::money;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Expense { action } = cmd else {
        return Ok(());
    };
    let store = SqliteStore::new(&cfg.database);
    let classifier = ExpenseClassifier::new(&cfg.salary_marker)?;

    match action {
        ExpenseAction::Add(ExpenseArgs {
            reason,
            amount,
            month,
            year,
        }) => {
            if reason.trim().is_empty() {
                return Err(AppError::Validation("reason must not be empty".into()));
            }
            if *amount <= 0 {
                return Err(AppError::InvalidAmount(amount.to_string()));
            }
            check_month(*year, *month)?;

            let id = store.insert_expense(reason.trim(), *amount, *month, *year)?;
            store.log(
                "expense",
                &format!("{}-{:02}", year, month),
                &format!("#{} {} {}", id, amount, reason.trim()),
            )?;

            let category = classifier.classify(&Expense {
                id,
                reason: reason.trim().to_string(),
                amount: *amount,
                month: *month,
                year: *year,
            });
            success(format!(
                "Expense #{} recorded: {} VND for {}-{:02} ({})",
                id,
                money(*amount),
                year,
                month,
                category.label()
            ));
        }

        ExpenseAction::List { year } => {
            let expenses = store.expenses(*year)?;
            if expenses.is_empty() {
                info("No expenses found.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::right("#"),
                Column::left("MONTH"),
                Column::right("AMOUNT"),
                Column::left("CATEGORY"),
                Column::left("REASON"),
            ]);
            for e in &expenses {
                table.add_row(vec![
                    e.id.to_string(),
                    format!("{}-{:02}", e.year, e.month),
                    money(e.amount),
                    classifier.classify(e).label().to_string(),
                    e.reason.clone(),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
