use crate::cli::commands::print_warnings;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::audit::run_audit;
use crate::db::store::SqliteStore;
use crate::errors::AppResult;
use crate::models::DateRange;
use crate::ui::messages::success;
use crate::utils::date::{parse_date, today};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Audit { date, range } = cmd else {
        return Ok(());
    };

    let as_of = match date {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let range = range.as_deref().map(DateRange::parse).transpose()?;

    let store = SqliteStore::new(&cfg.database);
    let warnings = run_audit(&store, as_of, range.as_ref())?;

    if warnings.is_empty() {
        success(format!("No data-quality findings as of {}", as_of));
    } else {
        println!("🔎 {} finding(s) as of {}:\n", warnings.len(), as_of);
        print_warnings(&warnings);
    }

    Ok(())
}
