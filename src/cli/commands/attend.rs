use crate::cli::commands::{person_ref, print_warnings};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::AttendanceLedger;
use crate::db::store::SqliteStore;
use crate::errors::AppResult;
use crate::models::TimePeriod;
use crate::ui::messages::success;
use crate::utils::date::parse_date;
use crate::utils::formatting::present_label;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Attend {
        class,
        date,
        period,
        person,
        teacher,
        absent,
    } = cmd
    {
        // key shape first: nothing reaches the store if it is malformed
        let date = parse_date(date)?;
        let period = TimePeriod::parse(period)?;
        let who = person_ref(person, *teacher);

        let store = SqliteStore::new(&cfg.database);
        let ledger = AttendanceLedger::new(&store);
        let recorded = ledger.upsert_attendance(class, date, period, &who, !*absent)?;

        success(format!(
            "{} {} {}: {} {}",
            recorded.record.key.class_id,
            recorded.record.key.date,
            recorded.record.key.period,
            who,
            present_label(recorded.record.present)
        ));
        print_warnings(&recorded.warnings);
    }

    Ok(())
}
