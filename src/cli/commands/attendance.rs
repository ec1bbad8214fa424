use crate::cli::commands::person_ref;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::AttendanceLedger;
use crate::core::attendance::tally;
use crate::db::store::{AttendanceFilter, SqliteStore};
use crate::errors::AppResult;
use crate::models::DateRange;
use crate::ui::messages::info;
use crate::utils::formatting::present_label;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Attendance {
        range,
        class,
        person,
        teacher,
    } = cmd
    {
        let range = DateRange::parse(range)?;
        let filter = AttendanceFilter {
            class_id: class.clone(),
            person: person.as_deref().map(|p| person_ref(p, *teacher)),
        };

        let store = SqliteStore::new(&cfg.database);
        let records = AttendanceLedger::new(&store).list_by_date_range(&range, &filter)?;

        if records.is_empty() {
            info(format!("No attendance recorded in {}", range));
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::left("DATE"),
            Column::left("CLASS"),
            Column::left("PERIOD"),
            Column::left("PERSON"),
            Column::left("MARK"),
        ]);
        for r in &records {
            table.add_row(vec![
                r.key.date.to_string(),
                r.key.class_id.clone(),
                r.key.period.to_string(),
                r.key.person_ref().to_string(),
                present_label(r.present).to_string(),
            ]);
        }
        print!("{}", table.render());

        println!();
        for (person, (present, absent)) in tally(&records) {
            println!("{:<20} present {:>3}  absent {:>3}", person.to_string(), present, absent);
        }
    }

    Ok(())
}
