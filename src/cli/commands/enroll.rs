use crate::cli::commands::person_ref;
use crate::cli::parser::{Commands, EnrollAction};
use crate::config::Config;
use crate::core::EnrollmentRegistry;
use crate::db::store::{EnrollmentFilter, SqliteStore, Store};
use crate::errors::AppResult;
use crate::models::{EnrollmentStatus, PersonRef, PersonType};
use crate::ui::messages::{info, success, warning};
use crate::utils::date::{parse_date, today};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Enroll { action } = cmd else {
        return Ok(());
    };
    let store = SqliteStore::new(&cfg.database);

    match action {
        EnrollAction::Add {
            person,
            class,
            teacher,
            status,
            start,
            end,
        } => {
            // validate everything before touching the store
            let status = EnrollmentStatus::parse(status)?;
            let start = parse_date(start)?;
            let end = end.as_deref().map(parse_date).transpose()?;
            let who = person_ref(person, *teacher);

            let e = EnrollmentRegistry::enroll(&store, &who, class, status, start, end)?;
            success(format!(
                "Enrollment #{} created: {} in {} ({}, {} → {})",
                e.id,
                who,
                e.class_id,
                e.status,
                e.start_date,
                e.end_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "open".to_string())
            ));
        }

        EnrollAction::Status { id, status, end } => {
            let next = EnrollmentStatus::parse(status)?;
            let end = end.as_deref().map(parse_date).transpose()?;

            let e = EnrollmentRegistry::transition(&store, *id, next, end, today())?;
            success(format!(
                "Enrollment #{} is now {}{}",
                e.id,
                e.status,
                e.end_date
                    .map(|d| format!(" (ends {d})"))
                    .unwrap_or_default()
            ));
        }

        EnrollAction::List { class } => {
            let filter = match class {
                Some(c) => EnrollmentFilter::class(c),
                None => EnrollmentFilter::default(),
            };
            let rows = store.enrollments(&filter)?;
            if rows.is_empty() {
                info("No enrollments found.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::right("#"),
                Column::left("PERSON"),
                Column::left("CLASS"),
                Column::left("STATUS"),
                Column::left("START"),
                Column::left("END"),
            ]);
            for e in rows {
                table.add_row(vec![
                    e.id.to_string(),
                    e.person_ref().to_string(),
                    e.class_id.clone(),
                    e.status.to_string(),
                    e.start_date.to_string(),
                    e.end_date.map(|d| d.to_string()).unwrap_or_else(|| "--".into()),
                ]);
            }
            print!("{}", table.render());
        }

        EnrollAction::Check {
            person,
            class,
            date,
            teacher,
        } => {
            let date = parse_date(date)?;
            let who = person_ref(person, *teacher);

            let registry = EnrollmentRegistry::load_pair(&store, &who, class)?;
            if registry.is_eligible(&who, class, date) {
                success(format!("{} is eligible for {} on {}", who, class, date));
            } else {
                warning(format!("{} is NOT eligible for {} on {}", who, class, date));
            }
        }

        EnrollAction::Unenrolled { date } => {
            let as_of = match date {
                Some(d) => parse_date(d)?,
                None => today(),
            };

            let mut all: Vec<PersonRef> = Vec::new();
            for kind in [PersonType::Student, PersonType::Teacher] {
                all.extend(store.persons(kind)?.iter().map(|p| p.person_ref()));
            }

            let registry = EnrollmentRegistry::load(&store)?;
            let unenrolled = registry.find_unenrolled(&all, as_of);

            if unenrolled.is_empty() {
                success(format!("Everyone is enrolled on {}", as_of));
            } else {
                warning(format!("{} person(s) without enrollment on {}:", unenrolled.len(), as_of));
                for p in unenrolled {
                    println!("  {}", p);
                }
            }
        }
    }

    Ok(())
}
