use crate::cli::parser::{Commands, PersonAction};
use crate::config::Config;
use crate::db::store::{SqliteStore, Store};
use crate::errors::{AppError, AppResult};
use crate::models::{Person, PersonType};
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let (kind, action) = match cmd {
        Commands::Student { action } => (PersonType::Student, action),
        Commands::Teacher { action } => (PersonType::Teacher, action),
        _ => return Ok(()),
    };
    let store = SqliteStore::new(&cfg.database);

    match action {
        PersonAction::Add { id, name, phone } => {
            let id = id.trim();
            if id.is_empty() || name.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "{kind} id and name must not be empty"
                )));
            }

            let person = Person {
                id: id.to_string(),
                full_name: name.trim().to_string(),
                phone: phone.clone(),
                kind,
            };
            store.save_person(&person)?;
            store.log("person", &person.person_ref().to_string(), &person.full_name)?;

            success(format!("{} {} saved ({})", kind, person.id, person.full_name));
        }
        PersonAction::List => {
            let persons = store.persons(kind)?;
            if persons.is_empty() {
                info(format!("No {kind}s found."));
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::left("ID"),
                Column::left("NAME"),
                Column::left("PHONE"),
            ]);
            for p in persons {
                table.add_row(vec![p.id, p.full_name, p.phone.unwrap_or_default()]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
