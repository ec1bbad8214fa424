use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ClassDayPage;
use crate::db::store::SqliteStore;
use crate::errors::AppResult;
use crate::models::TimePeriod;
use crate::ui::messages::{header, info, warning};
use crate::utils::colors::{RESET, color_for_mark};
use crate::utils::date::{parse_date, weekday_name};
use crate::utils::formatting::pad_right;
use std::collections::BTreeSet;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Roll { class, date } = cmd else {
        return Ok(());
    };
    let date = parse_date(date)?;

    let store = SqliteStore::new(&cfg.database);
    let page = ClassDayPage::assemble(&store, class, date)?;

    header(format!(
        "{} ({}) · {} {}",
        page.class.name,
        page.class.subject,
        weekday_name(date),
        date
    ));

    // scheduled periods plus any period that already has marks
    let mut periods: BTreeSet<TimePeriod> = page.sessions.iter().map(|s| s.period).collect();
    periods.extend(page.attendance.keys().copied());

    if page.sessions.is_empty() {
        warning("No scheduled session on this date.");
    }
    if periods.is_empty() {
        return Ok(());
    }

    let roster = page.roster();
    if roster.is_empty() {
        info("Nobody is enrolled on this date.");
        return Ok(());
    }

    let name_w = roster.iter().map(|p| p.to_string().len()).max().unwrap_or(10);

    print!("{}", pad_right("", name_w));
    for p in &periods {
        print!("  {:<10}", p.to_string());
    }
    println!();

    for person in &roster {
        print!("{}", pad_right(&person.to_string(), name_w));
        for p in &periods {
            let mark = page
                .attendance
                .get(p)
                .and_then(|m| m.get(person))
                .copied();
            let label = match mark {
                Some(true) => "present",
                Some(false) => "absent",
                None => "-",
            };
            print!("  {}{:<10}{}", color_for_mark(mark), label, RESET);
        }
        println!();
    }

    Ok(())
}
