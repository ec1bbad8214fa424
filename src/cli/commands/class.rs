use crate::cli::parser::{ClassAction, Commands};
use crate::config::Config;
use crate::core::ScheduleResolver;
use crate::core::fees::MAX_MONTHLY_FEE;
use crate::db::store::{SqliteStore, Store};
use crate::errors::{AppError, AppResult};
use crate::models::{ClassSchedule, DateRange, WeeklySlot};
use crate::ui::messages::{info, success, warning};
use crate::utils::date::weekday_name;
use crate::utils::money;
use crate::utils::table::{Column, Table};
use std::collections::BTreeSet;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Class { action } = cmd else {
        return Ok(());
    };
    let store = SqliteStore::new(&cfg.database);

    match action {
        ClassAction::Add {
            id,
            subject,
            slots,
            name,
            fee,
        } => add(&store, cfg, id, subject, slots, name.as_deref(), *fee),
        ClassAction::List => list(&store),
        ClassAction::Sessions { id, range } => sessions(&store, id, range),
    }
}

fn add(
    store: &SqliteStore,
    cfg: &Config,
    id: &str,
    subject: &str,
    slots: &[String],
    name: Option<&str>,
    fee: Option<i64>,
) -> AppResult<()> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::Validation("class id must not be empty".into()));
    }

    let subject = cfg.resolve_subject(subject)?;
    let slots = slots
        .iter()
        .map(|s| WeeklySlot::parse(s))
        .collect::<AppResult<BTreeSet<_>>>()?;
    if let Some(f) = fee
        && !(0..=MAX_MONTHLY_FEE).contains(&f)
    {
        return Err(AppError::InvalidAmount(format!(
            "{f} (monthly fee must be between 0 and {MAX_MONTHLY_FEE})"
        )));
    }

    let class = ClassSchedule {
        id: id.to_string(),
        name: name.unwrap_or(id).to_string(),
        subject,
        slots,
        monthly_fee: fee,
    };

    store.save_class(&class)?;
    store.log(
        "class",
        &class.id,
        &format!("{} [{}]", class.subject, class.slots_label()),
    )?;

    success(format!(
        "Class {} saved ({}; {})",
        class.id,
        class.subject,
        if class.slots.is_empty() {
            "no weekly slots".to_string()
        } else {
            class.slots_label()
        }
    ));
    if class.monthly_fee.is_none() {
        warning(format!("Class {} has no monthly fee.", class.id));
    }
    Ok(())
}

fn list(store: &SqliteStore) -> AppResult<()> {
    let classes = store.classes()?;
    if classes.is_empty() {
        info("No classes found.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::left("ID"),
        Column::left("NAME"),
        Column::left("SUBJECT"),
        Column::left("SLOTS"),
        Column::right("FEE"),
    ]);

    for c in &classes {
        table.add_row(vec![
            c.id.clone(),
            c.name.clone(),
            c.subject.clone(),
            c.slots_label(),
            c.monthly_fee.map(money).unwrap_or_else(|| "--".to_string()),
        ]);
    }

    print!("{}", table.render());
    Ok(())
}

fn sessions(store: &SqliteStore, id: &str, range: &str) -> AppResult<()> {
    let range = DateRange::parse(range)?;
    let class = store
        .class(id)?
        .ok_or_else(|| AppError::ClassNotFound(id.to_string()))?;

    let sessions = ScheduleResolver::resolve_sessions(&class, &range);

    println!("📅 Sessions of {} in {}:\n", class.id, range);
    if sessions.is_empty() {
        info("No sessions in range.");
        return Ok(());
    }

    for s in &sessions {
        println!("{}  {:<9}  {}", s.date_str(), weekday_name(s.date), s.period);
    }
    println!("\n{} session(s)", sessions.len());
    Ok(())
}
