use crate::cli::commands::print_warnings;
use crate::cli::parser::{Commands, FeeAction};
use crate::config::Config;
use crate::core::fees::MAX_MONTHLY_FEE;
use crate::core::{FeeEngine, Snapshot};
use crate::db::store::{SqliteStore, Store};
use crate::errors::{AppError, AppResult};
use crate::models::{PersonRef, PersonType};
use crate::ui::messages::{info, success, warning};
use crate::utils::date::parse_month;
use crate::utils::money;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Fee { action } = cmd else {
        return Ok(());
    };

    match action {
        FeeAction::Quote {
            person,
            class,
            month,
        } => quote(cfg, person, class, month),
        FeeAction::Set { subject, amount } => set(cfg, subject, *amount),
        FeeAction::List => list(cfg),
    }
}

fn quote(cfg: &Config, person: &str, class_id: &str, month: &str) -> AppResult<()> {
    let (year, month) = parse_month(month)?;
    let who = PersonRef::student(person.trim());

    let store = SqliteStore::new(&cfg.database);
    if store.person(PersonType::Student, &who.id)?.is_none() {
        return Err(AppError::StudentNotFound(who.id));
    }

    let snapshot = Snapshot::load(&store)?;
    let engine = FeeEngine::new(
        &snapshot.fees,
        &snapshot.classes,
        &snapshot.registry,
        cfg.proration,
    );
    let quote = engine.compute_monthly_fee(&who, class_id, month, year)?;

    println!(
        "💰 {} in {} for {}-{:02}: {} VND",
        who,
        class_id,
        year,
        month,
        money(quote.amount)
    );
    println!(
        "   subject {} · fee {} · covered {}/{} days · policy {}",
        quote.subject,
        quote.fee.map(money).unwrap_or_else(|| "--".to_string()),
        quote.covered_days,
        quote.days_in_month,
        cfg.proration.describe()
    );

    let conflicts: Vec<_> = snapshot
        .fee_warnings
        .iter()
        .filter(|w| w.target() == quote.subject)
        .cloned()
        .chain(quote.warning)
        .collect();
    print_warnings(&conflicts);
    Ok(())
}

fn set(cfg: &Config, subject: &str, amount: i64) -> AppResult<()> {
    let subject = cfg.resolve_subject(subject)?;
    if amount <= 0 {
        return Err(AppError::InvalidAmount(format!(
            "{amount} (monthly fee must be positive)"
        )));
    }
    if amount > MAX_MONTHLY_FEE {
        return Err(AppError::InvalidAmount(format!(
            "{amount} (monthly fee must not exceed {MAX_MONTHLY_FEE})"
        )));
    }

    let store = SqliteStore::new(&cfg.database);
    let updated = store.set_subject_fee(&subject, amount)?;
    store.log("fee", &subject, &format!("{} on {} class(es)", amount, updated))?;

    if updated == 0 {
        warning(format!("No classes of subject {} exist yet; nothing updated.", subject));
    } else {
        success(format!(
            "Fee for {} set to {} VND on {} class(es)",
            subject,
            money(amount),
            updated
        ));
    }
    Ok(())
}

fn list(cfg: &Config) -> AppResult<()> {
    let store = SqliteStore::new(&cfg.database);
    let snapshot = Snapshot::load(&store)?;

    if snapshot.fees.is_empty() {
        info("No fees defined.");
    } else {
        let mut table = Table::new(vec![Column::left("SUBJECT"), Column::right("MONTHLY FEE")]);
        for (subject, fee) in snapshot.fees.iter() {
            table.add_row(vec![subject.clone(), money(*fee)]);
        }
        print!("{}", table.render());
    }

    print_warnings(&snapshot.fee_warnings);
    Ok(())
}
