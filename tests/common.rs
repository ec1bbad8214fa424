#![allow(dead_code)]
use artcenter::db::initialize::init_db;
use artcenter::db::pool::DbPool;
use artcenter::db::store::{SqliteStore, Store};
use artcenter::models::{
    ClassSchedule, Enrollment, EnrollmentStatus, Person, PersonRef, PersonType, TimePeriod,
};
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn ac() -> Command {
    cargo_bin_cmd!("artcenter")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_artcenter.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize a DB through the CLI (`--test` leaves the config file alone)
pub fn init_cli_db(name: &str) -> String {
    let db_path = setup_test_db(name);
    ac().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();
    db_path
}

/// Fresh migrated store for library-level tests
pub fn test_store(name: &str) -> SqliteStore {
    let db_path = setup_test_db(name);
    let pool = DbPool::new(&db_path).expect("open db");
    init_db(&pool.conn).expect("init db");
    SqliteStore::new(db_path)
}

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

pub fn class(id: &str, subject: &str, slots: &[(u8, TimePeriod)], fee: Option<i64>) -> ClassSchedule {
    let mut c = ClassSchedule::new(id, subject);
    for (day, period) in slots {
        c = c.with_slot(*day, *period).expect("valid slot");
    }
    c.monthly_fee = fee;
    c
}

pub fn enrollment(
    id: i64,
    person: &PersonRef,
    class_id: &str,
    status: EnrollmentStatus,
    start: &str,
    end: Option<&str>,
) -> Enrollment {
    Enrollment {
        id,
        person_id: person.id.clone(),
        person_type: person.kind,
        class_id: class_id.to_string(),
        status,
        start_date: d(start),
        end_date: end.map(d),
    }
}

pub fn save_person(store: &SqliteStore, kind: PersonType, id: &str, name: &str) -> PersonRef {
    let p = Person {
        id: id.to_string(),
        full_name: name.to_string(),
        phone: None,
        kind,
    };
    store.save_person(&p).expect("save person");
    p.person_ref()
}

/// Piano-A3 (Mon morning, Thu evening, 800k) with student S1 and teacher T1.
pub fn seed_piano(store: &SqliteStore) -> (PersonRef, PersonRef) {
    store
        .save_class(&class(
            "Piano-A3",
            "Piano",
            &[(1, TimePeriod::Morning), (4, TimePeriod::Evening)],
            Some(800_000),
        ))
        .expect("save class");
    let s1 = save_person(store, PersonType::Student, "S1", "Nguyễn Văn An");
    let t1 = save_person(store, PersonType::Teacher, "T1", "Trần Thị Bình");
    (s1, t1)
}
