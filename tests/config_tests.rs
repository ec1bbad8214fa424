use artcenter::config::Config;
use artcenter::config::migrate::{add_missing_keys, missing_keys};
use artcenter::core::ProrationPolicy;
use artcenter::utils::path::expand_home;
use std::fs;
use std::path::PathBuf;

mod common;
use common::temp_out;

fn write_conf(name: &str, body: &str) -> PathBuf {
    let path = PathBuf::from(temp_out(name, "conf"));
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn partial_file_falls_back_to_defaults() {
    let path = write_conf("cfg_partial", "database: /tmp/ac.sqlite\n");
    let cfg = Config::load_from(&path).unwrap();

    assert_eq!(cfg.database, "/tmp/ac.sqlite");
    assert_eq!(cfg.proration, ProrationPolicy::Full);
    assert_eq!(cfg.salary_marker, "Lương");
    assert_eq!(cfg.log_level, "warn");
    assert!(cfg.subjects.iter().any(|s| s == "Piano"));
}

#[test]
fn proration_and_subjects_are_read_from_yaml() {
    let path = write_conf(
        "cfg_full",
        "database: /tmp/ac.sqlite\nsubjects: [Piano, Ceramics]\nproration:\n  mode: cutoff\n  cutoff_day: 15\nsalary_marker: Salary\n",
    );
    let cfg = Config::load_from(&path).unwrap();

    assert_eq!(cfg.proration, ProrationPolicy::Cutoff { cutoff_day: 15 });
    assert_eq!(cfg.salary_marker, "Salary");
    assert_eq!(cfg.resolve_subject("ceramics").unwrap(), "Ceramics");
    assert!(cfg.resolve_subject("Guitar").unwrap_err().is_validation());
}

#[test]
fn missing_file_yields_defaults_and_broken_file_errors() {
    let missing = PathBuf::from(temp_out("cfg_missing", "conf"));
    assert!(Config::load_from(&missing).is_ok());

    let broken = write_conf("cfg_broken", "proration: [not, a, policy\n");
    assert!(Config::load_from(&broken).is_err());
}

#[test]
fn migrate_adds_only_absent_keys() {
    let path = write_conf("cfg_migrate", "database: /tmp/keep.sqlite\nsalary_marker: Salary\n");

    let missing = missing_keys(&path).unwrap();
    assert!(missing.contains(&"subjects".to_string()));
    assert!(missing.contains(&"proration".to_string()));
    assert!(!missing.contains(&"database".to_string()));

    let added = add_missing_keys(&path).unwrap();
    assert_eq!(added.len(), missing.len());
    assert!(missing_keys(&path).unwrap().is_empty());

    let cfg = Config::load_from(&path).unwrap();
    assert_eq!(cfg.database, "/tmp/keep.sqlite");
    assert_eq!(cfg.salary_marker, "Salary");
}

#[test]
fn home_prefix_is_expanded() {
    assert_eq!(expand_home("/var/db.sqlite"), PathBuf::from("/var/db.sqlite"));
    assert_eq!(expand_home("db.sqlite"), PathBuf::from("db.sqlite"));
    if let Some(home) = dirs::home_dir() {
        assert_eq!(expand_home("~/ac/db.sqlite"), home.join("ac/db.sqlite"));
    }
}
