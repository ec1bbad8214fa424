use artcenter::core::attendance::{group_by_period, tally};
use artcenter::core::{AttendanceLedger, ClassDayPage, DataQualityWarning, EnrollmentRegistry};
use artcenter::db::pool::DbPool;
use artcenter::db::store::{AttendanceFilter, Store};
use artcenter::errors::AppError;
use artcenter::models::{DateRange, EnrollmentStatus, PersonRef, PersonType, TimePeriod};

mod common;
use common::{d, save_person, seed_piano, test_store};

use TimePeriod::{Afternoon, Evening, Morning};

#[test]
fn upsert_is_idempotent_and_last_write_wins() {
    let store = test_store("att_upsert");
    let (s1, _) = seed_piano(&store);
    EnrollmentRegistry::enroll(&store, &s1, "Piano-A3", EnrollmentStatus::Active, d("2024-01-01"), None)
        .unwrap();

    let ledger = AttendanceLedger::new(&store);

    let first = ledger
        .upsert_attendance("Piano-A3", d("2024-01-01"), Morning, &s1, true)
        .unwrap();
    assert!(first.warnings.is_empty());
    assert!(first.record.present);

    // same call twice leaves one row
    ledger
        .upsert_attendance("Piano-A3", d("2024-01-01"), Morning, &s1, true)
        .unwrap();
    let day = ledger.list_by_class_date("Piano-A3", d("2024-01-01")).unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(day[&Morning].len(), 1);
    assert_eq!(day[&Morning][&s1], true);

    // overwrite
    let again = ledger
        .upsert_attendance("Piano-A3", d("2024-01-01"), Morning, &s1, false)
        .unwrap();
    assert!(!again.record.present);

    let day = ledger.list_by_class_date("Piano-A3", d("2024-01-01")).unwrap();
    assert_eq!(day[&Morning][&s1], false);

    let all = store
        .attendance_in_range(&DateRange::parse("2024").unwrap(), &AttendanceFilter::default())
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[test]
fn absent_is_not_the_same_as_not_recorded() {
    let store = test_store("att_absent");
    let (s1, t1) = seed_piano(&store);
    let s2 = save_person(&store, PersonType::Student, "S2", "Lê Minh Châu");

    let ledger = AttendanceLedger::new(&store);
    ledger
        .upsert_attendance("Piano-A3", d("2024-01-04"), Evening, &s1, false)
        .unwrap();
    ledger
        .upsert_attendance("Piano-A3", d("2024-01-04"), Evening, &t1, true)
        .unwrap();

    let day = ledger.list_by_class_date("Piano-A3", d("2024-01-04")).unwrap();
    let evening = &day[&Evening];
    assert_eq!(evening.get(&s1), Some(&false));
    assert_eq!(evening.get(&t1), Some(&true));
    assert_eq!(evening.get(&s2), None);
    assert!(!day.contains_key(&Morning));
}

#[test]
fn student_and_teacher_ids_do_not_collide() {
    let store = test_store("att_namespaces");
    seed_piano(&store);
    let sx = save_person(&store, PersonType::Student, "X1", "Student X");
    let tx = save_person(&store, PersonType::Teacher, "X1", "Teacher X");

    let ledger = AttendanceLedger::new(&store);
    ledger
        .upsert_attendance("Piano-A3", d("2024-01-01"), Morning, &sx, false)
        .unwrap();
    ledger
        .upsert_attendance("Piano-A3", d("2024-01-01"), Morning, &tx, true)
        .unwrap();

    let day = ledger.list_by_class_date("Piano-A3", d("2024-01-01")).unwrap();
    assert_eq!(day[&Morning].len(), 2);
    assert_eq!(day[&Morning][&sx], false);
    assert_eq!(day[&Morning][&tx], true);
}

#[test]
fn off_schedule_and_unenrolled_writes_are_kept_with_warnings() {
    let store = test_store("att_warnings");
    let (s1, _) = seed_piano(&store);
    let ledger = AttendanceLedger::new(&store);

    // Tuesday afternoon is not a slot, and S1 has no enrollment
    let rec = ledger
        .upsert_attendance("Piano-A3", d("2024-01-02"), Afternoon, &s1, true)
        .unwrap();

    assert!(rec.warnings.contains(&DataQualityWarning::OffSchedule {
        class_id: "Piano-A3".to_string(),
        date: d("2024-01-02"),
        period: Afternoon,
    }));
    assert!(rec.warnings.contains(&DataQualityWarning::AttendanceWithoutEnrollment {
        person: s1.clone(),
        class_id: "Piano-A3".to_string(),
        date: d("2024-01-02"),
    }));

    let day = ledger.list_by_class_date("Piano-A3", d("2024-01-02")).unwrap();
    assert_eq!(day[&Afternoon][&s1], true);
}

#[test]
fn inactive_enrollment_does_not_silence_the_warning() {
    let store = test_store("att_inactive");
    let (s1, _) = seed_piano(&store);
    let e = EnrollmentRegistry::enroll(
        &store,
        &s1,
        "Piano-A3",
        EnrollmentStatus::Trial,
        d("2024-01-01"),
        None,
    )
    .unwrap();
    EnrollmentRegistry::transition(&store, e.id, EnrollmentStatus::Inactive, Some(d("2024-01-31")), d("2024-02-01"))
        .unwrap();

    let ledger = AttendanceLedger::new(&store);
    let inside = ledger
        .upsert_attendance("Piano-A3", d("2024-01-08"), Morning, &s1, true)
        .unwrap();
    // row is inactive now, so even a date inside the interval is flagged
    assert_eq!(inside.warnings.len(), 1);
    assert_eq!(inside.warnings[0].code(), "attendance_without_enrollment");
}

#[test]
fn writes_reject_unknown_entities_and_empty_ids() {
    let store = test_store("att_reject");
    let (s1, _) = seed_piano(&store);
    let ledger = AttendanceLedger::new(&store);

    let err = ledger
        .upsert_attendance("Nope", d("2024-01-01"), Morning, &s1, true)
        .unwrap_err();
    assert!(matches!(err, AppError::ClassNotFound(_)));

    let err = ledger
        .upsert_attendance("Piano-A3", d("2024-01-01"), Morning, &PersonRef::student("S404"), true)
        .unwrap_err();
    assert!(matches!(err, AppError::StudentNotFound(_)));

    let err = ledger
        .upsert_attendance("", d("2024-01-01"), Morning, &s1, true)
        .unwrap_err();
    assert!(err.is_validation());

    let err = ledger
        .upsert_attendance("Piano-A3", d("2024-01-01"), Morning, &PersonRef::student("  "), true)
        .unwrap_err();
    assert!(err.is_validation());

    // nothing was written
    let all = store
        .attendance_in_range(&DateRange::parse("2024").unwrap(), &AttendanceFilter::default())
        .unwrap();
    assert!(all.is_empty());
}

#[test]
fn reads_reject_an_unknown_class() {
    let store = test_store("att_read_unknown");
    let (s1, _) = seed_piano(&store);
    let ledger = AttendanceLedger::new(&store);
    ledger
        .upsert_attendance("Piano-A3", d("2024-01-08"), Morning, &s1, true)
        .unwrap();

    let err = ledger
        .list_by_class_date("NO-SUCH-CLASS", d("2024-01-08"))
        .unwrap_err();
    assert!(matches!(err, AppError::ClassNotFound(_)));

    let err = ledger
        .list_by_date_range(
            &DateRange::parse("2024").unwrap(),
            &AttendanceFilter {
                class_id: Some("NO-SUCH-CLASS".to_string()),
                person: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, AppError::ClassNotFound(_)));

    // a known class with nothing recorded is still an empty answer
    let day = ledger.list_by_class_date("Piano-A3", d("2024-01-09")).unwrap();
    assert!(day.is_empty());
}

#[test]
fn stored_slot_with_bad_weekday_is_rejected_on_read() {
    let store = test_store("att_bad_slot");
    let pool = DbPool::new(store.db_path()).unwrap();
    pool.conn
        .execute(
            "INSERT INTO classes (id, name, subject, weekly_schedule, monthly_fee)
             VALUES ('Broken', 'Broken', 'Piano', '[{\"day_of_week\":9,\"period\":\"morning\"}]', 100)",
            [],
        )
        .unwrap();

    assert!(store.class("Broken").is_err());
    assert!(store.classes().is_err());
}

#[test]
fn range_listing_is_ordered_and_filterable() {
    let store = test_store("att_range");
    let (s1, t1) = seed_piano(&store);
    store
        .save_class(&common::class("Dance-B1", "Dance", &[(1, Evening)], Some(600_000)))
        .unwrap();
    let s2 = save_person(&store, PersonType::Student, "S2", "Lê Minh Châu");

    let ledger = AttendanceLedger::new(&store);
    // written out of order on purpose
    ledger.upsert_attendance("Piano-A3", d("2024-01-08"), Morning, &s1, true).unwrap();
    ledger.upsert_attendance("Dance-B1", d("2024-01-01"), Evening, &s2, true).unwrap();
    ledger.upsert_attendance("Piano-A3", d("2024-01-01"), Morning, &t1, true).unwrap();
    ledger.upsert_attendance("Piano-A3", d("2024-01-01"), Morning, &s1, false).unwrap();
    ledger.upsert_attendance("Piano-A3", d("2024-02-05"), Morning, &s1, true).unwrap();

    let jan = DateRange::parse("2024-01").unwrap();
    let records = ledger
        .list_by_date_range(&jan, &AttendanceFilter::default())
        .unwrap();

    let keys: Vec<(String, String, String)> = records
        .iter()
        .map(|r| (r.key.date.to_string(), r.key.class_id.clone(), r.key.person_ref().to_string()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("2024-01-01".into(), "Dance-B1".into(), "student:S2".into()),
            ("2024-01-01".into(), "Piano-A3".into(), "student:S1".into()),
            ("2024-01-01".into(), "Piano-A3".into(), "teacher:T1".into()),
            ("2024-01-08".into(), "Piano-A3".into(), "student:S1".into()),
        ]
    );

    let only_piano = ledger
        .list_by_date_range(
            &jan,
            &AttendanceFilter {
                class_id: Some("Piano-A3".into()),
                person: None,
            },
        )
        .unwrap();
    assert_eq!(only_piano.len(), 3);

    let only_s1 = ledger
        .list_by_date_range(
            &DateRange::parse("2024").unwrap(),
            &AttendanceFilter {
                class_id: None,
                person: Some(s1.clone()),
            },
        )
        .unwrap();
    assert_eq!(only_s1.len(), 3);

    let counts = tally(&only_s1);
    assert_eq!(counts[&s1], (2, 1));

    let grouped = group_by_period(&only_piano);
    assert_eq!(grouped[&Morning].len(), 2);
}

#[test]
fn class_day_page_combines_sessions_roster_and_marks() {
    let store = test_store("att_page");
    let (s1, t1) = seed_piano(&store);
    EnrollmentRegistry::enroll(&store, &s1, "Piano-A3", EnrollmentStatus::Active, d("2024-01-01"), None)
        .unwrap();
    EnrollmentRegistry::enroll(&store, &t1, "Piano-A3", EnrollmentStatus::Active, d("2023-09-01"), None)
        .unwrap();
    AttendanceLedger::new(&store)
        .upsert_attendance("Piano-A3", d("2024-01-01"), Morning, &s1, true)
        .unwrap();

    let page = ClassDayPage::assemble(&store, "Piano-A3", d("2024-01-01")).unwrap();
    assert_eq!(page.sessions.len(), 1);
    assert_eq!(page.sessions[0].period, Morning);
    assert_eq!(page.roster(), vec![t1.clone(), s1.clone()]);
    assert_eq!(page.attendance[&Morning][&s1], true);

    let err = ClassDayPage::assemble(&store, "Nope", d("2024-01-01")).unwrap_err();
    assert!(err.is_not_found());
}
