use artcenter::core::EnrollmentRegistry;
use artcenter::errors::AppError;
use artcenter::models::{EnrollmentStatus, PersonRef, PersonType};

mod common;
use common::{d, enrollment, seed_piano, test_store};

use EnrollmentStatus::{Active, Inactive, Trial};

#[test]
fn open_ended_active_enrollment_eligibility() {
    let s = PersonRef::student("S");
    let reg = EnrollmentRegistry::new(vec![enrollment(1, &s, "C", Active, "2024-01-10", None)]);

    assert!(!reg.is_eligible(&s, "C", d("2024-01-05")));
    assert!(reg.is_eligible(&s, "C", d("2024-01-15")));
    // open-ended covers the far future
    assert!(reg.is_eligible(&s, "C", d("2030-12-31")));
}

#[test]
fn eligibility_requires_active_or_trial_and_covering_interval() {
    let s = PersonRef::student("S");
    let reg = EnrollmentRegistry::new(vec![
        enrollment(1, &s, "C", Trial, "2024-01-01", Some("2024-01-07")),
        enrollment(2, &s, "C", Inactive, "2024-01-08", Some("2024-01-31")),
        enrollment(3, &s, "D", Active, "2024-01-01", None),
    ]);

    assert!(reg.is_eligible(&s, "C", d("2024-01-01")));
    assert!(reg.is_eligible(&s, "C", d("2024-01-07")));
    // inactive row covers the date but does not grant eligibility
    assert!(!reg.is_eligible(&s, "C", d("2024-01-10")));
    // other class, other person
    assert!(reg.is_eligible(&s, "D", d("2024-01-10")));
    assert!(!reg.is_eligible(&PersonRef::student("X"), "C", d("2024-01-03")));
    // a teacher with the same id is a different person
    assert!(!reg.is_eligible(&PersonRef::teacher("S"), "C", d("2024-01-03")));
}

#[test]
fn find_unenrolled_counts_rows_of_any_status() {
    let a = PersonRef::student("A");
    let b = PersonRef::student("B");
    let c = PersonRef::student("C");
    let t = PersonRef::teacher("T");

    let reg = EnrollmentRegistry::new(vec![
        enrollment(1, &a, "X", Active, "2024-01-01", None),
        enrollment(2, &b, "X", Inactive, "2024-01-01", Some("2024-12-31")),
        enrollment(3, &c, "X", Active, "2024-06-01", None),
    ]);

    let all = vec![a.clone(), b.clone(), c.clone(), t.clone()];
    let unenrolled = reg.find_unenrolled(&all, d("2024-03-01"));

    assert!(!unenrolled.contains(&a));
    assert!(!unenrolled.contains(&b));
    assert!(unenrolled.contains(&c));
    assert!(unenrolled.contains(&t));
    assert_eq!(unenrolled.len(), 2);
}

#[test]
fn transition_table() {
    assert!(Trial.can_transition_to(Active));
    assert!(Trial.can_transition_to(Inactive));
    assert!(Active.can_transition_to(Inactive));

    assert!(!Active.can_transition_to(Trial));
    assert!(!Inactive.can_transition_to(Trial));
    assert!(!Inactive.can_transition_to(Active));
    assert!(!Active.can_transition_to(Active));
    assert!(!Trial.can_transition_to(Trial));

    let err = Inactive.transition_to(Active).unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));
}

#[test]
fn enroll_and_transition_through_the_store() {
    let store = test_store("enroll_and_transition");
    let (s1, _) = seed_piano(&store);

    let e = EnrollmentRegistry::enroll(&store, &s1, "Piano-A3", Trial, d("2024-01-02"), None).unwrap();
    assert!(e.id > 0);

    let e = EnrollmentRegistry::transition(&store, e.id, Active, None, d("2024-01-20")).unwrap();
    assert_eq!(e.status, Active);
    assert_eq!(e.end_date, None);

    // closing without an explicit end uses the given day
    let e = EnrollmentRegistry::transition(&store, e.id, Inactive, None, d("2024-03-15")).unwrap();
    assert_eq!(e.status, Inactive);
    assert_eq!(e.end_date, Some(d("2024-03-15")));

    // terminal
    let err = EnrollmentRegistry::transition(&store, e.id, Active, None, d("2024-04-01")).unwrap_err();
    assert!(err.is_validation());

    let reg = EnrollmentRegistry::load_pair(&store, &s1, "Piano-A3").unwrap();
    assert!(reg.is_eligible(&s1, "Piano-A3", d("2024-03-15")));
    assert!(!reg.is_eligible(&s1, "Piano-A3", d("2024-03-16")));

    // re-enrollment is a new row
    let again = EnrollmentRegistry::enroll(&store, &s1, "Piano-A3", Active, d("2024-05-01"), None).unwrap();
    assert_ne!(again.id, e.id);
    let reg = EnrollmentRegistry::load_pair(&store, &s1, "Piano-A3").unwrap();
    assert_eq!(reg.rows().len(), 2);
    assert!(reg.is_eligible(&s1, "Piano-A3", d("2024-05-02")));
}

#[test]
fn enroll_rejects_bad_input() {
    let store = test_store("enroll_rejects");
    let (s1, _) = seed_piano(&store);

    let err = EnrollmentRegistry::enroll(&store, &s1, "Piano-A3", Inactive, d("2024-01-01"), None)
        .unwrap_err();
    assert!(err.is_validation());

    let err = EnrollmentRegistry::enroll(
        &store,
        &s1,
        "Piano-A3",
        Active,
        d("2024-02-01"),
        Some(d("2024-01-01")),
    )
    .unwrap_err();
    assert!(err.is_validation());

    let err = EnrollmentRegistry::enroll(&store, &s1, "Nope", Active, d("2024-01-01"), None).unwrap_err();
    assert!(matches!(err, AppError::ClassNotFound(_)));

    let ghost = PersonRef::new(PersonType::Teacher, "T404");
    let err = EnrollmentRegistry::enroll(&store, &ghost, "Piano-A3", Active, d("2024-01-01"), None)
        .unwrap_err();
    assert!(matches!(err, AppError::TeacherNotFound(_)));

    let err = EnrollmentRegistry::transition(&store, 9999, Active, None, d("2024-01-01")).unwrap_err();
    assert!(matches!(err, AppError::EnrollmentNotFound(9999)));
}

#[test]
fn coverage_merges_overlapping_rows() {
    let s = PersonRef::student("S");
    let reg = EnrollmentRegistry::new(vec![
        enrollment(1, &s, "C", Trial, "2024-01-01", Some("2024-01-10")),
        enrollment(2, &s, "C", Active, "2024-01-11", None),
        enrollment(3, &s, "C", Inactive, "2023-01-01", Some("2023-12-31")),
    ]);

    let cov = reg.coverage(&s, "C", d("2024-01-01"), d("2024-01-31"));
    assert_eq!(cov, vec![(d("2024-01-01"), d("2024-01-31"))]);

    // pair appears once even with two billable rows
    let pairs = reg.billable_pairs(d("2024-01-01"), d("2024-01-31"));
    assert_eq!(pairs, vec![(s.clone(), "C".to_string())]);

    // inactive history is not billable
    assert!(reg.billable_pairs(d("2023-01-01"), d("2023-12-31")).is_empty());
}
