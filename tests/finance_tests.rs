use artcenter::core::fees::derive_fee_schedule;
use artcenter::core::{
    DataQualityWarning, EnrollmentRegistry, ExpenseClassifier, FeeEngine, FinancialAggregator,
    ProrationPolicy, Snapshot,
};
use artcenter::db::store::Store;
use artcenter::errors::AppError;
use artcenter::models::{ClassSchedule, Expense, ExpenseCategory, PersonRef, TimePeriod};
use std::collections::BTreeMap;

mod common;
use common::{class, d, enrollment, seed_piano, test_store};

use artcenter::models::EnrollmentStatus::{Active, Trial};

fn expense(reason: &str, amount: i64, month: u32, year: i32) -> Expense {
    Expense {
        id: 0,
        reason: reason.to_string(),
        amount,
        month,
        year,
    }
}

fn catalog(classes: Vec<ClassSchedule>) -> BTreeMap<String, ClassSchedule> {
    classes.into_iter().map(|c| (c.id.clone(), c)).collect()
}

#[test]
fn salary_expense_is_split_out() {
    let classifier = ExpenseClassifier::new("Lương").unwrap();
    let classes = catalog(vec![]);
    let (fees, _) = derive_fee_schedule(classes.values());
    let registry = EnrollmentRegistry::default();
    let engine = FeeEngine::new(&fees, &classes, &registry, ProrationPolicy::Full);
    let expenses = vec![expense("Lương T1/2024", 5_000_000, 1, 2024)];

    let series = FinancialAggregator::new(&engine, &expenses, &classifier)
        .build_monthly_series(2024)
        .unwrap();

    let jan = &series.months[0];
    assert_eq!(jan.month, 1);
    assert_eq!(jan.salary_expenses, 5_000_000);
    assert_eq!(jan.other_expenses, 0);
    assert_eq!(jan.expenses, 5_000_000);
    assert_eq!(jan.revenue, 0);
    assert_eq!(jan.profit, -5_000_000);
}

#[test]
fn series_has_twelve_ordered_months_with_zero_fill() {
    let classifier = ExpenseClassifier::new("Lương").unwrap();
    let classes = catalog(vec![]);
    let (fees, _) = derive_fee_schedule(classes.values());
    let registry = EnrollmentRegistry::default();
    let engine = FeeEngine::new(&fees, &classes, &registry, ProrationPolicy::Full);
    let expenses = vec![
        expense("Tiền điện T3/2024", 1_200_000, 3, 2024),
        // another year is ignored
        expense("Tiền điện T3/2023", 999, 3, 2023),
    ];

    let series = FinancialAggregator::new(&engine, &expenses, &classifier)
        .build_monthly_series(2024)
        .unwrap();

    assert_eq!(series.year, 2024);
    assert_eq!(series.months.len(), 12);
    let months: Vec<u32> = series.months.iter().map(|m| m.month).collect();
    assert_eq!(months, (1..=12).collect::<Vec<u32>>());

    for m in &series.months {
        assert_eq!(m.expenses, m.salary_expenses + m.other_expenses);
        assert_eq!(m.profit, m.revenue - m.expenses);
        if m.month != 3 {
            assert_eq!((m.revenue, m.expenses, m.profit), (0, 0, 0));
        }
    }
    assert_eq!(series.months[2].other_expenses, 1_200_000);
    assert!(series.warnings.is_empty());
}

#[test]
fn classifier_recognises_salary_month_codes() {
    let c = ExpenseClassifier::new("Lương").unwrap();

    assert_eq!(c.salary_period("Lương T1/2024"), Some((1, 2024)));
    assert_eq!(c.salary_period("lương giáo viên T12-2023"), Some((12, 2023)));
    assert_eq!(c.salary_period("Lương 3/2024"), Some((3, 2024)));
    assert_eq!(c.salary_period("LƯƠNG cô Hoa T05 / 2024"), Some((5, 2024)));

    assert_eq!(c.salary_period("Tiền điện T1/2024"), None);
    assert_eq!(c.salary_period("Lương thưởng Tết"), None);
    assert_eq!(c.salary_period("Lương T13/2024"), None);

    assert_eq!(
        c.classify(&expense("Lương T1/2024", 1, 1, 2024)),
        ExpenseCategory::TeacherSalary
    );
    assert_eq!(
        c.classify(&expense("Mua màu vẽ", 1, 1, 2024)),
        ExpenseCategory::Other
    );
}

#[test]
fn classifier_marker_is_configurable() {
    let c = ExpenseClassifier::new("Salary").unwrap();
    assert_eq!(c.salary_period("salary T2/2024"), Some((2, 2024)));
    assert_eq!(c.salary_period("Lương T2/2024"), None);
}

#[test]
fn revenue_sums_fees_once_per_billable_pair() {
    let s1 = PersonRef::student("S1");
    let s2 = PersonRef::student("S2");
    let classes = catalog(vec![
        class("Piano-A3", "Piano", &[(1, TimePeriod::Morning)], Some(800_000)),
        class("Dance-B1", "Dance", &[(3, TimePeriod::Evening)], Some(600_000)),
    ]);
    let (fees, _) = derive_fee_schedule(classes.values());
    let registry = EnrollmentRegistry::new(vec![
        // overlapping trial and active rows for one pair
        enrollment(1, &s1, "Piano-A3", Trial, "2024-01-01", Some("2024-01-31")),
        enrollment(2, &s1, "Piano-A3", Active, "2024-01-15", None),
        enrollment(3, &s1, "Dance-B1", Active, "2024-02-01", Some("2024-02-29")),
        enrollment(4, &s2, "Piano-A3", Active, "2024-03-01", None),
    ]);
    let engine = FeeEngine::new(&fees, &classes, &registry, ProrationPolicy::Full);
    let classifier = ExpenseClassifier::new("Lương").unwrap();
    let expenses = vec![
        expense("Lương T2/2024", 3_000_000, 2, 2024),
        expense("Tiền thuê nhà", 2_000_000, 2, 2024),
    ];

    let series = FinancialAggregator::new(&engine, &expenses, &classifier)
        .build_monthly_series(2024)
        .unwrap();

    assert_eq!(series.months[0].revenue, 800_000);
    assert_eq!(series.months[1].revenue, 1_400_000);
    assert_eq!(series.months[1].salary_expenses, 3_000_000);
    assert_eq!(series.months[1].other_expenses, 2_000_000);
    assert_eq!(series.months[1].profit, -3_600_000);
    assert_eq!(series.months[2].revenue, 1_600_000);
    assert_eq!(series.months[11].revenue, 1_600_000);

    let totals = series.totals().unwrap();
    assert_eq!(totals.revenue, 800_000 + 1_400_000 + 10 * 1_600_000);
    assert_eq!(totals.expenses, 5_000_000);
    assert_eq!(totals.profit, totals.revenue - totals.expenses);
}

#[test]
fn missing_fee_is_reported_once_per_subject() {
    let s1 = PersonRef::student("S1");
    let classes = catalog(vec![class("Art-1", "Drawing", &[(6, TimePeriod::Morning)], None)]);
    let (fees, _) = derive_fee_schedule(classes.values());
    let registry = EnrollmentRegistry::new(vec![enrollment(1, &s1, "Art-1", Active, "2024-01-01", None)]);
    let engine = FeeEngine::new(&fees, &classes, &registry, ProrationPolicy::Full);
    let classifier = ExpenseClassifier::new("Lương").unwrap();

    let series = FinancialAggregator::new(&engine, &[], &classifier)
        .build_monthly_series(2024)
        .unwrap();

    assert!(series.months.iter().all(|m| m.revenue == 0));
    assert_eq!(
        series.warnings,
        vec![DataQualityWarning::MissingFee {
            subject: "Drawing".to_string()
        }]
    );
}

#[test]
fn series_from_a_store_snapshot() {
    let store = test_store("finance_snapshot");
    let (s1, _) = seed_piano(&store);
    EnrollmentRegistry::enroll(&store, &s1, "Piano-A3", Active, d("2024-11-01"), None).unwrap();
    store
        .insert_expense("Lương T11/2024", 4_000_000, 11, 2024)
        .unwrap();

    let snapshot = Snapshot::load(&store).unwrap();
    let engine = FeeEngine::new(
        &snapshot.fees,
        &snapshot.classes,
        &snapshot.registry,
        ProrationPolicy::Full,
    );
    let expenses = store.expenses(Some(2024)).unwrap();
    let classifier = ExpenseClassifier::new("Lương").unwrap();

    let series = FinancialAggregator::new(&engine, &expenses, &classifier)
        .build_monthly_series(2024)
        .unwrap();

    assert_eq!(series.months[9].revenue, 0);
    assert_eq!(series.months[10].revenue, 800_000);
    assert_eq!(series.months[10].salary_expenses, 4_000_000);
    assert_eq!(series.months[10].profit, -3_200_000);
    assert_eq!(series.months[11].profit, 800_000);
}

#[test]
fn teacher_enrollments_are_not_billed() {
    let t1 = PersonRef::teacher("T1");
    let classes = catalog(vec![class("Piano-A3", "Piano", &[(1, TimePeriod::Morning)], Some(800_000))]);
    let (fees, _) = derive_fee_schedule(classes.values());
    let registry = EnrollmentRegistry::new(vec![enrollment(1, &t1, "Piano-A3", Active, "2024-01-01", None)]);
    let engine = FeeEngine::new(&fees, &classes, &registry, ProrationPolicy::Full);
    let classifier = ExpenseClassifier::new("Lương").unwrap();

    let series = FinancialAggregator::new(&engine, &[], &classifier)
        .build_monthly_series(2024)
        .unwrap();

    assert_eq!(series.totals().unwrap().revenue, 0);
}

#[test]
fn enrollment_in_a_class_missing_from_the_catalog_is_skipped() {
    let s1 = PersonRef::student("S1");
    let s2 = PersonRef::student("S2");
    let classes = catalog(vec![class("Piano-A3", "Piano", &[(1, TimePeriod::Morning)], Some(800_000))]);
    let (fees, _) = derive_fee_schedule(classes.values());
    // Guitar-B1 was created after the catalog was read
    let registry = EnrollmentRegistry::new(vec![
        enrollment(1, &s1, "Piano-A3", Active, "2024-01-01", None),
        enrollment(2, &s2, "Guitar-B1", Active, "2024-01-01", None),
    ]);
    let engine = FeeEngine::new(&fees, &classes, &registry, ProrationPolicy::Full);
    let classifier = ExpenseClassifier::new("Lương").unwrap();

    let series = FinancialAggregator::new(&engine, &[], &classifier)
        .build_monthly_series(2024)
        .unwrap();

    assert_eq!(series.months[0].revenue, 800_000);
    assert_eq!(
        series.warnings,
        vec![DataQualityWarning::UnknownClass {
            person: s2,
            class_id: "Guitar-B1".to_string(),
        }]
    );
    assert_eq!(series.warnings[0].code(), "unknown_class");
}

#[test]
fn revenue_overflow_is_an_error_not_a_wrap() {
    let s1 = PersonRef::student("S1");
    let s2 = PersonRef::student("S2");
    let classes = catalog(vec![class("Piano-A3", "Piano", &[(1, TimePeriod::Morning)], Some(i64::MAX / 2 + 1))]);
    let (fees, _) = derive_fee_schedule(classes.values());
    let registry = EnrollmentRegistry::new(vec![
        enrollment(1, &s1, "Piano-A3", Active, "2024-01-01", None),
        enrollment(2, &s2, "Piano-A3", Active, "2024-01-01", None),
    ]);
    let engine = FeeEngine::new(&fees, &classes, &registry, ProrationPolicy::Full);
    let classifier = ExpenseClassifier::new("Lương").unwrap();

    let err = FinancialAggregator::new(&engine, &[], &classifier)
        .build_monthly_series(2024)
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidAmount(_)));
}

#[test]
fn yearly_totals_overflow_is_an_error() {
    let s1 = PersonRef::student("S1");
    let classes = catalog(vec![class("Piano-A3", "Piano", &[(1, TimePeriod::Morning)], Some(i64::MAX / 6))]);
    let (fees, _) = derive_fee_schedule(classes.values());
    let registry = EnrollmentRegistry::new(vec![enrollment(1, &s1, "Piano-A3", Active, "2024-01-01", None)]);
    let engine = FeeEngine::new(&fees, &classes, &registry, ProrationPolicy::Full);
    let classifier = ExpenseClassifier::new("Lương").unwrap();

    // each month fits, the year does not
    let series = FinancialAggregator::new(&engine, &[], &classifier)
        .build_monthly_series(2024)
        .unwrap();
    assert!(series.months.iter().all(|m| m.revenue == i64::MAX / 6));
    assert!(matches!(series.totals().unwrap_err(), AppError::InvalidAmount(_)));
}
