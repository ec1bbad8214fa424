use artcenter::core::ScheduleResolver;
use artcenter::models::{ClassSchedule, DateRange, TimePeriod, WeeklySlot};
use artcenter::utils::date::day_of_week;

mod common;
use common::{class, d};

#[test]
fn one_monday_slot_over_two_weeks() {
    let piano = class("Piano-A3", "Piano", &[(1, TimePeriod::Morning)], None);
    // 2024-01-01 is a Monday; the 14-day range holds Jan 1 and Jan 8
    let range = DateRange::new(d("2024-01-01"), d("2024-01-14")).unwrap();

    let sessions = ScheduleResolver::resolve_sessions(&piano, &range);

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].date, d("2024-01-01"));
    assert_eq!(sessions[1].date, d("2024-01-08"));
    assert!(sessions.iter().all(|s| s.period == TimePeriod::Morning));
    assert!(sessions.iter().all(|s| s.class_id == "Piano-A3"));
}

#[test]
fn same_day_slots_follow_chronological_period_order() {
    // inserted in lexical-friendly order on purpose
    let c = class(
        "Dance-B1",
        "Dance",
        &[
            (3, TimePeriod::Evening),
            (3, TimePeriod::Afternoon),
            (3, TimePeriod::Morning),
        ],
        None,
    );
    // 2024-03-06 is a Wednesday
    let sessions = ScheduleResolver::resolve_sessions(&c, &DateRange::single(d("2024-03-06")));

    let periods: Vec<TimePeriod> = sessions.iter().map(|s| s.period).collect();
    assert_eq!(
        periods,
        vec![TimePeriod::Morning, TimePeriod::Afternoon, TimePeriod::Evening]
    );
}

#[test]
fn sessions_are_ordered_by_date_then_period() {
    let c = class(
        "Art-1",
        "Drawing",
        &[
            (6, TimePeriod::Morning),
            (0, TimePeriod::Evening),
            (0, TimePeriod::Morning),
        ],
        None,
    );
    // Sat 2024-06-01 .. Sun 2024-06-09
    let range = DateRange::new(d("2024-06-01"), d("2024-06-09")).unwrap();
    let sessions = ScheduleResolver::resolve_sessions(&c, &range);

    let got: Vec<(String, TimePeriod)> = sessions
        .iter()
        .map(|s| (s.date_str(), s.period))
        .collect();

    assert_eq!(
        got,
        vec![
            ("2024-06-01".to_string(), TimePeriod::Morning),
            ("2024-06-02".to_string(), TimePeriod::Morning),
            ("2024-06-02".to_string(), TimePeriod::Evening),
            ("2024-06-08".to_string(), TimePeriod::Morning),
            ("2024-06-09".to_string(), TimePeriod::Morning),
            ("2024-06-09".to_string(), TimePeriod::Evening),
        ]
    );
}

#[test]
fn one_session_per_matching_date_and_slot_and_nothing_else() {
    let c = class(
        "Violin-C",
        "Violin",
        &[
            (2, TimePeriod::Afternoon),
            (5, TimePeriod::Morning),
            (5, TimePeriod::Evening),
        ],
        None,
    );
    let range = DateRange::parse("2024-02").unwrap();
    let sessions = ScheduleResolver::resolve_sessions(&c, &range);

    let mut expected = 0;
    for day in range.days() {
        for slot in &c.slots {
            if slot.day_of_week == day_of_week(day) {
                expected += 1;
                assert!(
                    sessions
                        .iter()
                        .any(|s| s.date == day && s.period == slot.period),
                    "missing session on {day} {}",
                    slot.period
                );
            }
        }
    }

    assert_eq!(sessions.len(), expected);
    for s in &sessions {
        assert!(c.has_slot(day_of_week(s.date), s.period), "spurious session {:?}", s);
    }
}

#[test]
fn empty_schedule_yields_no_sessions() {
    let c = ClassSchedule::new("Empty", "Singing");
    let range = DateRange::parse("2024").unwrap();
    assert!(ScheduleResolver::resolve_sessions(&c, &range).is_empty());
}

#[test]
fn sunday_is_day_zero() {
    // 2024-01-07 is a Sunday
    assert_eq!(day_of_week(d("2024-01-07")), 0);
    assert_eq!(day_of_week(d("2024-01-13")), 6);

    let c = class("Sun", "Calligraphy", &[(0, TimePeriod::Morning)], None);
    let sessions = ScheduleResolver::resolve_sessions(
        &c,
        &DateRange::new(d("2024-01-01"), d("2024-01-07")).unwrap(),
    );
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].date, d("2024-01-07"));
}

#[test]
fn weekly_slot_parsing() {
    let slot = WeeklySlot::parse("mon:morning").unwrap();
    assert_eq!(slot.day_of_week, 1);
    assert_eq!(slot.period, TimePeriod::Morning);

    assert_eq!(WeeklySlot::parse("Sunday:e").unwrap().day_of_week, 0);
    assert_eq!(WeeklySlot::parse("6:afternoon").unwrap().day_of_week, 6);

    assert!(WeeklySlot::parse("7:morning").unwrap_err().is_validation());
    assert!(WeeklySlot::parse("mon:night").unwrap_err().is_validation());
    assert!(WeeklySlot::parse("monday").unwrap_err().is_validation());
}

#[test]
fn range_expressions() {
    let r = DateRange::parse("2024-02").unwrap();
    assert_eq!((r.start, r.end), (d("2024-02-01"), d("2024-02-29")));

    let r = DateRange::parse("2024-01:2024-03").unwrap();
    assert_eq!((r.start, r.end), (d("2024-01-01"), d("2024-03-31")));

    let r = DateRange::parse("2023").unwrap();
    assert_eq!(r.num_days(), 365);

    assert!(DateRange::parse("2024-03-10:2024-03-01").is_err());
    assert!(DateRange::parse("2024-01:2024-03-01").is_err());
    assert!(DateRange::parse("yesterday").is_err());
}
