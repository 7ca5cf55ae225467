use chrono::{NaiveDate, NaiveTime, Weekday};
use gantt_axis::core::{Calendar, DateFrame, TimeFrame, TimeFrameMapping};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid day")
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

fn office_calendar() -> Calendar {
    let mut calendar = Calendar::new();
    calendar.register_time_frames([
        ("day", TimeFrame::working(hm(8, 0), hm(20, 0)).with_default(true)),
        ("noon", TimeFrame::non_working(hm(12, 0), hm(13, 0)).with_default(true)),
        ("closed", TimeFrame::whole_day(false)),
    ]);
    calendar.register_date_frame(
        "weekend",
        DateFrame::on_weekdays(vec![Weekday::Sat, Weekday::Sun], ["closed"]),
    );
    calendar
}

#[test]
fn unmatched_day_falls_back_to_default_time_frames() {
    let calendar = office_calendar();
    // 2024-06-10 is a Monday.
    let frames = calendar.get_time_frames(date(2024, 6, 10));
    assert_eq!(frames.len(), 2);
    assert!(frames[0].working);
    assert!(!frames[1].working);
}

#[test]
fn matching_date_frame_selects_its_targets() {
    let calendar = office_calendar();
    let frames = calendar.get_time_frames(date(2024, 6, 15));
    assert_eq!(frames.len(), 1);
    assert!(!frames[0].working);
    assert_eq!(frames[0].duration_ms(), 86_400_000);
}

#[test]
fn default_date_frame_applies_when_nothing_matches() {
    let mut calendar = office_calendar();
    calendar.register_date_frame("fallback", DateFrame::fallback(["closed"]));

    let monday = calendar.get_time_frames(date(2024, 6, 10));
    assert_eq!(monday.len(), 1);
    assert!(!monday[0].working);
}

#[test]
fn mapping_targets_are_called_with_the_day() {
    let mut calendar = office_calendar();
    calendar.register_time_frame_mapping(
        "even-days",
        TimeFrameMapping::new(|day: NaiveDate| {
            use chrono::Datelike;
            if day.day() % 2 == 0 {
                vec!["closed".to_owned()]
            } else {
                vec!["day".to_owned(), "unknown".to_owned()]
            }
        }),
    );
    calendar.register_date_frame(
        "june",
        DateFrame::between(date(2024, 6, 1), date(2024, 6, 30), ["even-days"])
            .expect("ordered range"),
    );

    let even = calendar.get_time_frames(date(2024, 6, 12));
    assert_eq!(even.len(), 1);
    assert!(!even[0].working);

    let odd = calendar.get_time_frames(date(2024, 6, 13));
    assert_eq!(odd.len(), 1);
    assert!(odd[0].working);
}

#[test]
fn single_date_frame_matches_one_day() {
    let mut calendar = office_calendar();
    calendar.register_date_frame("holiday", DateFrame::on_date(date(2024, 12, 25), ["closed"]));

    assert_eq!(calendar.get_time_frames(date(2024, 12, 25)).len(), 1);
    assert_eq!(calendar.get_time_frames(date(2024, 12, 24)).len(), 2);
}

#[test]
fn reversed_range_is_rejected() {
    assert!(DateFrame::between(date(2024, 6, 30), date(2024, 6, 1), ["closed"]).is_err());
}

#[test]
fn overwriting_keeps_registration_position() {
    let mut calendar = office_calendar();
    calendar.register_time_frame("day", TimeFrame::working(hm(9, 0), hm(17, 0)));
    assert_eq!(calendar.time_frame_names(), vec!["day", "noon", "closed"]);
    assert_eq!(
        calendar.time_frame("day").and_then(|frame| frame.start),
        Some(hm(9, 0))
    );

    calendar.remove_time_frames(["noon"]);
    assert_eq!(calendar.time_frame_names(), vec!["day", "closed"]);
}

#[test]
fn clearing_registries() {
    let mut calendar = office_calendar();
    calendar.clear_date_frames();
    assert!(calendar.date_frame("weekend").is_none());
    assert!(!calendar.is_empty());

    calendar.clear();
    assert!(calendar.is_empty());
    assert!(calendar.get_time_frames(date(2024, 6, 10)).is_empty());
}

#[test]
fn unknown_targets_are_ignored() {
    let mut calendar = Calendar::new();
    calendar.register_date_frame("any", DateFrame::matching(|_| true, ["missing"]));
    assert!(calendar.get_time_frames(date(2024, 1, 1)).is_empty());
}
