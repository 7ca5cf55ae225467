use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use gantt_axis::core::{
    Calendar, Column, ColumnMagnet, ColumnSettings, DateFrame, Rescalable, TimeFrame,
    TimeFramesDisplay, TimeFramesMode, TimeUnit,
};

fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, d)
        .and_then(|day| day.and_hms_opt(h, m, 0))
        .expect("valid datetime")
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

fn lunch_calendar() -> Calendar {
    let mut calendar = Calendar::new();
    calendar.register_time_frames([
        ("morning", TimeFrame::working(hm(8, 0), hm(12, 0)).with_default(true)),
        ("afternoon", TimeFrame::working(hm(13, 0), hm(20, 0)).with_default(true)),
    ]);
    calendar
}

fn cropped_settings() -> ColumnSettings {
    ColumnSettings {
        display: TimeFramesDisplay::new(TimeFramesMode::Hidden, TimeFramesMode::Cropped),
        magnet: None,
    }
}

// 2024-06-10 is a Monday.
fn cropped_monday(calendar: &Calendar) -> Column {
    Column::new(
        at(10, 0, 0),
        at(11, 0, 0),
        0.0,
        20.0,
        Some(calendar),
        cropped_settings(),
    )
}

#[test]
fn plain_column_maps_linearly() {
    let column = Column::plain(at(10, 0, 0), at(11, 0, 0), 40.0, 24.0);
    assert_eq!(column.duration_ms(), 86_400_000);
    assert!(column.time_frames().is_empty());
    assert!((column.position_by_date(at(10, 6, 0)) - 6.0).abs() <= 1e-9);
    assert_eq!(column.date_by_position(12.0, false), at(10, 12, 0));
}

#[test]
fn positions_and_dates_are_clamped() {
    let column = Column::plain(at(10, 0, 0), at(11, 0, 0), 0.0, 24.0);
    assert_eq!(column.position_by_date(at(9, 12, 0)), 0.0);
    assert_eq!(column.position_by_date(at(12, 12, 0)), 24.0);
    assert_eq!(column.date_by_position(-5.0, false), at(10, 0, 0));
    assert_eq!(column.date_by_position(99.0, false), at(11, 0, 0));
}

#[test]
fn zero_width_column_maps_everything_to_its_start() {
    let column = Column::plain(at(10, 0, 0), at(11, 0, 0), 0.0, 0.0);
    assert_eq!(column.position_by_date(at(10, 12, 0)), 0.0);
    assert_eq!(column.date_by_position(10.0, false), at(10, 0, 0));
}

#[test]
fn time_frames_partition_the_column() {
    let calendar = lunch_calendar();
    let column = Column::new(
        at(10, 0, 0),
        at(11, 0, 0),
        0.0,
        24.0,
        Some(&calendar),
        ColumnSettings::default(),
    );

    let frames = column.time_frames();
    assert_eq!(frames.len(), 5);
    assert_eq!(frames[0].start(), column.date());
    assert_eq!(frames[4].end(), column.end_date());
    for pair in frames.windows(2) {
        assert_eq!(pair[0].end(), pair[1].start());
    }
    let total: i64 = frames.iter().map(|frame| frame.duration_ms()).sum();
    assert_eq!(total, column.duration_ms());

    // Working time hidden, non-working time visible.
    assert_eq!(column.visible_time_frames().count(), 3);
    assert!(column.visible_time_frames().all(|frame| !frame.working()));

    let afternoon = column.time_frame_extent(&frames[3]);
    assert!((afternoon.left - 13.0).abs() <= 1e-9);
    assert!((afternoon.width - 7.0).abs() <= 1e-9);
}

#[test]
fn lunch_break_is_collapsed_when_cropped() {
    let calendar = lunch_calendar();
    let column = cropped_monday(&calendar);
    assert!(!column.is_cropped());

    let kept: Vec<_> = column
        .time_frames()
        .iter()
        .filter(|frame| !frame.cropped)
        .map(|frame| column.time_frame_extent(frame))
        .collect();
    assert_eq!(kept.len(), 2);
    assert!(kept[0].left.abs() <= 1e-9);
    assert!((kept[0].width - 80.0 / 11.0).abs() <= 1e-9);
    assert!((kept[1].left - 80.0 / 11.0).abs() <= 1e-9);
    assert!((kept[1].right() - 20.0).abs() <= 1e-9);

    assert!((column.position_by_date(at(10, 10, 0)) - 40.0 / 11.0).abs() <= 1e-9);
    assert_eq!(column.date_by_position(40.0 / 11.0, false), at(10, 10, 0));
}

#[test]
fn dates_in_cropped_time_snap_to_the_next_visible_edge() {
    let calendar = lunch_calendar();
    let column = cropped_monday(&calendar);

    let lunch = column.position_by_date(at(10, 12, 30));
    assert!((lunch - 80.0 / 11.0).abs() <= 1e-9);
    assert!(column.position_by_date(at(10, 6, 0)).abs() <= 1e-9);
    assert!((column.position_by_date(at(10, 21, 0)) - 20.0).abs() <= 1e-9);
}

#[test]
fn fully_non_working_day_is_cropped() {
    let mut calendar = lunch_calendar();
    calendar.register_time_frame("closed", TimeFrame::whole_day(false));
    calendar.register_date_frame(
        "weekend",
        DateFrame::on_weekdays(vec![Weekday::Sat, Weekday::Sun], ["closed"]),
    );

    let saturday = Column::new(
        at(15, 0, 0),
        at(16, 0, 0),
        0.0,
        20.0,
        Some(&calendar),
        cropped_settings(),
    );
    assert!(saturday.is_cropped());

    let visible = Column::new(
        at(15, 0, 0),
        at(16, 0, 0),
        0.0,
        20.0,
        Some(&calendar),
        ColumnSettings::default(),
    );
    assert!(!visible.is_cropped());
}

#[test]
fn rescaling_multiplies_live_geometry() {
    let calendar = lunch_calendar();
    let mut column = Column::new(
        at(10, 0, 0),
        at(11, 0, 0),
        24.0,
        24.0,
        Some(&calendar),
        ColumnSettings::default(),
    );
    column.apply_width_factor(2.5);

    assert!((column.left() - 60.0).abs() <= 1e-9);
    assert!((column.width() - 60.0).abs() <= 1e-9);
    assert_eq!(column.original_size().width, 24.0);
    assert!((column.position_by_date(at(10, 12, 0)) - 30.0).abs() <= 1e-9);

    let morning = column.time_frame_extent(&column.time_frames()[1]);
    assert!((morning.left - 20.0).abs() <= 1e-9);
    assert!((morning.width - 10.0).abs() <= 1e-9);
}

#[test]
fn multi_day_columns_index_frames_per_day() {
    let calendar = lunch_calendar();
    let column = Column::new(
        at(10, 0, 0),
        at(17, 0, 0),
        0.0,
        70.0,
        Some(&calendar),
        ColumnSettings::default(),
    );
    assert_eq!(column.time_frames().len(), 35);

    let wednesday = column.day_time_frames(NaiveDate::from_ymd_opt(2024, 6, 12).expect("day"));
    assert_eq!(wednesday.len(), 5);
    assert_eq!(wednesday[0].start(), at(12, 0, 0));
    assert!(
        column
            .day_time_frames(NaiveDate::from_ymd_opt(2024, 6, 20).expect("day"))
            .is_empty()
    );
}

#[test]
fn contains_date_excludes_start_and_includes_end() {
    let column = Column::plain(at(10, 0, 0), at(11, 0, 0), 0.0, 20.0);
    assert!(!column.contains_date(at(10, 0, 0)));
    assert!(column.contains_date(at(10, 0, 1)));
    assert!(column.contains_date(at(11, 0, 0)));
}

#[test]
fn magnet_snaps_resolved_dates() {
    let settings = ColumnSettings {
        magnet: Some(ColumnMagnet::new(2, TimeUnit::Hour)),
        ..ColumnSettings::default()
    };
    let column = Column::new(at(10, 0, 0), at(11, 0, 0), 0.0, 24.0, None, settings);

    assert_eq!(column.date_by_position(6.4, false), at(10, 6, 24));
    assert_eq!(column.date_by_position(6.4, true), at(10, 6, 0));
    assert_eq!(column.magnet_date(at(10, 7, 40)), at(10, 8, 0));
    assert_eq!(column.magnet_date(at(10, 8, 59)), at(10, 8, 0));
}
