use approx::assert_abs_diff_eq;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Weekday};
use gantt_axis::core::{
    Calendar, Column, ColumnSettings, DateFrame, Rescalable, TimeFrame, TimeFramesDisplay,
    TimeFramesMode, set_columns_width,
};
use proptest::prelude::*;

fn day_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 10)
        .expect("valid day")
        .and_time(NaiveTime::MIN)
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

fn column(calendar: &Calendar, display: TimeFramesDisplay, width: f64) -> Column {
    Column::new(
        day_start(),
        day_start() + TimeDelta::days(1),
        0.0,
        width,
        Some(calendar),
        ColumnSettings {
            display,
            magnet: None,
        },
    )
}

fn weekend_calendar() -> Calendar {
    let mut calendar = Calendar::new();
    calendar.register_time_frame("closed", TimeFrame::whole_day(false));
    calendar.register_date_frame(
        "weekend",
        DateFrame::on_weekdays(vec![Weekday::Sat, Weekday::Sun], ["closed"]),
    );
    calendar
}

/// Week column starting on Monday 2024-06-10 with the weekend cropped.
fn cropped_week(calendar: &Calendar, width: f64) -> Column {
    Column::new(
        day_start(),
        day_start() + TimeDelta::days(7),
        0.0,
        width,
        Some(calendar),
        ColumnSettings {
            display: TimeFramesDisplay::new(TimeFramesMode::Visible, TimeFramesMode::Cropped),
            magnet: None,
        },
    )
}

/// Minute of day strictly inside the morning, or in `(13:00, 20:00]`.
fn working_minute(index: i64) -> i64 {
    if index < 240 {
        8 * 60 + index
    } else {
        13 * 60 + 1 + (index - 240)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn linear_columns_round_trip_dates(
        second in 0i64..86_400,
        width in 4.0f64..400.0,
        factor in 0.25f64..6.0,
    ) {
        let calendar = lunch_calendar();
        let mut column = column(&calendar, TimeFramesDisplay::default(), width);
        column.apply_width_factor(factor);

        let date = day_start() + TimeDelta::seconds(second);
        let position = column.position_by_date(date);
        let recovered = column.date_by_position(position, false);

        let drift = recovered.signed_duration_since(date).num_milliseconds().abs();
        prop_assert!(drift <= 1, "drift of {drift} ms");
    }

    #[test]
    fn cropped_columns_round_trip_working_dates(
        index in 1i64..660,
        width in 10.0f64..400.0,
    ) {
        let calendar = lunch_calendar();
        let display = TimeFramesDisplay::new(TimeFramesMode::Visible, TimeFramesMode::Cropped);
        let column = column(&calendar, display, width);

        let date = day_start() + TimeDelta::minutes(working_minute(index));
        let position = column.position_by_date(date);
        let recovered = column.date_by_position(position, false);

        let drift = recovered.signed_duration_since(date).num_milliseconds().abs();
        prop_assert!(drift <= 1, "drift of {drift} ms");
    }

    #[test]
    fn cropped_day_columns_round_trip_positions(
        fraction in 0.0f64..=1.0,
        width in 10.0f64..400.0,
        factor in 0.25f64..6.0,
    ) {
        let calendar = lunch_calendar();
        let display = TimeFramesDisplay::new(TimeFramesMode::Visible, TimeFramesMode::Cropped);
        let mut column = column(&calendar, display, width);
        column.apply_width_factor(factor);

        let position = fraction * column.width();
        let date = column.date_by_position(position, false);
        assert_abs_diff_eq!(column.position_by_date(date), position, epsilon = 1e-3);
    }

    #[test]
    fn cropped_week_columns_round_trip_positions(
        fraction in 0.0f64..=1.0,
        width in 10.0f64..400.0,
        factor in 0.25f64..6.0,
    ) {
        let calendar = weekend_calendar();
        let mut column = cropped_week(&calendar, width);
        column.apply_width_factor(factor);

        let position = fraction * column.width();
        let date = column.date_by_position(position, false);
        prop_assert!(date <= day_start() + TimeDelta::days(5), "{date} falls in the cropped weekend");
        assert_abs_diff_eq!(column.position_by_date(date), position, epsilon = 1e-3);
    }

    #[test]
    fn rescaling_preserves_proportions(
        count in 1usize..40,
        target in 50.0f64..5000.0,
    ) {
        let mut columns: Vec<Column> = (0..count)
            .map(|index| {
                let start = day_start() + TimeDelta::days(index as i64);
                Column::plain(start, start + TimeDelta::days(1), index as f64 * 20.0, 20.0)
            })
            .collect();
        let original_width = count as f64 * 20.0;

        let factor = set_columns_width(target, original_width, &mut columns);
        prop_assert!(factor.is_some());

        let last = &columns[count - 1];
        assert_abs_diff_eq!(last.right(), target, epsilon = 1e-6);
        for column in &columns {
            assert_abs_diff_eq!(column.width(), target / count as f64, epsilon = 1e-6);
            assert_abs_diff_eq!(
                column.left() / target,
                column.original_size().left / original_width,
                epsilon = 1e-9
            );
        }
    }
}
