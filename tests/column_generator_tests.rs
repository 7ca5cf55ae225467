use chrono::{NaiveDate, NaiveDateTime, Weekday};
use gantt_axis::GanttError;
use gantt_axis::core::{
    Calendar, Column, ColumnGenerator, ColumnSettings, DEFAULT_COLUMN_WIDTH, DateFrame,
    TimeFrame, TimeFramesDisplay, TimeFramesMode, TimeUnit,
};

fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, m, d)
        .and_then(|day| day.and_hms_opt(h, 0, 0))
        .expect("valid datetime")
}

fn dates(columns: &[Column]) -> Vec<NaiveDateTime> {
    columns.iter().map(Column::date).collect()
}

fn day_generator() -> ColumnGenerator<'static> {
    ColumnGenerator::new(TimeUnit::Day, None, ColumnSettings::default())
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

#[test]
fn boundary_end_date_gets_no_column() {
    let columns = day_generator()
        .generate(at(1, 1, 0), Some(at(1, 10, 0)), None, 0.0, false)
        .expect("bounded generation");

    assert_eq!(columns.len(), 9);
    assert_eq!(columns[8].date(), at(1, 9, 0));
    assert_eq!(columns[8].end_date(), at(1, 10, 0));
}

#[test]
fn end_date_inside_a_unit_gets_its_column() {
    let columns = day_generator()
        .generate(at(1, 1, 0), Some(at(1, 10, 12)), None, 0.0, false)
        .expect("bounded generation");
    assert_eq!(columns.len(), 10);
    assert_eq!(columns[9].date(), at(1, 10, 0));
}

#[test]
fn start_is_snapped_and_columns_are_contiguous() {
    let columns = day_generator()
        .generate(at(1, 1, 15), Some(at(1, 5, 0)), None, 0.0, false)
        .expect("bounded generation");

    assert_eq!(columns[0].date(), at(1, 1, 0));
    for (index, pair) in columns.windows(2).enumerate() {
        assert_eq!(pair[0].end_date(), pair[1].date());
        assert_eq!(pair[1].left(), (index + 1) as f64 * DEFAULT_COLUMN_WIDTH);
    }
}

#[test]
fn left_offset_shifts_every_column() {
    let columns = day_generator()
        .generate(at(1, 1, 0), Some(at(1, 3, 0)), None, 100.0, false)
        .expect("bounded generation");
    assert_eq!(columns[0].left(), 100.0);
    assert_eq!(columns[1].left(), 120.0);
}

#[test]
fn reverse_generation_starts_before_a_boundary_start() {
    let columns = day_generator()
        .generate(at(1, 10, 0), Some(at(1, 5, 0)), None, 0.0, true)
        .expect("bounded generation");

    assert_eq!(
        dates(&columns),
        vec![at(1, 5, 0), at(1, 6, 0), at(1, 7, 0), at(1, 8, 0), at(1, 9, 0)]
    );
    assert_eq!(columns[0].left(), -100.0);
    assert_eq!(columns[4].left(), -20.0);
}

#[test]
fn reverse_generation_includes_the_unit_containing_start() {
    let columns = day_generator()
        .generate(at(1, 10, 12), Some(at(1, 9, 0)), None, 0.0, true)
        .expect("bounded generation");
    assert_eq!(dates(&columns), vec![at(1, 9, 0), at(1, 10, 0)]);
    assert_eq!(columns[1].right(), 0.0);
}

#[test]
fn reverse_generation_bounded_by_width() {
    let generator = ColumnGenerator::new(TimeUnit::Hour, Some(10.0), ColumnSettings::default());
    let columns = generator
        .generate(at(3, 1, 0), None, Some(30.0), 0.0, true)
        .expect("bounded generation");

    assert_eq!(columns.len(), 5);
    assert_eq!(columns[4].date(), at(2, 29, 23));
    assert_eq!(columns[0].left(), -50.0);
}

#[test]
fn missing_bounds_are_an_error() {
    let result = day_generator().generate(at(1, 1, 0), None, None, 0.0, false);
    assert!(matches!(result, Err(GanttError::MissingGenerationBound)));
}

#[test]
fn month_columns_follow_calendar_lengths() {
    let generator = ColumnGenerator::new(TimeUnit::Month, None, ColumnSettings::default());
    let columns = generator
        .generate(at(1, 15, 0), Some(at(4, 1, 0)), None, 0.0, false)
        .expect("bounded generation");

    assert_eq!(dates(&columns), vec![at(1, 1, 0), at(2, 1, 0), at(3, 1, 0)]);
    assert_eq!(columns[1].duration_ms(), 29 * 86_400_000);
}

#[test]
fn cropped_weekends_are_skipped_without_gaps() {
    let calendar = weekend_calendar();
    let settings = ColumnSettings {
        display: TimeFramesDisplay::new(TimeFramesMode::Hidden, TimeFramesMode::Cropped),
        magnet: None,
    };
    // 2024-06-03 is a Monday, 2024-06-15 a Saturday.
    let columns = ColumnGenerator::new(TimeUnit::Day, None, settings)
        .with_calendar(&calendar)
        .generate(at(6, 3, 0), Some(at(6, 15, 0)), None, 0.0, false)
        .expect("bounded generation");

    assert_eq!(columns.len(), 10);
    assert_eq!(columns[4].date(), at(6, 7, 0));
    assert_eq!(columns[5].date(), at(6, 10, 0));
    for (index, column) in columns.iter().enumerate() {
        assert_eq!(column.left(), index as f64 * DEFAULT_COLUMN_WIDTH);
    }
}

fn weekend_cropping_generator(calendar: &Calendar) -> ColumnGenerator<'_> {
    let settings = ColumnSettings {
        display: TimeFramesDisplay::new(TimeFramesMode::Hidden, TimeFramesMode::Cropped),
        magnet: None,
    };
    ColumnGenerator::new(TimeUnit::Day, None, settings).with_calendar(calendar)
}

#[test]
fn end_date_in_cropped_time_is_still_covered() {
    let calendar = weekend_calendar();
    // 2024-06-16 is a Sunday.
    let to = at(6, 16, 12);
    let columns = weekend_cropping_generator(&calendar)
        .generate(at(6, 3, 0), Some(to), None, 0.0, false)
        .expect("bounded generation");

    let last = columns.last().expect("columns generated");
    assert_eq!(last.date(), at(6, 17, 0));
    assert!(last.end_date() >= to);
    assert_eq!(columns.len(), 11);
}

#[test]
fn reverse_end_date_in_cropped_time_reaches_previous_working_day() {
    let calendar = weekend_calendar();
    let columns = weekend_cropping_generator(&calendar)
        .generate(at(6, 10, 0), Some(at(6, 9, 12)), None, 0.0, true)
        .expect("bounded generation");

    assert_eq!(dates(&columns), vec![at(6, 7, 0)]);
    assert_eq!(columns[0].left(), -DEFAULT_COLUMN_WIDTH);
}

#[test]
fn calendar_cropping_everything_stops_generation() {
    let mut calendar = Calendar::new();
    calendar.register_time_frame("closed", TimeFrame::whole_day(false).with_default(true));
    let settings = ColumnSettings {
        display: TimeFramesDisplay::new(TimeFramesMode::Cropped, TimeFramesMode::Cropped),
        magnet: None,
    };

    let columns = ColumnGenerator::new(TimeUnit::Day, None, settings)
        .with_calendar(&calendar)
        .generate(at(1, 1, 0), None, Some(100.0), 0.0, false)
        .expect("bounded generation");
    assert!(columns.is_empty());
}
