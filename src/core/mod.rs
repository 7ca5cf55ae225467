pub mod calendar;
pub mod column;
pub mod column_generator;
pub mod day_spans;
pub mod header;
pub mod layout;
pub mod magnet;
pub mod search;
pub mod time_frame;
pub mod time_unit;

pub use calendar::Calendar;
pub use column::{
    Column, ColumnSettings, ColumnTimeFrame, TimeFramesDisplay, TimeFramesMode,
};
pub use column_generator::{ColumnGenerator, DEFAULT_COLUMN_WIDTH};
pub use day_spans::{DaySpan, DaySpans};
pub use header::{ColumnHeader, HeaderFormats, HeaderGenerator, default_header_units, format_label};
pub use layout::{Extent, Rescalable, set_columns_width};
pub use magnet::ColumnMagnet;
pub use search::{Bracket, bracket, bracket_by, visible_window};
pub use time_frame::{
    DateFrame, DateMatcher, ResolvedTimeFrame, TimeFrame, TimeFrameMapping, parse_time_of_day,
};
pub use time_unit::TimeUnit;
