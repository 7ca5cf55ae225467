use thiserror::Error;

use crate::core::TimeUnit;

pub type GanttResult<T> = Result<T, GanttError>;

#[derive(Debug, Error)]
pub enum GanttError {
    #[error("column generation needs either a `to` date or a maximum width")]
    MissingGenerationBound,

    #[error("invalid column width: {0}")]
    InvalidColumnWidth(f64),

    #[error("unknown time unit `{0}`")]
    UnknownTimeUnit(String),

    #[error("invalid column magnet `{0}`: expected `<value> <unit>`")]
    InvalidMagnet(String),

    #[error("invalid header format `{format}` for unit {unit}")]
    InvalidHeaderFormat { unit: TimeUnit, format: String },

    #[error("invalid time of day `{0}`: expected `HH:MM` or `HH:MM:SS`")]
    InvalidTimeOfDay(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
