//! gantt-axis: time-axis and working-calendar engine for Gantt charts.
//!
//! The crate turns a time range, a working/non-working calendar and a view
//! scale into positioned columns and header bands, and maps dates to
//! positions (and back) including inside cropped non-working time.
//! Rendering and pointer handling stay with the host application.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{ColumnsManager, GanttConfig};
pub use error::{GanttError, GanttResult};
