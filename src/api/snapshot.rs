use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Column, ColumnHeader, TimeUnit};
use crate::error::{GanttError, GanttResult};

use super::ColumnsManager;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeFrameGeometry {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub working: bool,
    pub hidden: bool,
    pub cropped: bool,
    pub left: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnGeometry {
    pub date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub left: f64,
    pub width: f64,
    pub time_frames: Vec<TimeFrameGeometry>,
}

impl From<&Column> for ColumnGeometry {
    fn from(column: &Column) -> Self {
        Self {
            date: column.date(),
            end_date: column.end_date(),
            left: column.left(),
            width: column.width(),
            time_frames: column
                .time_frames()
                .iter()
                .map(|frame| {
                    let extent = column.time_frame_extent(frame);
                    TimeFrameGeometry {
                        start: frame.start(),
                        end: frame.end(),
                        working: frame.working(),
                        hidden: frame.hidden,
                        cropped: frame.cropped,
                        left: extent.left,
                        width: extent.width,
                    }
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderGeometry {
    pub date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub label: String,
    pub left: f64,
    pub width: f64,
}

impl From<&ColumnHeader> for HeaderGeometry {
    fn from(header: &ColumnHeader) -> Self {
        Self {
            date: header.date(),
            end_date: header.end_date(),
            label: header.label().to_owned(),
            left: header.left(),
            width: header.width(),
        }
    }
}

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnsSnapshot {
    pub view_scale: TimeUnit,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub width: f64,
    pub original_width: f64,
    pub width_factor: f64,
    pub columns: Vec<ColumnGeometry>,
    pub headers: IndexMap<TimeUnit, Vec<HeaderGeometry>>,
    pub visible_columns: (usize, usize),
}

impl ColumnsSnapshot {
    pub fn to_json_pretty(&self) -> GanttResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GanttError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}

impl ColumnsManager {
    #[must_use]
    pub fn snapshot(&self) -> ColumnsSnapshot {
        ColumnsSnapshot {
            view_scale: self.config.view_scale,
            from: self.from,
            to: self.to,
            width: self.width,
            original_width: self.original_width,
            width_factor: self.width_factor,
            columns: self.columns.iter().map(ColumnGeometry::from).collect(),
            headers: self
                .headers
                .iter()
                .map(|(unit, band)| (*unit, band.iter().map(HeaderGeometry::from).collect()))
                .collect(),
            visible_columns: (self.visible_columns.start, self.visible_columns.end),
        }
    }
}
