use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::{
    ColumnMagnet, ColumnSettings, HeaderFormats, TimeFramesDisplay, TimeFramesMode, TimeUnit,
};
use crate::error::{GanttError, GanttResult};

/// What happens to tasks lying outside the configured range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskOutOfRange {
    /// Columns cover the configured range only.
    #[default]
    Truncate,
    /// The range grows to include every task.
    Expand,
}

/// Scroll edges at which the range window may move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoExpand {
    #[default]
    None,
    Left,
    Right,
    Both,
}

impl AutoExpand {
    #[must_use]
    pub fn allows(self, direction: ExpandDirection) -> bool {
        match self {
            Self::None => false,
            Self::Both => true,
            Self::Left => direction == ExpandDirection::Left,
            Self::Right => direction == ExpandDirection::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpandDirection {
    Left,
    Right,
}

/// Time axis configuration.
///
/// Serializable so hosts can persist and reload a chart setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttConfig {
    #[serde(default = "default_view_scale")]
    pub view_scale: TimeUnit,
    /// Fixed nominal column width; `None` fits columns to the available width.
    #[serde(default)]
    pub column_width: Option<f64>,
    /// Header units; `None` uses the defaults of the view scale.
    #[serde(default)]
    pub headers: Option<Vec<TimeUnit>>,
    #[serde(default)]
    pub headers_formats: HeaderFormats,
    #[serde(default = "default_working_mode")]
    pub time_frames_working_mode: TimeFramesMode,
    #[serde(default = "default_non_working_mode")]
    pub time_frames_non_working_mode: TimeFramesMode,
    #[serde(default = "default_column_magnet")]
    pub column_magnet: Option<ColumnMagnet>,
    #[serde(default)]
    pub from_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub to_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub task_out_of_range: TaskOutOfRange,
    #[serde(default)]
    pub auto_expand: AutoExpand,
}

impl Default for GanttConfig {
    fn default() -> Self {
        Self {
            view_scale: default_view_scale(),
            column_width: None,
            headers: None,
            headers_formats: HeaderFormats::default(),
            time_frames_working_mode: default_working_mode(),
            time_frames_non_working_mode: default_non_working_mode(),
            column_magnet: default_column_magnet(),
            from_date: None,
            to_date: None,
            task_out_of_range: TaskOutOfRange::default(),
            auto_expand: AutoExpand::default(),
        }
    }
}

impl GanttConfig {
    #[must_use]
    pub fn new(view_scale: TimeUnit) -> Self {
        Self {
            view_scale,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_view_scale(mut self, view_scale: TimeUnit) -> Self {
        self.view_scale = view_scale;
        self
    }

    #[must_use]
    pub fn with_column_width(mut self, column_width: Option<f64>) -> Self {
        self.column_width = column_width;
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: Vec<TimeUnit>) -> Self {
        self.headers = Some(headers);
        self
    }

    #[must_use]
    pub fn with_header_format(mut self, unit: TimeUnit, format: impl Into<String>) -> Self {
        self.headers_formats.set(unit, format);
        self
    }

    #[must_use]
    pub fn with_time_frames_modes(
        mut self,
        working: TimeFramesMode,
        non_working: TimeFramesMode,
    ) -> Self {
        self.time_frames_working_mode = working;
        self.time_frames_non_working_mode = non_working;
        self
    }

    #[must_use]
    pub fn with_column_magnet(mut self, magnet: Option<ColumnMagnet>) -> Self {
        self.column_magnet = magnet;
        self
    }

    #[must_use]
    pub fn with_range(mut self, from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Self {
        self.from_date = from;
        self.to_date = to;
        self
    }

    #[must_use]
    pub fn with_task_out_of_range(mut self, policy: TaskOutOfRange) -> Self {
        self.task_out_of_range = policy;
        self
    }

    #[must_use]
    pub fn with_auto_expand(mut self, policy: AutoExpand) -> Self {
        self.auto_expand = policy;
        self
    }

    #[must_use]
    pub fn display(&self) -> TimeFramesDisplay {
        TimeFramesDisplay::new(self.time_frames_working_mode, self.time_frames_non_working_mode)
    }

    #[must_use]
    pub fn column_settings(&self) -> ColumnSettings {
        ColumnSettings {
            display: self.display(),
            magnet: self.column_magnet,
        }
    }

    /// Header units in display order.
    #[must_use]
    pub fn header_units(&self) -> Vec<TimeUnit> {
        match &self.headers {
            Some(headers) => headers.clone(),
            None => crate::core::default_header_units(self.view_scale),
        }
    }

    pub fn validate(&self) -> GanttResult<()> {
        if let Some(width) = self.column_width
            && (!width.is_finite() || width <= 0.0)
        {
            return Err(GanttError::InvalidColumnWidth(width));
        }
        if let (Some(from), Some(to)) = (self.from_date, self.to_date)
            && to < from
        {
            return Err(GanttError::InvalidData(format!(
                "range ends ({to}) before it starts ({from})"
            )));
        }
        self.headers_formats.validate()
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(&self) -> GanttResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GanttError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> GanttResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| GanttError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_view_scale() -> TimeUnit {
    TimeUnit::Day
}

fn default_working_mode() -> TimeFramesMode {
    TimeFramesMode::Hidden
}

fn default_non_working_mode() -> TimeFramesMode {
    TimeFramesMode::Visible
}

fn default_column_magnet() -> Option<ColumnMagnet> {
    Some(ColumnMagnet::new(15, TimeUnit::Minute))
}

/// Host layout measurements that drive column fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub element_width: f64,
    #[serde(default)]
    pub labels_width: f64,
    #[serde(default = "default_show_labels_column")]
    pub show_labels_column: bool,
    #[serde(default)]
    pub max_height: f64,
    #[serde(default)]
    pub scroll_bar_width: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            element_width: 0.0,
            labels_width: 0.0,
            show_labels_column: default_show_labels_column(),
            max_height: 0.0,
            scroll_bar_width: 0.0,
        }
    }
}

impl LayoutMetrics {
    #[must_use]
    pub fn new(element_width: f64) -> Self {
        Self {
            element_width,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_labels(mut self, labels_width: f64, show_labels_column: bool) -> Self {
        self.labels_width = labels_width;
        self.show_labels_column = show_labels_column;
        self
    }

    #[must_use]
    pub fn with_max_height(mut self, max_height: f64, scroll_bar_width: f64) -> Self {
        self.max_height = max_height;
        self.scroll_bar_width = scroll_bar_width;
        self
    }

    /// Width left for columns once labels and the vertical scroll bar are removed.
    #[must_use]
    pub fn available_width(&self) -> f64 {
        let mut width = self.element_width;
        if self.show_labels_column {
            width -= self.labels_width;
        }
        if self.max_height > 0.0 {
            width -= self.scroll_bar_width;
        }
        width
    }
}

fn default_show_labels_column() -> bool {
    true
}

/// Horizontal scroll viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollViewport {
    pub left: f64,
    pub width: f64,
}

impl ScrollViewport {
    #[must_use]
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    #[must_use]
    pub fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }
}
