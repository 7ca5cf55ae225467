use std::fmt;
use std::ops::Range;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::{Calendar, Column, ColumnGenerator, ColumnHeader, HeaderGenerator, TimeUnit};
use crate::error::GanttResult;

use super::{
    ColumnsEvent, ColumnsObserver, GanttConfig, LayoutMetrics, NoTasks, ScrollViewport,
    TaskOutOfRange, TaskRangeProvider,
};

/// Owner of the generated time axis.
///
/// Holds the main column range, its lazily generated extensions on both
/// sides, header bands, and the calendar used to resolve working time.
pub struct ColumnsManager {
    pub(super) config: GanttConfig,
    pub(super) layout: LayoutMetrics,
    pub(super) scroll: ScrollViewport,
    pub(super) calendar: Calendar,
    pub(super) task_range: Box<dyn TaskRangeProvider>,
    pub(super) observers: Vec<Box<dyn ColumnsObserver>>,
    pub(super) from: Option<NaiveDateTime>,
    pub(super) to: Option<NaiveDateTime>,
    pub(super) columns: Vec<Column>,
    pub(super) previous_columns: Vec<Column>,
    pub(super) next_columns: Vec<Column>,
    pub(super) headers: IndexMap<TimeUnit, Vec<ColumnHeader>>,
    pub(super) visible_columns: Range<usize>,
    pub(super) visible_headers: IndexMap<TimeUnit, Range<usize>>,
    pub(super) scroll_anchor: Option<NaiveDateTime>,
    pub(super) width: f64,
    pub(super) original_width: f64,
    pub(super) width_factor: f64,
}

impl ColumnsManager {
    /// Validates `config` and generates the initial columns when a range is known.
    pub fn new(config: GanttConfig, calendar: Calendar) -> GanttResult<Self> {
        config.validate()?;
        let mut manager = Self {
            config,
            layout: LayoutMetrics::default(),
            scroll: ScrollViewport::default(),
            calendar,
            task_range: Box::new(NoTasks),
            observers: Vec::new(),
            from: None,
            to: None,
            columns: Vec::new(),
            previous_columns: Vec::new(),
            next_columns: Vec::new(),
            headers: IndexMap::new(),
            visible_columns: 0..0,
            visible_headers: IndexMap::new(),
            scroll_anchor: None,
            width: 0.0,
            original_width: 0.0,
            width_factor: 1.0,
        };
        manager.generate_columns(None, None)?;
        Ok(manager)
    }

    /// Replaces the configuration and regenerates.
    ///
    /// Returns whether columns were generated; when no range can be
    /// determined the previous columns are kept.
    pub fn set_config(&mut self, config: GanttConfig) -> GanttResult<bool> {
        config.validate()?;
        self.config = config;
        self.generate_columns(None, None)
    }

    /// Updates host measurements and refits the columns.
    pub fn set_layout(&mut self, layout: LayoutMetrics) {
        self.layout = layout;
        self.update_columns_meta();
    }

    pub fn set_scroll(&mut self, scroll: ScrollViewport) {
        self.scroll = scroll;
        self.update_visible_columns();
    }

    /// Mutates the calendar, then regenerates the columns.
    pub fn update_calendar<F, T>(&mut self, update: F) -> GanttResult<T>
    where
        F: FnOnce(&mut Calendar) -> T,
    {
        let result = update(&mut self.calendar);
        self.generate_columns(None, None)?;
        Ok(result)
    }

    pub fn set_task_range_provider(
        &mut self,
        provider: Box<dyn TaskRangeProvider>,
    ) -> GanttResult<bool> {
        self.task_range = provider;
        self.generate_columns(None, None)
    }

    /// Regenerates columns and headers for `[from, to]`.
    ///
    /// Missing bounds fall back to the configured range, then to the task
    /// range. Returns `Ok(false)` with state untouched when no range can be
    /// determined.
    pub fn generate_columns(
        &mut self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> GanttResult<bool> {
        let Some(mut from) = from
            .or(self.config.from_date)
            .or_else(|| self.task_range.default_from())
        else {
            debug!("no start date available, columns left untouched");
            return Ok(false);
        };
        let Some(mut to) = to
            .or(self.config.to_date)
            .or_else(|| self.task_range.default_to())
        else {
            debug!("no end date available, columns left untouched");
            return Ok(false);
        };

        if self.config.task_out_of_range == TaskOutOfRange::Expand {
            from = self.task_range.expanded_from(from);
            to = self.task_range.expanded_to(to);
        }

        self.set_scroll_anchor();

        let columns = self
            .generator()
            .generate(from, Some(to), None, 0.0, false)?;
        let units = self.config.header_units();
        let headers = HeaderGenerator::new(
            self.config.view_scale,
            &units,
            &self.config.headers_formats,
        )
        .generate(&columns)?;

        self.from = Some(from);
        self.to = Some(to);
        self.columns = columns;
        self.headers = headers;
        self.previous_columns.clear();
        self.next_columns.clear();
        self.width_factor = 1.0;

        debug!(
            scale = %self.config.view_scale,
            from = %from,
            to = %to,
            columns = self.columns.len(),
            headers = self.headers.len(),
            "columns generated"
        );

        self.update_columns_meta();
        self.emit_columns_event(ColumnsEvent::Generated {
            columns_len: self.columns.len(),
            headers_len: self.headers.len(),
        });
        Ok(true)
    }

    /// Drops every column and header.
    pub fn clear_columns(&mut self) {
        self.set_scroll_anchor();

        self.from = None;
        self.to = None;
        self.columns.clear();
        self.previous_columns.clear();
        self.next_columns.clear();
        self.headers.clear();
        self.visible_columns = 0..0;
        self.visible_headers.clear();
        self.width = 0.0;
        self.original_width = 0.0;
        self.width_factor = 1.0;

        self.emit_columns_event(ColumnsEvent::Cleared);
    }

    /// Remembers the date at the viewport center so hosts can restore scroll
    /// after regeneration.
    fn set_scroll_anchor(&mut self) {
        if self.columns.is_empty() || self.scroll.width <= 0.0 {
            return;
        }
        let center = self.scroll.center();
        self.scroll_anchor = self.get_date_by_position(center, false);
        if self.scroll_anchor.is_none() {
            warn!(center, "scroll viewport center maps to no column");
        }
    }

    pub(super) fn generator(&self) -> ColumnGenerator<'_> {
        ColumnGenerator::new(
            self.config.view_scale,
            self.config.column_width,
            self.config.column_settings(),
        )
        .with_calendar(&self.calendar)
    }

    #[must_use]
    pub fn config(&self) -> &GanttConfig {
        &self.config
    }

    #[must_use]
    pub fn layout(&self) -> LayoutMetrics {
        self.layout
    }

    #[must_use]
    pub fn scroll(&self) -> ScrollViewport {
        self.scroll
    }

    #[must_use]
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    #[must_use]
    pub fn from(&self) -> Option<NaiveDateTime> {
        self.from
    }

    #[must_use]
    pub fn to(&self) -> Option<NaiveDateTime> {
        self.to
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn previous_columns(&self) -> &[Column] {
        &self.previous_columns
    }

    #[must_use]
    pub fn next_columns(&self) -> &[Column] {
        &self.next_columns
    }

    #[must_use]
    pub fn headers(&self) -> &IndexMap<TimeUnit, Vec<ColumnHeader>> {
        &self.headers
    }

    #[must_use]
    pub fn scroll_anchor(&self) -> Option<NaiveDateTime> {
        self.scroll_anchor
    }

    /// Live width of the main column range.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Width of the main column range before rescaling.
    #[must_use]
    pub fn original_width(&self) -> f64 {
        self.original_width
    }

    #[must_use]
    pub fn width_factor(&self) -> f64 {
        self.width_factor
    }
}

impl fmt::Debug for ColumnsManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnsManager")
            .field("config", &self.config)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("columns", &self.columns.len())
            .field("previous_columns", &self.previous_columns.len())
            .field("next_columns", &self.next_columns.len())
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("width", &self.width)
            .field("original_width", &self.original_width)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
