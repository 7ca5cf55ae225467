use std::ops::Range;

use chrono::TimeDelta;
use tracing::{debug, trace};

use crate::core::{Column, ColumnHeader, Rescalable, TimeUnit, set_columns_width, visible_window};
use crate::error::GanttResult;

use super::{ColumnsEvent, ColumnsManager, ExpandDirection};

const AUTO_EXPAND_HOUR_SCALE_DAYS: i64 = 1;
const AUTO_EXPAND_DAYS: i64 = 31;

impl ColumnsManager {
    /// Refits columns and headers to the available width.
    ///
    /// With a fixed column width, columns keep their nominal geometry.
    pub fn update_columns_meta(&mut self) {
        self.original_width = self
            .columns
            .last()
            .map_or(0.0, |column| column.original_size().right());

        if self.config.column_width.is_none() {
            let available = self.layout.available_width();
            let original = self.original_width;
            if let Some(factor) = set_columns_width(available, original, &mut self.columns) {
                set_columns_width(available, original, &mut self.previous_columns);
                set_columns_width(available, original, &mut self.next_columns);
                for band in self.headers.values_mut() {
                    set_columns_width(available, original, band);
                }
                self.width_factor = factor;
                trace!(available, original, factor, "columns rescaled");
            }
        }

        self.width = self.columns.last().map_or(0.0, Column::right);
        self.update_visible_columns();
        self.emit_columns_event(ColumnsEvent::MetaUpdated { width: self.width });
    }

    /// Recomputes the column and header windows intersecting the scroll viewport.
    ///
    /// An empty viewport shows everything.
    pub fn update_visible_columns(&mut self) {
        let (left, width) = (self.scroll.left, self.scroll.width);
        self.visible_columns = window(&self.columns, left, width, Column::left);
        self.visible_headers = self
            .headers
            .iter()
            .map(|(unit, band)| (*unit, window(band, left, width, ColumnHeader::left)))
            .collect();
    }

    #[must_use]
    pub fn visible_columns(&self) -> &[Column] {
        self.columns
            .get(self.visible_columns.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn visible_columns_range(&self) -> Range<usize> {
        self.visible_columns.clone()
    }

    /// Visible headers of one band.
    #[must_use]
    pub fn visible_headers(&self, unit: TimeUnit) -> &[ColumnHeader] {
        match (self.headers.get(&unit), self.visible_headers.get(&unit)) {
            (Some(band), Some(range)) => band.get(range.clone()).unwrap_or_default(),
            _ => &[],
        }
    }

    #[must_use]
    pub fn active_headers_count(&self) -> usize {
        self.headers.len()
    }

    /// Label format in effect for `unit` headers.
    #[must_use]
    pub fn header_format(&self, unit: TimeUnit) -> &str {
        self.config
            .headers_formats
            .resolve(unit, self.config.view_scale)
    }

    /// Moves the range window past the current edge in `direction`.
    ///
    /// The new window spans one day on the hour scale and 31 days otherwise.
    /// Returns `Ok(false)` when the policy forbids it or no range exists.
    pub fn auto_expand(&mut self, direction: ExpandDirection) -> GanttResult<bool> {
        if !self.config.auto_expand.allows(direction) {
            return Ok(false);
        }
        let edge = match direction {
            ExpandDirection::Left => self.from,
            ExpandDirection::Right => self.to,
        };
        let Some(edge) = edge else {
            return Ok(false);
        };

        let days = if self.config.view_scale == TimeUnit::Hour {
            AUTO_EXPAND_HOUR_SCALE_DAYS
        } else {
            AUTO_EXPAND_DAYS
        };
        let span = TimeDelta::days(days);
        let (from, to) = match direction {
            ExpandDirection::Left => (edge.checked_sub_signed(span), Some(edge)),
            ExpandDirection::Right => (Some(edge), edge.checked_add_signed(span)),
        };
        let (Some(from), Some(to)) = (from, to) else {
            return Ok(false);
        };

        debug!(?direction, %from, %to, "auto expanding range");
        self.config.from_date = Some(from);
        self.config.to_date = Some(to);
        self.generate_columns(None, None)
    }
}

fn window<T>(items: &[T], left: f64, width: f64, key: impl Fn(&T) -> f64) -> Range<usize> {
    if width <= 0.0 {
        return 0..items.len();
    }
    visible_window(items, left, width, key)
}
