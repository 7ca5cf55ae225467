use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ExpandDirection;

/// Source of the date range spanned by the chart's tasks.
///
/// Used when no explicit range is configured, and to widen the range when
/// out-of-range tasks expand it.
pub trait TaskRangeProvider {
    /// Earliest task start, if any task exists.
    fn default_from(&self) -> Option<NaiveDateTime>;

    /// Latest task end, if any task exists.
    fn default_to(&self) -> Option<NaiveDateTime>;

    fn expanded_from(&self, from: NaiveDateTime) -> NaiveDateTime {
        self.default_from().map_or(from, |task_from| task_from.min(from))
    }

    fn expanded_to(&self, to: NaiveDateTime) -> NaiveDateTime {
        self.default_to().map_or(to, |task_to| task_to.max(to))
    }
}

/// Provider for charts without tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTasks;

impl TaskRangeProvider for NoTasks {
    fn default_from(&self) -> Option<NaiveDateTime> {
        None
    }

    fn default_to(&self) -> Option<NaiveDateTime> {
        None
    }
}

/// Plain list of task `[from, to]` spans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSpans {
    spans: Vec<(NaiveDateTime, NaiveDateTime)>,
}

impl TaskSpans {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a span; reversed bounds are swapped.
    pub fn push(&mut self, from: NaiveDateTime, to: NaiveDateTime) {
        self.spans.push((from.min(to), from.max(to)));
    }

    #[must_use]
    pub fn with_span(mut self, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        self.push(from, to);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

impl FromIterator<(NaiveDateTime, NaiveDateTime)> for TaskSpans {
    fn from_iter<I: IntoIterator<Item = (NaiveDateTime, NaiveDateTime)>>(iter: I) -> Self {
        let mut spans = Self::new();
        for (from, to) in iter {
            spans.push(from, to);
        }
        spans
    }
}

impl TaskRangeProvider for TaskSpans {
    fn default_from(&self) -> Option<NaiveDateTime> {
        self.spans.iter().map(|(from, _)| *from).min()
    }

    fn default_to(&self) -> Option<NaiveDateTime> {
        self.spans.iter().map(|(_, to)| *to).max()
    }
}

/// Read-only state snapshot passed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnsContext {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub columns_len: usize,
    pub previous_columns_len: usize,
    pub next_columns_len: usize,
    pub width: f64,
    pub original_width: f64,
    pub width_factor: f64,
}

/// Notifications raised by the columns manager.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColumnsEvent {
    Generated {
        columns_len: usize,
        headers_len: usize,
    },
    Cleared,
    MetaUpdated {
        width: f64,
    },
    Extended {
        direction: ExpandDirection,
        columns_len: usize,
    },
}

/// Hook interface for hosts that react to column changes.
pub trait ColumnsObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: ColumnsEvent, context: ColumnsContext);
}
