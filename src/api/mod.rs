mod calendar_config;
mod columns_layout;
mod columns_lookup;
mod columns_manager;
mod config;
mod observer_dispatch;
mod observer_registry;
mod providers;
mod snapshot;

pub use calendar_config::{CalendarConfig, DateFrameConfig};
pub use columns_manager::ColumnsManager;
pub use config::{
    AutoExpand, ExpandDirection, GanttConfig, LayoutMetrics, ScrollViewport, TaskOutOfRange,
};
pub use providers::{
    ColumnsContext, ColumnsEvent, ColumnsObserver, NoTasks, TaskRangeProvider, TaskSpans,
};
pub use snapshot::{ColumnGeometry, ColumnsSnapshot, HeaderGeometry, TimeFrameGeometry};
