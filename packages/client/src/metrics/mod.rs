//! Metrics dashboard: polling, chart data and derived values.

pub mod chart;
pub mod dashboard;
pub mod format;
pub mod poller;
pub mod source;

pub use chart::ChartSeries;
pub use dashboard::{Dashboard, DashboardFrame, Tile};
pub use format::{
    Distribution, active_users_detail, active_users_label, format_byte_rate, format_uptime,
};
pub use poller::{MetricsPoller, PollControl};
pub use source::{HttpMetricsSource, MetricsSource};

pub use cdc_feed_shared::metrics::{MetricsSnapshot, OperationCounts};
