//! Dashboard state: the latest snapshot and the rolling chart.

use cdc_feed_shared::metrics::{MetricsSnapshot, OperationCounts};

use super::{
    chart::ChartSeries,
    format::{
        Distribution, active_users_detail, active_users_label, format_byte_rate, format_uptime,
    },
};

/// One metric tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub label: &'static str,
    pub value: String,
}

/// Everything needed to draw the dashboard once
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardFrame {
    pub tiles: Vec<Tile>,
    pub events24h: OperationCounts,
    pub distribution: Distribution,
    pub users_label: String,
    pub users_detail: String,
    pub chart: ChartSeries,
}

impl DashboardFrame {
    /// Value of the tile with the given label
    pub fn tile(&self, label: &str) -> Option<&str> {
        self.tiles
            .iter()
            .find(|tile| tile.label == label)
            .map(|tile| tile.value.as_str())
    }
}

pub const TILE_CONNECTED_USERS: &str = "Connected users";
pub const TILE_MESSAGES_PER_MINUTE: &str = "Messages/min";
pub const TILE_TOPICS: &str = "Topics";
pub const TILE_CDC_EVENTS_PER_SEC: &str = "CDC events/sec";
pub const TILE_THROUGHPUT: &str = "Throughput";
pub const TILE_TOTAL_MESSAGES: &str = "Total messages";
pub const TILE_UPTIME: &str = "Uptime";

/// Dashboard state kept across view switches.
///
/// Each applied snapshot replaces the previous one and adds one chart point.
#[derive(Debug, Clone)]
pub struct Dashboard {
    snapshot: Option<MetricsSnapshot>,
    chart: ChartSeries,
}

impl Dashboard {
    pub fn new(chart_capacity: usize) -> Self {
        Self {
            snapshot: None,
            chart: ChartSeries::new(chart_capacity),
        }
    }

    pub fn snapshot(&self) -> Option<&MetricsSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn chart(&self) -> &ChartSeries {
        &self.chart
    }

    /// Apply a freshly polled snapshot, labelling its chart point with `label`
    pub fn apply(&mut self, snapshot: MetricsSnapshot, label: String) -> DashboardFrame {
        self.chart.push(label, &snapshot.cdc_events);
        let frame = build_frame(&snapshot, &self.chart);
        self.snapshot = Some(snapshot);
        frame
    }

    /// Frame for the current snapshot, if one has been applied
    pub fn frame(&self) -> Option<DashboardFrame> {
        self.snapshot
            .as_ref()
            .map(|snapshot| build_frame(snapshot, &self.chart))
    }
}

fn build_frame(snapshot: &MetricsSnapshot, chart: &ChartSeries) -> DashboardFrame {
    DashboardFrame {
        tiles: tiles(snapshot),
        events24h: snapshot.events24h,
        distribution: Distribution::from_counts(&snapshot.events24h),
        users_label: active_users_label(snapshot.connected_users),
        users_detail: active_users_detail(&snapshot.active_nicknames),
        chart: chart.clone(),
    }
}

fn tiles(snapshot: &MetricsSnapshot) -> Vec<Tile> {
    vec![
        Tile {
            label: TILE_CONNECTED_USERS,
            value: snapshot.connected_users.to_string(),
        },
        Tile {
            label: TILE_MESSAGES_PER_MINUTE,
            value: format!("{:.1}", snapshot.messages_per_minute),
        },
        Tile {
            label: TILE_TOPICS,
            value: snapshot.topic_count.to_string(),
        },
        Tile {
            label: TILE_CDC_EVENTS_PER_SEC,
            value: format!("{:.2}", snapshot.cdc_events_per_sec),
        },
        Tile {
            label: TILE_THROUGHPUT,
            value: format_byte_rate(snapshot.bytes_per_sec),
        },
        Tile {
            label: TILE_TOTAL_MESSAGES,
            value: snapshot.total_messages.to_string(),
        },
        Tile {
            label: TILE_UPTIME,
            value: format_uptime(snapshot.uptime_seconds),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> MetricsSnapshot {
        MetricsSnapshot {
            connected_users: 2,
            messages_per_minute: 4.0,
            topic_count: 1,
            cdc_events_per_sec: 0.5,
            bytes_per_sec: 2048.0,
            total_messages: 17,
            uptime_seconds: 3_725,
            active_nicknames: vec!["Nightwing".to_string(), "Oracle".to_string()],
            events24h: OperationCounts {
                create: 1,
                update: 1,
                delete: 2,
            },
            cdc_events: OperationCounts {
                create: 3,
                update: 2,
                delete: 1,
            },
        }
    }

    #[test]
    fn test_new_dashboard_has_no_frame() {
        // テスト項目: スナップショット適用前はフレームがない
        // given (前提条件):
        let dashboard = Dashboard::new(20);

        // when (操作):
        let frame = dashboard.frame();

        // then (期待する結果):
        assert!(frame.is_none());
        assert!(dashboard.chart().is_empty());
    }

    #[test]
    fn test_apply_renders_tiles() {
        // テスト項目: スナップショットの値がタイルに反映される
        // given (前提条件):
        let mut dashboard = Dashboard::new(20);

        // when (操作):
        let frame = dashboard.apply(snapshot(), "12:00:00".to_string());

        // then (期待する結果):
        assert_eq!(frame.tile(TILE_CONNECTED_USERS), Some("2"));
        assert_eq!(frame.tile(TILE_MESSAGES_PER_MINUTE), Some("4.0"));
        assert_eq!(frame.tile(TILE_CDC_EVENTS_PER_SEC), Some("0.50"));
        assert_eq!(frame.tile(TILE_THROUGHPUT), Some("2.00 KB/s"));
        assert_eq!(frame.tile(TILE_TOTAL_MESSAGES), Some("17"));
        assert_eq!(frame.tile(TILE_UPTIME), Some("1h 2m"));
        assert_eq!(frame.users_label, "2 users online");
        assert_eq!(frame.users_detail, "Nightwing, Oracle");
        assert!((frame.distribution.delete - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_appends_one_chart_point() {
        // テスト項目: スナップショットごとにチャートへ 1 点追加される
        // given (前提条件):
        let mut dashboard = Dashboard::new(20);

        // when (操作):
        let frame = dashboard.apply(snapshot(), "12:00:00".to_string());

        // then (期待する結果):
        assert_eq!(frame.chart.len(), 1);
        assert_eq!(frame.chart.create()[0], 3);
        assert_eq!(frame.chart.labels()[0], "12:00:00");
    }

    #[test]
    fn test_apply_replaces_previous_snapshot() {
        // テスト項目: 新しいスナップショットが前の値を置き換える
        // given (前提条件):
        let mut dashboard = Dashboard::new(20);
        dashboard.apply(snapshot(), "12:00:00".to_string());

        // when (操作):
        let next = MetricsSnapshot {
            connected_users: 1,
            active_nicknames: vec!["Oracle".to_string()],
            ..snapshot()
        };
        let frame = dashboard.apply(next, "12:00:02".to_string());

        // then (期待する結果):
        assert_eq!(dashboard.snapshot().unwrap().connected_users, 1);
        assert_eq!(frame.users_label, "1 user online");
        assert_eq!(frame.chart.len(), 2);
    }
}
