//! Text rendering of client screens.

use cdc_feed_shared::time::{timestamp_to_local_rfc3339, timestamp_to_local_time};

use crate::{
    app::Screen,
    connection::StatusIndicator,
    metrics::{ChartSeries, DashboardFrame, Distribution},
    router::{DisplayMessage, WELCOME_MESSAGE},
    session::ClientId,
};

const RULE: &str = "============================================================";
const BAR_WIDTH: usize = 30;
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Screen formatter for terminal display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Render any screen produced by the application
    pub fn format_screen(screen: &Screen) -> String {
        match screen {
            Screen::Status { indicator, text } => Self::format_status(*indicator, text),
            Screen::Handshake { error } => Self::format_handshake(error.as_deref()),
            Screen::Message { message, count } => Self::format_feed_entry(message, *count),
            Screen::Feed {
                recent,
                placeholder,
                total,
            } => Self::format_feed(recent, *placeholder, *total),
            Screen::Dashboard(frame) => Self::format_dashboard(frame),
            Screen::DashboardPending => {
                "\nDashboard: waiting for the first metrics snapshot...\n".to_string()
            }
            Screen::Help => Self::format_help(),
            Screen::Info(text) => format!("{}\n", text),
        }
    }

    /// Format the session banner printed once at startup
    ///
    /// # Arguments
    ///
    /// * `client_id` - The session's client identifier
    /// * `started_at` - Unix timestamp of the start (milliseconds)
    pub fn format_banner(client_id: ClientId, started_at: i64) -> String {
        format!(
            "{}\nCDC feed client {} started at {}\nType /help for commands. Press Ctrl+D to exit.\n{}\n",
            RULE,
            client_id,
            timestamp_to_local_rfc3339(started_at),
            RULE
        )
    }

    /// Format a status indicator update, e.g. `[connected] Connected`
    pub fn format_status(indicator: StatusIndicator, text: &str) -> String {
        format!("[{}] {}\n", indicator.as_str(), text)
    }

    /// Format the nickname prompt with its inline error
    pub fn format_handshake(error: Option<&str>) -> String {
        match error {
            Some(error) => format!("Enter a nickname\n  ! {}\n", error),
            None => "Enter a nickname\n".to_string(),
        }
    }

    /// Format one feed entry
    ///
    /// # Arguments
    ///
    /// * `message` - The rendered entry
    /// * `count` - Running message count, for counted entries
    ///
    /// # Returns
    ///
    /// `HH:MM:SS  LABEL  text  (#count)`, without the count for system notices
    pub fn format_feed_entry(message: &DisplayMessage, count: Option<u64>) -> String {
        let time = timestamp_to_local_time(message.timestamp);
        let label = message.category.label();
        match count {
            Some(count) => format!("{}  {}  {}  (#{})\n", time, label, message.text, count),
            None => format!("{}  {}  {}\n", time, label, message.text),
        }
    }

    /// Format the feed view: the placeholder, or recent entries oldest first
    pub fn format_feed(recent: &[DisplayMessage], placeholder: bool, total: u64) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\nFeed ({} messages)\n", RULE, total));

        if placeholder {
            output.push_str(WELCOME_MESSAGE);
            output.push('\n');
        }
        for message in recent.iter().rev() {
            output.push_str(&Self::format_feed_entry(message, None));
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format a full dashboard frame
    pub fn format_dashboard(frame: &DashboardFrame) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\nDashboard\n{}\n", RULE, RULE));

        for tile in &frame.tiles {
            output.push_str(&format!("{:<16}{}\n", tile.label, tile.value));
        }

        output.push_str("\nOperations (24h)\n");
        output.push_str(&Self::format_distribution(
            &frame.distribution,
            frame.events24h.create,
            frame.events24h.update,
            frame.events24h.delete,
        ));

        output.push_str(&format!(
            "\nUsers: {} ({})\n",
            frame.users_label, frame.users_detail
        ));

        output.push_str("\nCDC events\n");
        output.push_str(&Self::format_chart(&frame.chart));
        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format the three percentage bars
    pub fn format_distribution(
        distribution: &Distribution,
        create: u64,
        update: u64,
        delete: u64,
    ) -> String {
        [
            ("CREATE", distribution.create, create),
            ("UPDATE", distribution.update, update),
            ("DELETE", distribution.delete, delete),
        ]
        .iter()
        .map(|(label, percent, count)| {
            format!(
                "{:<8}{:<width$} {:>5.1}% ({})\n",
                label,
                bar(*percent),
                percent,
                count,
                width = BAR_WIDTH
            )
        })
        .collect()
    }

    /// Format the rolling chart as one sparkline per operation
    pub fn format_chart(chart: &ChartSeries) -> String {
        if chart.is_empty() {
            return "(no data yet)\n".to_string();
        }

        let max = chart.max_value();
        let mut output = String::new();
        for (label, series) in [
            ("CREATE", chart.create()),
            ("UPDATE", chart.update()),
            ("DELETE", chart.delete()),
        ] {
            let line: String = series.iter().map(|value| spark(*value, max)).collect();
            output.push_str(&format!("{:<8}{}\n", label, line));
        }

        if let (Some(first), Some(last)) = (chart.labels().front(), chart.labels().back()) {
            output.push_str(&format!("{:<8}{} .. {}\n", "", first, last));
        }
        output
    }

    pub fn format_help() -> String {
        "\nCommands:\n  \
         /dashboard  show the metrics dashboard\n  \
         /feed       show the event feed\n  \
         /nick       change nickname (reconnects)\n  \
         /help       show this help\n  \
         /quit       exit\n\
         Any other line is sent to the server.\n"
            .to_string()
    }
}

fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled.min(BAR_WIDTH))
}

fn spark(value: u64, max: u64) -> char {
    if max == 0 {
        return SPARK_LEVELS[0];
    }
    let top = SPARK_LEVELS.len() - 1;
    let level = (value as f64 / max as f64 * top as f64).round() as usize;
    SPARK_LEVELS[level.min(top)]
}
