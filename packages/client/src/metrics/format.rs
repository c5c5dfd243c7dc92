//! Derived values shown on the dashboard.
//!
//! Pure functions over one snapshot.

use cdc_feed_shared::metrics::OperationCounts;

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Separator used in the active-user detail line
pub const NICKNAME_SEPARATOR: &str = ", ";

/// Detail line when nobody is connected
pub const NO_NICKNAMES: &str = "None";

/// Format a byte rate with a unit chosen by magnitude.
///
/// ```
/// use cdc_feed_client::metrics::format_byte_rate;
///
/// assert_eq!(format_byte_rate(512.0), "512 B/s");
/// assert_eq!(format_byte_rate(1536.0), "1.50 KB/s");
/// ```
pub fn format_byte_rate(bytes_per_sec: f64) -> String {
    if bytes_per_sec < KIB {
        format!("{:.0} B/s", bytes_per_sec)
    } else if bytes_per_sec < MIB {
        format!("{:.2} KB/s", bytes_per_sec / KIB)
    } else {
        format!("{:.2} MB/s", bytes_per_sec / MIB)
    }
}

/// Width of each operation bar, as a percentage of the three-way sum
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Distribution {
    pub create: f64,
    pub update: f64,
    pub delete: f64,
}

impl Distribution {
    /// Compute the bars; all three are 0 when there were no operations
    pub fn from_counts(counts: &OperationCounts) -> Self {
        // Summed as f64: counters come off the network and may overflow u64.
        let total = counts.create as f64 + counts.update as f64 + counts.delete as f64;
        if total == 0.0 {
            return Self::default();
        }
        let share = |count: u64| count as f64 / total * 100.0;
        Self {
            create: share(counts.create),
            update: share(counts.update),
            delete: share(counts.delete),
        }
    }

    pub fn sum(&self) -> f64 {
        self.create + self.update + self.delete
    }
}

/// Format an uptime in seconds as "{d}d {h}h", "{h}h {m}m" or "{m}m"
pub fn format_uptime(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Count-based label for the active users tile
pub fn active_users_label(count: u64) -> String {
    match count {
        0 => "No users".to_string(),
        1 => "1 user online".to_string(),
        n => format!("{} users online", n),
    }
}

/// Full nickname list shown as supplementary detail
pub fn active_users_detail(nicknames: &[String]) -> String {
    if nicknames.is_empty() {
        NO_NICKNAMES.to_string()
    } else {
        nicknames.join(NICKNAME_SEPARATOR)
    }
}
