//! Status icons for CLI output

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    /// Success icon (all replicas available)
    pub const SUCCESS: &'static str = "✓";

    /// Warning icon (partial replicas available)
    pub const WARNING: &'static str = "⚠";

    /// Error icon (no replicas available)
    pub const ERROR: &'static str = "✗";

    /// Stopped icon (scaled to zero)
    pub const STOPPED: &'static str = "■";

    /// Get status icon based on available/desired replicas
    pub fn get_replica_icon(available: i32, desired: i32) -> &'static str {
        if desired == 0 {
            Self::STOPPED
        } else if available >= desired {
            Self::SUCCESS
        } else if available > 0 {
            Self::WARNING
        } else {
            Self::ERROR
        }
    }

    /// Get status text based on available/desired replicas
    pub fn get_status_text(available: i32, desired: i32) -> &'static str {
        if desired == 0 {
            "Stopped"
        } else if available >= desired {
            "Running"
        } else if available > 0 {
            "Degraded"
        } else {
            "Failed"
        }
    }

    pub fn get_health_icon(status: &str) -> &'static str {
        match status {
            "ok" => Self::SUCCESS,
            "warning" => Self::WARNING,
            _ => Self::ERROR,
        }
    }
}
