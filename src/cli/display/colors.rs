//! Color theme for CLI output

use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Get color based on replica availability; scaled-to-zero is muted
    pub fn get_replica_color(&self, available: i32, desired: i32) -> TableColor {
        if desired == 0 {
            self.muted
        } else if available >= desired {
            self.success
        } else if available > 0 {
            self.warning
        } else {
            self.error
        }
    }

    pub fn get_health_color(&self, status: &str) -> TableColor {
        match status {
            "ok" => self.success,
            "warning" => self.warning,
            _ => self.error,
        }
    }
}
