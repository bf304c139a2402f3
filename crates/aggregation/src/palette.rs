/// Fixed, chart-specific color cycle. Index `i` gets `colors[i % len]`, so
/// colors repeat once a chart has more series than the palette has entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette(&'static [&'static str]);

const FALLBACK_COLOR: &str = "#8884d8";

impl Palette {
    pub const CATEGORY: Palette = Palette(&[
        "#3498db", "#e74c3c", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c", "#e67e22", "#95a5a6",
    ]);
    pub const ACTIONS: Palette = Palette(&["#9b59b6", "#3498db", "#2ecc71", "#e74c3c", "#f39c12"]);
    pub const ACCESS_TREND: Palette =
        Palette(&["#3498db", "#2ecc71", "#e74c3c", "#f39c12", "#9b59b6"]);
    pub const SIGNING_TREND: Palette = Palette(&[
        "#2ecc71", "#3498db", "#e74c3c", "#f39c12", "#9b59b6", "#1abc9c",
    ]);
    pub const SIGNED_STATUS: Palette =
        Palette(&["#2ecc71", "#3498db", "#e74c3c", "#f39c12", "#9b59b6"]);
    pub const PENDING: Palette = Palette(&["#e67e22", "#e74c3c", "#f39c12", "#3498db", "#2ecc71"]);
    pub const TIMES: Palette = Palette(&["#9b59b6", "#ff9800", "#3498db"]);
    pub const ACTIVE_USERS: Palette = Palette(&["#3498db", "#95a5a6"]);
    pub const STAFF_SPEAKING: Palette = Palette(&["#ff9800", "#3498db"]);
    pub const CONSENTS: Palette = Palette(&["#3498db", "#ff9800"]);

    // single-color bar charts
    pub const GREEN: Palette = Palette(&["#2ecc71"]);
    pub const ORANGE: Palette = Palette(&["#f39c12"]);
    pub const PURPLE: Palette = Palette(&["#9b59b6"]);
    pub const BLUE: Palette = Palette(&["#3498db"]);
    pub const RED: Palette = Palette(&["#e74c3c"]);

    pub fn color(&self, index: usize) -> &'static str {
        if self.0.is_empty() {
            return FALLBACK_COLOR;
        }
        self.0[index % self.0.len()]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Axis label for a full name: its last whitespace-delimited token.
///
/// Lossy. Only use it for display, never as a grouping key.
pub fn short_label(name: &str) -> String {
    name.split_whitespace()
        .last()
        .unwrap_or(name)
        .to_string()
}

pub(crate) fn full_label(name: &str) -> String {
    name.to_string()
}
