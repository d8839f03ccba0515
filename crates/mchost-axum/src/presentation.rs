//! HTML fragments rendered for the web panel.

use mchost_core::ServerStatus;

/// Tailwind colour used for each status badge.
const fn badge_color(status: ServerStatus) -> &'static str {
    match status {
        ServerStatus::Running => "green",
        ServerStatus::Starting => "blue",
        ServerStatus::Stopping => "yellow",
        ServerStatus::Stopped => "red",
    }
}

/// Render the status badge shown by the panel and pushed over SSE.
pub fn status_badge(status: ServerStatus) -> String {
    let color = badge_color(status);
    format!(
        r#"<span class="px-2 py-1 bg-{color}-100 text-{color}-800 rounded-full">{status}</span>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_badge() {
        assert_eq!(
            status_badge(ServerStatus::Running),
            r#"<span class="px-2 py-1 bg-green-100 text-green-800 rounded-full">Running</span>"#
        );
    }

    #[test]
    fn test_badge_colors() {
        assert!(status_badge(ServerStatus::Starting).contains("bg-blue-100 text-blue-800"));
        assert!(status_badge(ServerStatus::Stopping).contains("bg-yellow-100"));
        assert!(status_badge(ServerStatus::Stopped).ends_with(">Stopped</span>"));
    }
}
