//! Terminal rendering using ratatui.
//!
//! Each view has its own module; [`common`] holds the header, tab bar,
//! status bar, and help overlay shared by all views.

pub mod automation;
pub mod common;
pub mod detail;
pub mod freshness;
pub mod overview;
pub mod theme;

pub use theme::Theme;

/// Sparkline characters (8 levels of height).
pub(crate) const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render a sparkline string from normalized 0-7 values (last 8 shown).
pub(crate) fn render_sparkline(data: &[u8]) -> String {
    if data.is_empty() {
        return "        ".to_string(); // 8 spaces placeholder
    }

    let values: Vec<u8> = data.iter().rev().take(8).rev().copied().collect();

    values.iter().map(|&v| SPARKLINE_CHARS[v.min(7) as usize]).collect()
}

/// Format large numbers with K/M suffixes
pub(crate) fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234), "1.2K");
        assert_eq!(format_count(2_500_000), "2.5M");
    }

    #[test]
    fn test_render_sparkline_takes_last_eight() {
        let data = vec![0, 1, 2, 3, 4, 5, 6, 7, 7, 7];
        let line = render_sparkline(&data);
        assert_eq!(line.chars().count(), 8);
        assert!(line.ends_with("██"));
    }

    #[test]
    fn test_render_sparkline_empty() {
        assert_eq!(render_sparkline(&[]), "        ");
    }
}
