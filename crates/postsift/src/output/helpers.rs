//! Common helper functions for output formatting.

use owo_colors::OwoColorize;
use postsift_query::Verdict;

/// Formats a verdict as `Y` or `N`.
pub fn format_verdict(verdict: Verdict, use_colors: bool) -> String {
    let label = verdict.to_string();
    if !use_colors {
        return label;
    }
    match verdict {
        Verdict::Match => label.green().bold().to_string(),
        Verdict::NoMatch => label.red().to_string(),
    }
}

/// Truncates a string to at most `max_chars` characters.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats `part` of `total` as a percentage with one decimal.
pub fn format_percent(part: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / total as f64)
}
