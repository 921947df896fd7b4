//! Simple line-based CLI output utilities.

use unicode_width::UnicodeWidthStr;

use crate::models::{ReviewStatus, Severity};
use crate::notifications::{Notice, NoticeLevel};

/// Line width for separators.
pub const LINE_WIDTH: usize = 60;

/// Width of the bar in [`progress_bar`].
pub const BAR_WIDTH: usize = 24;

/// Print the main header.
///
/// ```text
/// DIAGNOSIS HISTORY
/// ════════════════════════════════════════════════════════════
/// ```
pub fn print_header(title: &str) {
    println!();
    println!("{}", title);
    println!("{}", "═".repeat(LINE_WIDTH));
}

/// Print a section title with a thin rule.
pub fn print_section(title: &str) {
    println!();
    println!("{}", title);
    println!("{}", "─".repeat(LINE_WIDTH));
}

/// Print a status line.
///
/// ```text
///   ✓ Signed in as anna
/// ```
pub fn print_line(icon: &str, message: &str) {
    println!("  {} {}", icon, message);
}

/// Print a labelled value, labels padded to `label_width`.
pub fn print_field(label: &str, value: &str, label_width: usize) {
    let pad = label_width.saturating_sub(label.width());
    println!("  {}:{} {}", label, " ".repeat(pad), value);
}

/// Print a notice with the icon for its level.
pub fn print_notice(notice: &Notice) {
    let icon = match notice.level {
        NoticeLevel::Success => icons::SUCCESS,
        NoticeLevel::Error => icons::FAILURE,
        NoticeLevel::Info => icons::INFO,
    };
    if notice.level == NoticeLevel::Error {
        eprintln!("  {} {}", icon, notice.message);
    } else {
        print_line(icon, &notice.message);
    }
}

/// Render stat cards side by side.
///
/// ```text
/// ┌────────────┐ ┌────────────┐
/// │ Herd size  │ │ Diagnoses  │
/// │ 42         │ │ 17         │
/// └────────────┘ └────────────┘
/// ```
pub fn stat_cards(cards: &[(&str, String)]) -> String {
    let inner = cards
        .iter()
        .map(|(label, value)| label.width().max(value.width()))
        .max()
        .unwrap_or(0)
        + 2;

    let border = |left: &str, right: &str| {
        cards
            .iter()
            .map(|_| format!("{}{}{}", left, "─".repeat(inner), right))
            .collect::<Vec<_>>()
            .join(" ")
    };
    let cells = |texts: Vec<&str>| {
        texts
            .into_iter()
            .map(|text| format!("│ {}{}│", text, " ".repeat(inner - 1 - text.width())))
            .collect::<Vec<_>>()
            .join(" ")
    };

    [
        border("┌", "┐"),
        cells(cards.iter().map(|(label, _)| *label).collect()),
        cells(cards.iter().map(|(_, value)| value.as_str()).collect()),
        border("└", "┘"),
    ]
    .join("\n")
}

/// A bar of `width` cells filled to `ratio` (clamped to [0, 1]).
///
/// ```text
/// ██████████░░░░░░░░░░
/// ```
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (ratio * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Fixed-width severity badge.
pub fn severity_badge(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "[HIGH]",
        Severity::Medium => "[MED] ",
        Severity::Low => "[LOW] ",
        Severity::Unknown => "[ -- ]",
    }
}

/// Icon for a review status.
pub fn review_icon(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::Pending => icons::PENDING,
        ReviewStatus::Approved => icons::SUCCESS,
        ReviewStatus::Edited => icons::EDITED,
        ReviewStatus::Rejected => icons::FAILURE,
    }
}

/// Confidence as `87.5%`, or `-` when missing.
pub fn confidence_label(confidence: Option<f64>) -> String {
    confidence
        .map(|c| format!("{:.1}%", c * 100.0))
        .unwrap_or_else(|| "-".to_string())
}

/// Status icons
pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const FAILURE: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const INFO: &str = "·";
    pub const PENDING: &str = "…";
    pub const EDITED: &str = "✎";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(0.0, 4), "░░░░");
        assert_eq!(progress_bar(1.0, 4), "████");
        assert_eq!(progress_bar(0.5, 4), "██░░");
        assert_eq!(progress_bar(7.0, 4), "████");
        assert_eq!(progress_bar(f64::NAN, 4), "░░░░");
    }

    #[test]
    fn test_stat_cards_align() {
        let out = stat_cards(&[("Herd", "42".to_string()), ("Pending", "3".to_string())]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        let widths: Vec<usize> = lines.iter().map(|l| l.width()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
        assert!(lines[1].contains("Herd"));
        assert!(lines[2].contains("42"));
    }

    #[test]
    fn test_badges_share_width() {
        let widths: Vec<usize> = Severity::ALL.iter().map(|s| severity_badge(*s).width()).collect();
        assert!(widths.iter().all(|w| *w == 6));
    }

    #[test]
    fn test_confidence_label() {
        assert_eq!(confidence_label(Some(0.875)), "87.5%");
        assert_eq!(confidence_label(None), "-");
    }
}
