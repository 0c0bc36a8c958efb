/// Medal glyphs for the first three leaderboard positions.
pub const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

/// Name column width used by padded leaderboard rows.
pub const DEFAULT_NAME_WIDTH: usize = 24;

const ELLIPSIS: &str = "... ";
// Truncated names keep `width - 6` characters before the ellipsis.
const TRUNCATION_MARGIN: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameLayout {
    /// The name as resolved, no decoration.
    Plain,
    /// Fixed-width column for monospace leaderboards.
    Padded { width: usize },
}

impl Default for NameLayout {
    fn default() -> Self {
        Self::Padded {
            width: DEFAULT_NAME_WIDTH,
        }
    }
}

/// Render a leaderboard name for `position`.
///
/// The padded layout truncates long names, pads to `width + 2` characters,
/// indents single-digit positions by one space so they line up with
/// two-digit ones, and puts a medal in front of the top three.
pub fn format_leaderboard_name(username: &str, position: usize, layout: NameLayout) -> String {
    let NameLayout::Padded { width } = layout else {
        return username.to_owned();
    };

    let mut name = if username.chars().count() > width {
        let kept: String = username
            .chars()
            .take(width.saturating_sub(TRUNCATION_MARGIN))
            .collect();
        format!("{kept}{ELLIPSIS}")
    } else {
        username.to_owned()
    };

    let padding = (width + 2).saturating_sub(name.chars().count());
    name.extend(std::iter::repeat_n(' ', padding));

    let mut prefix = String::new();
    if position < 10 {
        prefix.push(' ');
    }
    if let Some(medal) = position.checked_sub(1).and_then(|index| MEDALS.get(index)) {
        prefix.push_str(medal);
    }

    prefix + &name
}

/// Text progress bar such as `[#####-----]`.
pub fn format_progress_bar(current: u64, needed: u64, slots: usize) -> String {
    let filled = if needed == 0 {
        slots
    } else {
        let ratio = current.min(needed) as f64 / needed as f64;
        ((ratio * slots as f64).floor() as usize).min(slots)
    };

    format!("[{}{}]", "#".repeat(filled), "-".repeat(slots - filled))
}

/// Group digits in threes: `1234567` becomes `1,234,567`.
pub fn format_xp(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format seconds into a compact human-readable duration (e.g. 59s, 1m, 1m 5s).
pub fn format_compact_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let parts: Vec<String> = [(hours, "h"), (minutes, "m"), (seconds, "s")]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect();

    if parts.is_empty() {
        "0s".to_owned()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::{
        NameLayout, format_compact_duration, format_leaderboard_name, format_progress_bar,
        format_xp,
    };

    const PADDED: NameLayout = NameLayout::Padded { width: 24 };

    #[test]
    fn plain_layout_is_untouched() {
        assert_eq!(format_leaderboard_name("maple", 1, NameLayout::Plain), "maple");
    }

    #[test]
    fn podium_gets_medals_and_alignment() {
        let first = format_leaderboard_name("alice", 1, PADDED);
        assert_eq!(first, format!(" 🥇alice{}", " ".repeat(21)));

        let third = format_leaderboard_name("carol", 3, PADDED);
        assert!(third.starts_with(" 🥉carol"));

        let fourth = format_leaderboard_name("dave", 4, PADDED);
        assert_eq!(fourth, format!(" dave{}", " ".repeat(22)));
    }

    #[test]
    fn double_digit_positions_are_not_indented() {
        let tenth = format_leaderboard_name("erin", 10, PADDED);
        assert_eq!(tenth, format!("erin{}", " ".repeat(22)));
        assert_eq!(tenth.chars().count(), 26);
    }

    #[test]
    fn long_names_are_truncated() {
        let long = "abcdefghijklmnopqrstuvwxyz0123";
        let rendered = format_leaderboard_name(long, 12, PADDED);
        assert_eq!(rendered, format!("abcdefghijklmnopqr... {}", " ".repeat(4)));

        let exact = "x".repeat(24);
        let rendered = format_leaderboard_name(&exact, 12, PADDED);
        assert_eq!(rendered, format!("{exact}  "));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let name = "é".repeat(30);
        let rendered = format_leaderboard_name(&name, 11, PADDED);
        assert!(rendered.starts_with(&"é".repeat(18)));
        assert_eq!(rendered.chars().count(), 26);
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(format_progress_bar(0, 100, 10), "[----------]");
        assert_eq!(format_progress_bar(55, 100, 10), "[#####-----]");
        assert_eq!(format_progress_bar(250, 100, 10), "[##########]");
        assert_eq!(format_progress_bar(3, 0, 4), "[####]");
    }

    #[test]
    fn xp_grouping() {
        assert_eq!(format_xp(0), "0");
        assert_eq!(format_xp(999), "999");
        assert_eq!(format_xp(1_000), "1,000");
        assert_eq!(format_xp(1_234_567), "1,234,567");
    }

    #[test]
    fn compact_duration_formatting() {
        assert_eq!(format_compact_duration(0), "0s");
        assert_eq!(format_compact_duration(42), "42s");
        assert_eq!(format_compact_duration(60), "1m");
        assert_eq!(format_compact_duration(61), "1m 1s");
        assert_eq!(format_compact_duration(3_605), "1h 5s");
    }
}
