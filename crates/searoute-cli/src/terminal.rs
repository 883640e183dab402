//! ANSI styling for text output.

/// Escape sequences used by the text renderers.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    /// Reverse-video tags in front of each waypoint.
    pub const TAG_ORIGIN: &str = "\x1b[1;7;32m";
    pub const TAG_WAYPOINT: &str = "\x1b[1;7;36m";
    pub const TAG_DESTINATION: &str = "\x1b[1;7;35m";
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    pub const GRAY: &str = "\x1b[90m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const BLUE: &str = "\x1b[34m";
}

/// Escape sequences for one render, empty when color is off.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_origin: &'static str,
    pub tag_waypoint: &'static str,
    pub tag_destination: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
    pub blue: &'static str,
}

impl ColorPalette {
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_origin: colors::TAG_ORIGIN,
            tag_waypoint: colors::TAG_WAYPOINT,
            tag_destination: colors::TAG_DESTINATION,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            green: colors::GREEN,
            blue: colors::BLUE,
        }
    }

    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_origin: "",
            tag_waypoint: "",
            tag_destination: "",
            white_bold: "",
            gray: "",
            cyan: "",
            green: "",
            blue: "",
        }
    }

    /// Palette for the current process environment.
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some();
        let term = std::env::var("TERM").ok();
        if color_enabled(no_color, term.as_deref()) {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

/// Color is on unless `NO_COLOR` is set (<https://no-color.org/>) or the
/// terminal is `dumb`.
pub fn color_enabled(no_color: bool, term: Option<&str>) -> bool {
    !no_color && !term.is_some_and(|term| term.eq_ignore_ascii_case("dumb"))
}

/// Group the digits of `n` in thousands, e.g. `19,018`.
///
/// ```
/// # use searoute_cli::terminal::format_with_separators;
/// assert_eq!(format_with_separators(12_328), "12,328");
/// ```
pub fn format_with_separators(n: u64) -> String {
    let digits = n.to_string();
    let lead = match digits.len() % 3 {
        0 => 3,
        rem => rem,
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    grouped.push_str(&digits[..lead]);
    for group in digits.as_bytes()[lead..].chunks(3) {
        grouped.push(',');
        grouped.extend(group.iter().map(|&b| char::from(b)));
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits_in_thousands() {
        assert_eq!(format_with_separators(0), "0");
        assert_eq!(format_with_separators(999), "999");
        assert_eq!(format_with_separators(1_000), "1,000");
        assert_eq!(format_with_separators(19_018), "19,018");
        assert_eq!(format_with_separators(123_456_789), "123,456,789");
        assert_eq!(
            format_with_separators(u64::MAX),
            "18,446,744,073,709,551,615"
        );
    }

    #[test]
    fn color_follows_no_color_and_dumb_terminals() {
        assert!(color_enabled(false, Some("xterm-256color")));
        assert!(color_enabled(false, None));
        assert!(!color_enabled(true, Some("xterm-256color")));
        assert!(!color_enabled(false, Some("DUMB")));
    }

    #[test]
    fn plain_palette_emits_no_escapes() {
        let plain = ColorPalette::plain();
        assert!(plain.reset.is_empty() && plain.green.is_empty());
        assert_eq!(ColorPalette::colored().green, colors::GREEN);
    }
}
