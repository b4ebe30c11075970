use colored::Colorize;
use std::io::{self, Write};

/// Width of the banner border, in characters.
pub const BANNER_WIDTH: usize = 60;

/// Renders a three line banner: border, centered title, border. No color.
pub fn render_header(text: &str) -> String {
    let border = "=".repeat(BANNER_WIDTH);
    format!("{border}\n{text:^width$}\n{border}", width = BANNER_WIDTH)
}

/// Writes a section banner preceded by a blank line.
pub fn write_header<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", render_header(text).bright_blue().bold())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_has_fixed_width_borders_and_centered_title() {
        let banner = render_header("Install Fonts");
        let lines: Vec<_> = banner.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "=".repeat(BANNER_WIDTH));
        assert_eq!(lines[2], lines[0]);
        assert_eq!(lines[1].len(), BANNER_WIDTH);
        assert_eq!(lines[1].trim(), "Install Fonts");
    }

    #[test]
    fn long_titles_are_not_truncated() {
        let title = "x".repeat(BANNER_WIDTH + 5);
        assert!(render_header(&title).contains(&title));
    }

    #[test]
    fn write_header_contains_title() {
        let mut buf = Vec::new();
        write_header(&mut buf, "Install Shell").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Install Shell"));
        assert!(text.contains(&"=".repeat(BANNER_WIDTH)));
    }
}
