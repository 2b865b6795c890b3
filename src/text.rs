/// Measured text: the lines as laid out plus their bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f64,
    pub height: f64,
}

impl TextBlock {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Measures `text` without wrapping.
pub fn measure_label(text: &str, font_size: f64, line_height: f64) -> TextBlock {
    measure_wrapped(text, font_size, line_height, None)
}

/// Measures `text`, greedily wrapping words so no line exceeds `max_width`
/// when one is given. A single word wider than `max_width` stays on its
/// own line.
pub fn measure_wrapped(
    text: &str,
    font_size: f64,
    line_height: f64,
    max_width: Option<f64>,
) -> TextBlock {
    let mut lines: Vec<String> = split_lines(text)
        .flat_map(|line| match max_width {
            Some(max_width) => wrap_line(line, max_width, font_size),
            None => vec![line.to_owned()],
        })
        .collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    let width = lines
        .iter()
        .map(|line| text_width(line, font_size))
        .fold(0.0, f64::max);
    let height = lines.len() as f64 * font_size * line_height;
    TextBlock {
        lines,
        width,
        height,
    }
}

pub fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().map(char_width_factor).sum::<f64>() * font_size
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim_end)
}

fn wrap_line(line: &str, max_width: f64, font_size: f64) -> Vec<String> {
    if text_width(line, font_size) <= max_width {
        return vec![line.to_string()];
    }

    let space = char_width_factor(' ') * font_size;
    let mut wrapped: Vec<String> = Vec::new();
    let mut used = 0.0;
    for word in line.split_whitespace() {
        let word_width = text_width(word, font_size);
        match wrapped.last_mut() {
            Some(open) if used + space + word_width <= max_width => {
                open.push(' ');
                open.push_str(word);
                used += space + word_width;
            }
            _ => {
                wrapped.push(word.to_owned());
                used = word_width;
            }
        }
    }
    wrapped
}

/// Advance width of `ch` in ems, bucketed by glyph shape.
fn char_width_factor(ch: char) -> f64 {
    const HAIRLINE: f64 = 0.24;
    const NARROW: f64 = 0.32;
    const SLIM: f64 = 0.5;
    const REGULAR: f64 = 0.57;
    const ROUND: f64 = 0.65;
    const BROAD: f64 = 0.74;
    const HEAVY: f64 = 0.9;

    match ch {
        'i' | 'j' | 'l' | 'I' | '\'' => HAIRLINE,
        ' ' | 'f' | 'r' | 't' | '1' => NARROW,
        '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => NARROW,
        'k' | 's' | 'J' | 'L' | '-' | '_' => SLIM,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => HEAVY,
        'C' | 'D' | 'G' | 'H' | 'N' | 'O' | 'Q' | 'U' => BROAD,
        'A'..='Z' | '#' | '&' => ROUND,
        'a'..='z' | '0'..='9' => REGULAR,
        c if c.len_utf8() >= 3 => 1.0,
        _ => REGULAR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales_with_font_size() {
        let w16 = text_width("Hello", 16.0);
        let w32 = text_width("Hello", 32.0);
        assert!((w32 - w16 * 2.0).abs() < 1e-9, "width should double with font size");
    }

    #[test]
    fn height_counts_lines() {
        let block = measure_label("CEO\nteam: core", 20.0, 1.25);
        assert_eq!(block.lines, vec!["CEO", "team: core"]);
        assert!((block.height - 50.0).abs() < 1e-9);
        assert!(block.width > text_width("CEO", 20.0));
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let block = measure_label("", 20.0, 1.25);
        assert_eq!(block.lines, vec![String::new()]);
        assert_eq!(block.width, 0.0);
    }

    #[test]
    fn wraps_long_lines() {
        let block = measure_wrapped(
            "a rather long line that cannot fit inside a node",
            20.0,
            1.25,
            Some(120.0),
        );
        assert!(block.lines.len() > 1, "expected wrapping, got {:?}", block.lines);
        assert!(block.lines.iter().all(|l| !l.is_empty()));
    }
}
