// src/utils/wrap.rs

pub const DEFAULT_WRAP_WIDTH: usize = 80;

/// Resolves the configured wrap length, falling back to 80 for anything that
/// is not a positive integer.
pub fn wrap_width(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|&width| width > 0)
        .unwrap_or(DEFAULT_WRAP_WIDTH)
}

/// Greedy word wrap. Words are never split, so a word longer than `width`
/// sits alone on its line. The last line is always emitted.
pub fn wrap(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_line.is_empty() {
            current_line.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line.push_str(word);
            current_len = word_len;
        }
    }
    lines.push(current_line);

    lines.join("\n")
}
