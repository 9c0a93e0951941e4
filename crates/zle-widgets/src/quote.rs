//! Quoting for listing output.

/// Characters that make a word need quoting when read back by the shell.
const SPECIAL: &str = "|&;<>()$`\\\"' \t\n*?[]#~=%{}!^";

/// Quote `word` so the shell reads it back unchanged. Words without
/// special characters are returned as they are.
pub fn quote(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }
    if !word.chars().any(|c| SPECIAL.contains(c) || c.is_control()) {
        return word.to_string();
    }
    let mut out = String::with_capacity(word.len() + 2);
    out.push('\'');
    for c in word.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// Make control characters visible as `^X`, for human-oriented output.
pub fn nice(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    for c in word.chars() {
        match c {
            '\x7f' => out.push_str("^?"),
            c if (c as u32) < 0x20 => {
                out.push('^');
                out.push(char::from(c as u8 + b'@'));
            }
            c => out.push(c),
        }
    }
    out
}
