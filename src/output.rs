/// How to print results instead of handing them to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    Lines,
    Null,
    ShellQuoted,
}

pub fn render(paths: &[String], mode: PrintMode) -> String {
    match mode {
        PrintMode::Lines => paths.join("\n"),
        PrintMode::Null => paths.join("\0"),
        PrintMode::ShellQuoted => paths
            .iter()
            .map(|p| sh_quote(p))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

const SAFE_CHARS: &str = "!@%_-+=:,./";
const DOUBLE_QUOTE_SPECIALS: &[char] = &['"', '`', '$', '\\'];

/// Quote `s` as a single argument for `/bin/sh`.
pub fn sh_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if s.chars()
        .all(|c| c.is_ascii_alphanumeric() || SAFE_CHARS.contains(c))
    {
        return s.to_string();
    }
    if !s.contains('\'') {
        return format!("'{}'", s);
    }

    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        if DOUBLE_QUOTE_SPECIALS.contains(&c) {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
