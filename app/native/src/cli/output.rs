//! CLI output formatting.

use std::fmt::Write;

use colored::Colorize;

/// Prints a value as pretty JSON with syntax highlighting.
pub fn print_highlighted_json(value: &serde_json::Value) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{}", highlight_json(&json));
}

/// Colours pretty-printed JSON.
///
/// Keys are cyan, string values green, numbers yellow, booleans and null
/// magenta. Punctuation is left plain.
#[must_use]
pub fn highlight_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len() * 2);
    let mut chars = json.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        match ch {
            '"' => {
                let mut end = start + 1;
                let mut escaped = false;
                for (idx, c) in chars.by_ref() {
                    end = idx + c.len_utf8();
                    if escaped {
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == '"' {
                        break;
                    }
                }
                let literal = &json[start..end];
                let is_key = json[end..].trim_start().starts_with(':');
                let _ = if is_key {
                    write!(out, "{}", literal.cyan())
                } else {
                    write!(out, "{}", literal.green())
                };
            }
            c if c == '-' || c.is_ascii_digit() || c.is_ascii_alphabetic() => {
                let mut end = start + c.len_utf8();
                while let Some(&(idx, next)) = chars.peek() {
                    if next == '"' || next == ',' || next.is_whitespace() || "{}[]:".contains(next) {
                        break;
                    }
                    end = idx + next.len_utf8();
                    chars.next();
                }
                let literal = &json[start..end];
                let _ = match literal {
                    "true" | "false" | "null" => write!(out, "{}", literal.magenta()),
                    _ if literal.parse::<f64>().is_ok() => write!(out, "{}", literal.yellow()),
                    _ => write!(out, "{literal}"),
                };
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Formats a boolean as a coloured check mark or cross.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value { "✓".green().to_string() } else { "✗".red().to_string() }
}
