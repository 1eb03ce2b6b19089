//! Turning Dyxless responses into cell text and chat replies.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use dyxless_client::{QueryResponse, Record};
use regex::Regex;
use serde_json::Value;
use teloxide::utils::html;

/// Telegram's maximum message length.
pub const MESSAGE_LIMIT: usize = 4096;

const TABLE_NAME_KEY: &str = "table_name";
const UNKNOWN_TABLE: &str = "Неизвестно";
const LIST_PREVIEW: usize = 3;

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"[+]?[7-8][\d\s\-\(\)]{10,}").expect("phone regex is valid"))
}

/// A 10-digit (organisation) or 12-digit (individual) taxpayer number.
pub fn is_inn(s: &str) -> bool {
    (s.len() == 10 || s.len() == 12) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Null, false, 0, and empty strings/lists/objects are "empty" and skipped in output.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn table_name(record: &Record) -> String {
    record
        .get(TABLE_NAME_KEY)
        .filter(|v| is_present(v))
        .map(display_value)
        .unwrap_or_else(|| UNKNOWN_TABLE.to_string())
}

/// Non-empty fields other than `table_name`, in response order.
fn fields(record: &Record) -> impl Iterator<Item = (&String, &Value)> {
    record
        .iter()
        .filter(|(key, value)| key.as_str() != TABLE_NAME_KEY && is_present(value))
}

/// First three list items joined by `", "`, followed by `suffix(rest)` when more remain.
fn list_preview(items: &[Value], suffix: impl Fn(usize) -> String) -> String {
    let mut out = items
        .iter()
        .take(LIST_PREVIEW)
        .map(display_value)
        .collect::<Vec<_>>()
        .join(", ");
    if items.len() > LIST_PREVIEW {
        out.push_str(&suffix(items.len() - LIST_PREVIEW));
    }
    out
}

/// All phone numbers in a response: values of `*phone*`/`*телефон*` keys plus phone-like substrings
/// of long string values. Sorted, de-duplicated, joined by `", "`. Empty when nothing was found.
pub fn extract_phones(response: &QueryResponse) -> String {
    if !response.has_results() {
        return String::new();
    }

    let mut phones = BTreeSet::new();
    for record in &response.data {
        for (key, value) in record {
            let key_lower = key.to_lowercase();
            if key_lower.contains("phone") || key_lower.contains("телефон") {
                match value {
                    Value::Array(items) => {
                        phones.extend(items.iter().filter(|v| is_present(v)).map(display_value));
                    }
                    v if is_present(v) => {
                        phones.insert(display_value(v));
                    }
                    _ => {}
                }
            }

            if let Value::String(s) = value {
                if s.chars().count() >= 10 {
                    phones.extend(phone_regex().find_iter(s).map(|m| m.as_str().to_string()));
                }
            }
        }
    }

    phones.into_iter().collect::<Vec<_>>().join(", ")
}

/// One-line summary of a response for the `Всё` column:
/// `База: t | key: value || База: t2 | ...`. Failed responses give `ошибка: <message>`,
/// empty ones give `""`.
pub fn format_full_result(response: &QueryResponse) -> String {
    if !response.status {
        return format!(
            "ошибка: {}",
            response.message.as_deref().unwrap_or("неизвестная ошибка")
        );
    }
    if response.counts == 0 {
        return String::new();
    }

    response
        .data
        .iter()
        .map(|record| {
            let mut parts = vec![format!("База: {}", table_name(record))];
            for (key, value) in fields(record) {
                let shown = match value {
                    Value::Array(items) => list_preview(items, |rest| format!(" и ещё {}", rest)),
                    other => display_value(other),
                };
                parts.push(format!("{}: {}", key, shown));
            }
            parts.join(" | ")
        })
        .collect::<Vec<_>>()
        .join(" || ")
}

/// `snake_case_key` → `Snake Case Key`; letters after a non-letter are capitalised, the rest lowercased.
pub fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut prev_letter = false;
    for c in key.replace('_', " ").chars() {
        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }
    out
}

/// HTML reply for a single search.
pub fn format_single_result(response: &QueryResponse) -> String {
    if !response.has_results() {
        let message = response.message.as_deref().unwrap_or("Не найдено");
        return format!("❌ {}", html::escape(message));
    }

    let mut text = format!("✅ <b>Найдено: {}</b>\n\n", response.counts);
    for (idx, record) in response.data.iter().enumerate() {
        text.push_str(&format!("📋 <b>#{}</b>\n", idx + 1));
        text.push_str(&format!("📊 База: {}\n", html::escape(&table_name(record))));
        for (key, value) in fields(record) {
            let shown = match value {
                Value::Array(items) => list_preview(items, |rest| format!(" +{}", rest)),
                other => display_value(other),
            };
            text.push_str(&format!(
                "  • {}: {}\n",
                html::escape(&title_case(key)),
                html::escape(&shown)
            ));
        }
        text.push('\n');
    }
    text
}

/// Splits HTML text into chunks of at most `limit` chars, breaking at line ends.
///
/// A single line longer than `limit` is cut before any `&entity;` or `<tag>` it would leave unfinished.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len <= limit {
            current.push_str(line);
            current_len += line_len;
            continue;
        }

        let mut rest = line;
        while rest.chars().count() > limit {
            let cut = markup_safe_cut(rest, limit);
            chunks.push(rest[..cut].to_string());
            rest = &rest[cut..];
        }
        current.push_str(rest);
        current_len = rest.chars().count();
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Byte offset at most `limit` chars into `s` that does not split an entity or a tag.
fn markup_safe_cut(s: &str, limit: usize) -> usize {
    let end = s.char_indices().nth(limit).map_or(s.len(), |(i, _)| i);
    let head = &s[..end];
    let unfinished = [('&', ';'), ('<', '>')]
        .into_iter()
        .filter_map(|(open, close)| {
            let at = head.rfind(open)?;
            (!head[at..].contains(close)).then_some(at)
        })
        .min();
    match unfinished {
        Some(at) if at > 0 => at,
        _ => end,
    }
}
