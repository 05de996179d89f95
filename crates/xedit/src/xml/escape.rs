//! Character reference handling
//!
//! The tree keeps text and attribute values exactly as written. Decoding only
//! happens on request, and encoding only for values supplied by callers.

use std::borrow::Cow;

/// Decode the predefined entities and numeric character references.
///
/// Unknown or malformed references are left untouched; the parser never
/// rejects a document because of them since nothing is resolved at parse time.
pub fn decode(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut result = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        let (before, after) = rest.split_at(amp);
        result.push_str(before);

        let decoded = after
            .find(';')
            .and_then(|end| after.get(1..end).map(|entity| (end, entity)))
            .and_then(|(end, entity)| decode_entity(entity).map(|ch| (end, ch)));

        match decoded {
            Some((end, ch)) => {
                result.push(ch);
                rest = after.get(end + 1..).unwrap_or_default();
            }
            None => {
                result.push('&');
                rest = after.get(1..).unwrap_or_default();
            }
        }
    }
    result.push_str(rest);

    Cow::Owned(result)
}

/// Escape text for use as character data
pub fn escape_text(value: &str) -> Cow<'_, str> {
    escape(value, false)
}

/// Escape text for use inside a double-quoted attribute value
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    escape(value, true)
}

fn escape(value: &str, quotes: bool) -> Cow<'_, str> {
    let needs_escape = |c: char| matches!(c, '&' | '<' | '>') || (quotes && c == '"');
    if !value.contains(needs_escape) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => decode_numeric_entity(entity),
    }
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
