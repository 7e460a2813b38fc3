//! Decoding of generated implementor fragments.
//!
//! A fragment is either a plain JSON batch or the script emitted by the
//! documentation generator, which assigns one implementor list per key:
//!
//! ```text
//! (function() {var implementors = {};
//! implementors["my_crate"] = [{text:"impl Drop for Foo",synthetic:false,types:["my_crate::Foo"]},];
//! ...
//! })()
//! ```
//!
//! Array bodies are JavaScript object literals (bare keys, trailing commas), so
//! they are rewritten to JSON before decoding. Decoding is lenient: a broken
//! record or assignment degrades to defaults instead of losing the fragment.

use crate::error::FragmentError;
use crate::types::{Batch, ImplementorRecord, TraitId, batch_from_value, records_from_value};
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::iter::Peekable;
use std::str::CharIndices;
use std::sync::LazyLock;

/// `implementors["<key>"] = ` with the key as a double-quoted string literal.
///
/// Only the bare `implementors` variable counts; member accesses such as
/// `window.pending_implementors[...]` do not.
static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[^\w.$])implementors\[\s*("(?:[^"\\]|\\.)*")\s*\]\s*=\s*"#)
        .expect("assignment pattern is valid")
});

/// Decode a fragment, picking the JSON or script form from its first token.
pub fn decode_fragment(source: &str) -> Result<Batch, FragmentError> {
    match source.trim_start().chars().next() {
        Some('{' | '[') => decode_json(source),
        _ => Ok(decode_script(source)),
    }
}

/// Decode a JSON batch: an object mapping trait ids to implementor arrays.
pub fn decode_json(source: &str) -> Result<Batch, FragmentError> {
    let value: Value = serde_json::from_str(source)?;
    batch_from_value(&value).ok_or(FragmentError::NotAnObject {
        found: value_kind(&value),
    })
}

/// Decode the generator's script form, keying each list by its assignment key.
///
/// Assignments are read in source order. Assigning the same key twice keeps
/// the later list, as the script itself would. A script with no assignments
/// yields an empty batch.
pub fn decode_script(source: &str) -> Batch {
    decode_assignments(source)
        .into_iter()
        .map(|(key, records)| (TraitId::from(key), records))
        .collect()
}

/// Decode a script fragment generated for a single trait.
///
/// The generator keys each assignment by the crate that contributed it, so the
/// per-crate lists are concatenated in source order under `trait_id`, and each
/// record keeps its crate in [`ImplementorRecord::crate_name`].
pub fn decode_trait_script(trait_id: TraitId, source: &str) -> Batch {
    let records: Vec<ImplementorRecord> = decode_assignments(source)
        .into_iter()
        .flat_map(|(crate_name, records)| {
            records
                .into_iter()
                .map(move |record| record.with_crate_name(crate_name.as_str()))
        })
        .collect();

    tracing::debug!(trait_id = %trait_id, records = records.len(), "Decoded trait fragment");
    Batch::from([(trait_id, records)])
}

fn decode_assignments(source: &str) -> IndexMap<String, Vec<ImplementorRecord>> {
    let mut assignments = IndexMap::new();
    let mut pos = 0;

    while let Some(captures) = ASSIGNMENT.captures_at(source, pos) {
        let (Some(whole), Some(key)) = (captures.get(0), captures.get(1)) else {
            break;
        };
        let key = decode_key(key.as_str());
        let rest = &source[whole.end()..];

        if !rest.starts_with('[') {
            tracing::warn!(key = %key, "Implementor assignment is not an array");
            assignments.insert(key, Vec::new());
            pos = whole.end();
            continue;
        }

        let Some(len) = literal_len(rest) else {
            tracing::warn!(key = %key, "Unterminated implementor list");
            assignments.insert(key, Vec::new());
            break;
        };

        let json = js_literal_to_json(&rest[..len]);
        let records = match serde_json::from_str::<Value>(&json) {
            Ok(value) => records_from_value(&key, &value),
            Err(e) => {
                tracing::warn!(key = %key, "Failed to decode implementor list: {}", e);
                Vec::new()
            }
        };

        tracing::debug!(key = %key, records = records.len(), "Decoded assignment");
        assignments.insert(key, records);
        pos = whole.end() + len;
    }

    assignments
}

fn decode_key(literal: &str) -> String {
    serde_json::from_str::<String>(literal)
        .unwrap_or_else(|_| literal.trim_matches('"').to_string())
}

/// Byte length of the bracketed literal at the start of `source`, including
/// the closing bracket. `None` if it never closes.
fn literal_len(source: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote = None;
    let mut escaped = false;

    for (i, c) in source.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Rewrite a JavaScript array/object literal as JSON.
///
/// Quotes bare property names, drops trailing commas and turns single-quoted
/// strings into double-quoted ones. Anything else passes through unchanged.
fn js_literal_to_json(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len() + literal.len() / 8);
    let mut chars = literal.char_indices().peekable();
    let mut quote = None;

    while let Some((i, c)) = chars.next() {
        match (quote, c) {
            (Some(_), '\\') => {
                let Some((_, next)) = chars.next() else {
                    out.push(c);
                    break;
                };
                push_escape(&mut out, next, &mut chars);
            }
            (Some('\''), '"') => out.push_str("\\\""),
            (Some(q), _) if c == q => {
                out.push('"');
                quote = None;
            }
            (Some(_), _) => out.push(c),
            (None, '"' | '\'') => {
                out.push('"');
                quote = Some(c);
            }
            (None, ',') if matches!(next_significant(&literal[i + 1..]), Some(']' | '}')) => {}
            (None, _) if is_ident_start(c) => {
                let mut end = i + c.len_utf8();
                while let Some(&(j, n)) = chars.peek() {
                    if !is_ident_continue(n) {
                        break;
                    }
                    end = j + n.len_utf8();
                    chars.next();
                }
                let ident = &literal[i..end];
                if next_significant(&literal[end..]) == Some(':') {
                    out.push('"');
                    out.push_str(ident);
                    out.push('"');
                } else {
                    out.push_str(ident);
                }
            }
            (None, _) => out.push(c),
        }
    }

    out
}

/// Write the JSON form of the JavaScript escape `\<escape>`.
///
/// JSON has no `\'`, `\v`, `\0` or `\xHH`, so those are spelled out. Escapes
/// JSON shares with JavaScript are copied as they are.
fn push_escape(out: &mut String, escape: char, chars: &mut Peekable<CharIndices<'_>>) {
    match escape {
        '\'' => out.push('\''),
        'v' => out.push_str("\\u000b"),
        '0' => out.push_str("\\u0000"),
        'x' => {
            let hex: String = (0..2)
                .filter_map(|_| chars.next_if(|(_, h)| h.is_ascii_hexdigit()))
                .map(|(_, h)| h)
                .collect();
            if hex.len() == 2 {
                out.push_str("\\u00");
                out.push_str(&hex);
            } else {
                out.push('x');
                out.push_str(&hex);
            }
        }
        '"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u' => {
            out.push('\\');
            out.push(escape);
        }
        // Line continuation.
        '\n' | '\r' => {}
        // Identity escapes such as `\a` mean the character itself.
        _ => out.push(escape),
    }
}

fn next_significant(s: &str) -> Option<char> {
    s.chars().find(|c| !c.is_whitespace())
}

const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

const fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
