//! Canonical names for generated declarations and factory functions.
//!
//! Names are derived purely from their inputs. Two different inputs can map to
//! the same name; no collision detection is done and both items are emitted.

/// Marker inserted between a parent name and a field key for sub-schemas.
const SUB_MARKER: &str = "Sub";

/// Name of the schema node embedded at `parent.key`, before any suffix.
///
/// `("Test", "nestedArr")` → `TestNestedArrSub`.
pub fn sub_schema_name(parent: &str, key: &str) -> String {
    to_pascal_case(&format!("{parent}-{key}{SUB_MARKER}"))
}

/// Declaration name for a schema node, e.g. `("TestNestedSub", "Dto")` → `TestNestedSubDto`.
pub fn declaration_name(name: &str, suffix: &str) -> String {
    to_pascal_case(&format!("{name}{suffix}"))
}

/// Factory function name for a schema node, e.g. `TestNestedSub` → `testNestedSubFactory`.
pub fn factory_name(name: &str) -> String {
    to_camel_case(&format!("{name}-Factory"))
}

pub fn to_pascal_case(raw: &str) -> String {
    let mut out = String::new();
    for token in identifier_tokens(raw) {
        push_capitalized(&mut out, &token);
    }
    out
}

pub fn to_camel_case(raw: &str) -> String {
    let mut out = String::new();
    for (i, token) in identifier_tokens(raw).iter().enumerate() {
        if i == 0 {
            out.push_str(token);
        } else {
            push_capitalized(&mut out, token);
        }
    }
    out
}

fn push_capitalized(out: &mut String, token: &str) {
    let mut chars = token.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_uppercase());
        out.extend(chars);
    }
}

/// Lowercased word tokens of `raw`.
///
/// Only ASCII letters and digits survive; every other character separates
/// tokens or is dropped. Keys written entirely in other scripts contribute
/// nothing, so `("Test", "名前")` names the sub-schema `TestSub`.
fn identifier_tokens(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in raw.split(|c: char| !c.is_ascii_alphanumeric()) {
        if chunk.is_empty() {
            continue;
        }
        tokens.extend(split_camel_tokens(chunk));
    }
    tokens
}

fn split_camel_tokens(chunk: &str) -> Vec<String> {
    let chars: Vec<char> = chunk.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let mut tokens = Vec::new();
    let mut start = 0usize;

    for i in 1..chars.len() {
        let prev = chars[i - 1];
        let curr = chars[i];
        let next = chars.get(i + 1).copied();

        let boundary = (prev.is_ascii_lowercase() && curr.is_ascii_uppercase())
            || (prev.is_ascii_alphabetic() && curr.is_ascii_digit())
            || (prev.is_ascii_digit() && curr.is_ascii_alphabetic())
            || (prev.is_ascii_uppercase()
                && curr.is_ascii_uppercase()
                && next.map(|n| n.is_ascii_lowercase()).unwrap_or(false));

        if boundary {
            tokens.push(chars[start..i].iter().collect::<String>().to_ascii_lowercase());
            start = i;
        }
    }

    tokens.push(chars[start..].iter().collect::<String>().to_ascii_lowercase());
    tokens
}
