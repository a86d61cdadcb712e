//! Deterministic JSON encoding for authorization signatures
//!
//! Privy verifies authorization signatures over a canonical JSON rendering of
//! the request (RFC 8785 style): object keys sorted by UTF-16 code units, no
//! insignificant whitespace, numbers in ECMAScript `Number.prototype.toString`
//! form. Request types serialize wei quantities as decimal strings via
//! [`crate::serde_util`]; integers outside the IEEE 754 safe range that still
//! arrive as numbers (e.g. inside typed data) are emitted as decimal strings so
//! a JavaScript verifier never rounds them.

use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt::Write as _;

/// Produces the canonical string for a JSON value.
///
/// Returning `None` means the value could not be canonicalized; callers must
/// treat that as fatal for the request being signed.
pub trait Canonicalizer: Send + Sync {
    fn canonicalize(&self, value: &Value) -> Option<String>;
}

/// Default RFC 8785 style canonicalizer
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCanonicalizer;

impl Canonicalizer for JsonCanonicalizer {
    fn canonicalize(&self, value: &Value) -> Option<String> {
        let mut out = String::new();
        write_value(&mut out, value)?;
        Some(out)
    }
}

/// Convert any serializable request type into a JSON value for signing.
///
/// Serialization failures (e.g. maps with non-string keys) yield `None`.
pub fn to_canonical_value<T: Serialize + ?Sized>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

fn write_value(out: &mut String, value: &Value) -> Option<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(out, n)?,
        Value::String(s) => out.push_str(&serde_json::to_string(s).ok()?),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.encode_utf16().cmp(b.encode_utf16()));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key).ok()?);
                out.push(':');
                write_value(out, item)?;
            }
            out.push('}');
        }
    }
    Some(())
}

/// Largest integer a JavaScript number holds exactly (2^53 - 1)
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

fn write_number(out: &mut String, n: &Number) -> Option<()> {
    if let Some(v) = n.as_u64() {
        if v <= MAX_SAFE_INTEGER {
            write!(out, "{}", v).ok()?;
        } else {
            write!(out, "\"{}\"", v).ok()?;
        }
    } else if let Some(v) = n.as_i64() {
        if v.unsigned_abs() <= MAX_SAFE_INTEGER {
            write!(out, "{}", v).ok()?;
        } else {
            write!(out, "\"{}\"", v).ok()?;
        }
    } else {
        out.push_str(&format_ecmascript(n.as_f64()?)?);
    }
    Some(())
}

/// Format a finite double the way ECMAScript `Number.prototype.toString` does
fn format_ecmascript(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return Some("0".to_string());
    }

    // Shortest round-trip digits, e.g. "1.2345e-7"
    let sci = format!("{:e}", value.abs());
    let (mantissa, exponent) = sci.split_once('e')?;
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().ok()?;

    let k = digits.len() as i32;
    let n = exponent + 1;
    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }

    if k <= n && n <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take((n - k) as usize));
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        out.push_str(int);
        out.push('.');
        out.push_str(frac);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-n) as usize));
        out.push_str(&digits);
    } else {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        let e = n - 1;
        write!(out, "e{}{}", if e < 0 { '-' } else { '+' }, e.abs()).ok()?;
    }
    Some(out)
}
