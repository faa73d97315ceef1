//! The two entry points and their stringifiers.
//!
//! Each entry point has two calling forms, mirroring the tagged-template vs
//! plain-call split of the generated code: [`html`]/[`raw`] take N literal
//! segments with N-1 interleaved values, [`html_value`]/[`raw_value`] take a
//! single value. Only `raw_value` skips escaping; interpolated values inside
//! either tagged form always go through the escaping stringifier, so a
//! trusted template can still safely inline untrusted leaves.

use crate::escape::escape;
use crate::value::{js_number_string, Fragment, Value};

/// Escaping value-to-string conversion.
fn stringify_escaped(v: &Value) -> String {
    match v {
        Value::Str(s) => escape(s),
        // Digits, `-` and `.` need no escaping.
        Value::Num(n) => js_number_string(*n),
        Value::Null | Value::Bool(false) => String::new(),
        Value::Fragment(f) => f.content().to_string(),
        Value::List(items) => items.iter().map(stringify_escaped).collect(),
        // Outside the documented domain: generic string conversion, escaped.
        Value::Bool(true) => escape("true"),
    }
}

/// Non-escaping value-to-string conversion.
fn stringify_raw(v: &Value) -> String {
    match v {
        Value::Str(s) => s.clone(),
        Value::Num(n) => js_number_string(*n),
        Value::Null | Value::Bool(false) => String::new(),
        Value::Fragment(f) => f.content().to_string(),
        Value::List(items) => items.iter().map(stringify_raw).collect(),
        Value::Bool(true) => "true".to_string(),
    }
}

/// Shared tagged-template evaluation: `segments` are the N literal parts,
/// `values` the N-1 interpolated values between them. The 1/2/3-segment
/// cases are unrolled; templates with more holes take the loop.
fn interpolate(segments: &[&str], values: &[Value]) -> String {
    debug_assert_eq!(
        segments.len(),
        values.len() + 1,
        "tagged template takes N segments and N-1 values"
    );
    match segments.len() {
        0 => String::new(),
        1 => segments[0].to_string(),
        2 => {
            let mut out = String::from(segments[0]);
            out.push_str(&stringify_escaped(&values[0]));
            out.push_str(segments[1]);
            out
        }
        3 => {
            let mut out = String::from(segments[0]);
            out.push_str(&stringify_escaped(&values[0]));
            out.push_str(segments[1]);
            out.push_str(&stringify_escaped(&values[1]));
            out.push_str(segments[2]);
            out
        }
        n => {
            let mut out = String::from(segments[0]);
            for i in 1..n {
                out.push_str(&stringify_escaped(&values[i - 1]));
                out.push_str(segments[i]);
            }
            out
        }
    }
}

/// Escaping entry point, tagged-template form. Interpolated values are
/// escaped; fragments and nested arrays are flattened in order.
pub fn html(segments: &[&str], values: &[Value]) -> String {
    interpolate(segments, values)
}

/// Escaping entry point, plain-value form.
pub fn html_value(v: &Value) -> String {
    stringify_escaped(v)
}

/// Trusted entry point, tagged-template form. The literal text is trusted
/// as-is, but interpolated values still go through the escaping stringifier;
/// the result is boxed as a [`Fragment`] so enclosing interpolations will
/// not escape it again.
pub fn raw(segments: &[&str], values: &[Value]) -> Fragment {
    Fragment::new(interpolate(segments, values))
}

/// Trusted entry point, plain-value form. The only path that stringifies
/// without escaping.
pub fn raw_value(v: &Value) -> Fragment {
    Fragment::new(stringify_raw(v))
}
