//! String-to-value parsing behind the typed getters.
//!
//! Every getter funnels through [`parse_or_default`]: a missing value or a
//! value the parser rejects becomes `T::default()`. Parse failures are never
//! surfaced to the caller.

/// Apply `parser` to `raw`, returning `T::default()` if `raw` is absent or the
/// parser rejects it.
pub fn parse_or_default<T, F>(raw: Option<&str>, parser: F) -> T
where
    T: Default,
    F: FnOnce(&str) -> Option<T>,
{
    raw.and_then(parser).unwrap_or_default()
}

/// Parse an integer with base auto-detection.
///
/// Accepts an optional sign followed by `0x`/`0X` (hex), `0o`/`0O` (octal),
/// `0b`/`0B` (binary), a bare leading `0` (octal) or plain decimal digits.
/// Underscores may separate digits.
pub fn parse_i64(raw: &str) -> Option<i64> {
    let (negative, body) = match raw.as_bytes().first()? {
        b'-' => (true, &raw[1..]),
        b'+' => (false, &raw[1..]),
        _ => (false, raw),
    };
    let (radix, digits, prefixed) = split_radix(body);
    let digits = strip_underscores(digits, prefixed)?;
    let magnitude = u64::from_str_radix(&digits, radix).ok()?;

    if !negative {
        return i64::try_from(magnitude).ok();
    }
    if magnitude == i64::MIN.unsigned_abs() {
        Some(i64::MIN)
    } else {
        i64::try_from(magnitude).ok().map(|v| -v)
    }
}

/// Like [`parse_i64`], rejecting values outside the `i32` range.
pub fn parse_i32(raw: &str) -> Option<i32> {
    parse_i64(raw).and_then(|v| i32::try_from(v).ok())
}

pub fn parse_f64(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok()
}

/// Case-insensitive boolean tokens: `1 t true y yes on` and `0 f false n no off`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "y" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "n" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Split `raw` on the literal separator `sep`.
///
/// Splitting the empty string yields `[""]`, not an empty list. An empty
/// separator splits into individual characters.
pub fn split_list(raw: &str, sep: &str) -> Vec<String> {
    if sep.is_empty() {
        return raw.chars().map(String::from).collect();
    }
    raw.split(sep).map(str::to_owned).collect()
}

/// Split then parse each field; fields the parser rejects are dropped.
pub fn parse_list<T, F>(raw: &str, sep: &str, parser: F) -> Vec<T>
where
    F: Fn(&str) -> Option<T>,
{
    split_list(raw, sep).iter().filter_map(|field| parser(field)).collect()
}

fn split_radix(body: &str) -> (u32, &str, bool) {
    let bytes = body.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return (16, &body[2..], true),
            b'o' | b'O' => return (8, &body[2..], true),
            b'b' | b'B' => return (2, &body[2..], true),
            _ => return (8, &body[1..], true),
        }
    }
    (10, body, false)
}

/// Remove digit-separating underscores. A single underscore directly after a
/// base prefix is allowed; leading, trailing or doubled underscores are not.
fn strip_underscores(digits: &str, prefixed: bool) -> Option<String> {
    let mut out = String::with_capacity(digits.len());
    let mut after_digit = prefixed;
    for c in digits.chars() {
        match c {
            '_' if after_digit => after_digit = false,
            '_' | '+' | '-' => return None,
            _ => {
                out.push(c);
                after_digit = true;
            }
        }
    }
    if out.is_empty() || !after_digit {
        return None;
    }
    Some(out)
}
