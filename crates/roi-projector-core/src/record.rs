//! Permissive numeric-array scanner for calibration records.
//!
//! This is not a JSON parser. For a given key it finds the first occurrence of
//! `"key"`, jumps to the next `[`, and collects every number up to the
//! matching `]`, ignoring nesting, commas, whitespace and anything else it
//! does not recognise. Unrelated or malformed parts of the document never
//! cause a failure.
//!
//! Numbers follow C `strtod`: decimal floats, `inf`/`nan`, and hexadecimal
//! forms such as `0x10` or `0x1.8p3`.

use thiserror::Error;

/// Failure to extract one keyed array.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("key \"{key}\" not found")]
    MissingKey { key: String },
    #[error("no '[' after key \"{key}\"")]
    MissingArray { key: String },
    #[error("malformed number in \"{key}\" at byte {offset}")]
    InvalidNumber { key: String, offset: usize },
    #[error("\"{key}\" has {found} numbers, expected {expected}")]
    NotEnoughValues {
        key: String,
        expected: usize,
        found: usize,
    },
}

/// Byte offset of the first `[` following the quoted `key`.
pub fn find_key_array_start(text: &str, key: &str) -> Result<usize, RecordError> {
    let quoted = format!("\"{key}\"");
    let key_pos = text.find(&quoted).ok_or_else(|| RecordError::MissingKey {
        key: key.to_owned(),
    })?;
    text[key_pos..]
        .find('[')
        .map(|rel| key_pos + rel)
        .ok_or_else(|| RecordError::MissingArray {
            key: key.to_owned(),
        })
}

/// Scan the bracketed run starting at `start` (which must point at `[`).
///
/// Stops when the bracket depth returns to zero or at end of text.
fn scan_numbers(text: &str, start: usize, key: &str) -> Result<Vec<f64>, RecordError> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'[') {
        return Err(RecordError::MissingArray {
            key: key.to_owned(),
        });
    }

    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'[' => {
                depth += 1;
                i += 1;
            }
            b']' => {
                depth = depth.saturating_sub(1);
                i += 1;
                if depth == 0 {
                    break;
                }
            }
            b'-' | b'+' | b'.' | b'0'..=b'9' => {
                if let Some((len, value)) = hex_number(&bytes[i..]) {
                    out.push(value);
                    i += len;
                    continue;
                }
                let len = number_prefix_len(&bytes[i..]);
                let value = text[i..i + len]
                    .parse::<f64>()
                    .map_err(|_| RecordError::InvalidNumber {
                        key: key.to_owned(),
                        offset: i,
                    })?;
                out.push(value);
                i += len;
            }
            _ => i += 1,
        }
    }
    Ok(out)
}

/// Length of the longest prefix that reads as a decimal float:
/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`, or a signed
/// `inf` / `infinity` / `nan`. Zero when no number starts here.
fn number_prefix_len(s: &[u8]) -> usize {
    let mut i = 0;
    if matches!(s.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let special = &s[i..];
    for word in [&b"infinity"[..], &b"inf"[..], &b"nan"[..]] {
        if special.len() >= word.len() && special[..word.len()].eq_ignore_ascii_case(word) {
            return i + word.len();
        }
    }

    let int_start = i;
    while i < s.len() && s[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;
    if i < s.len() && s[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < s.len() && s[j].is_ascii_digit() {
            j += 1;
        }
        mantissa_digits += j - frac_start;
        if mantissa_digits > 0 {
            i = j;
        }
    }
    if mantissa_digits == 0 {
        return 0;
    }

    if i < s.len() && matches!(s[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < s.len() && matches!(s[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < s.len() && s[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

fn hex_digit(b: Option<&u8>) -> Option<f64> {
    b.and_then(|&b| (b as char).to_digit(16)).map(f64::from)
}

/// `[+-]? 0[xX] hexdigits [. hexdigits] ([pP] [+-]? digits)?`, returning the
/// consumed length and value. `None` when no hex digit follows the prefix.
fn hex_number(s: &[u8]) -> Option<(usize, f64)> {
    let (sign, mut i) = match s.first() {
        Some(b'-') => (-1.0, 1),
        Some(b'+') => (1.0, 1),
        _ => (1.0, 0),
    };
    if s.get(i) != Some(&b'0') || !matches!(s.get(i + 1), Some(b'x' | b'X')) {
        return None;
    }
    i += 2;

    let mut mantissa = 0.0;
    let mut digits = 0;
    let mut exp: i32 = 0;
    while let Some(d) = hex_digit(s.get(i)) {
        mantissa = mantissa * 16.0 + d;
        digits += 1;
        i += 1;
    }
    if s.get(i) == Some(&b'.') {
        let mut j = i + 1;
        let (mut frac, mut frac_digits) = (mantissa, 0);
        while let Some(d) = hex_digit(s.get(j)) {
            frac = frac * 16.0 + d;
            frac_digits += 1;
            j += 1;
        }
        if digits + frac_digits > 0 {
            mantissa = frac;
            exp -= 4 * frac_digits;
            digits += frac_digits;
            i = j;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(s.get(i), Some(b'p' | b'P')) {
        let mut j = i + 1;
        let exp_sign = match s.get(j) {
            Some(b'-') => {
                j += 1;
                -1
            }
            Some(b'+') => {
                j += 1;
                1
            }
            _ => 1,
        };
        let exp_start = j;
        let mut value: i32 = 0;
        while let Some(d) = s.get(j).filter(|b| b.is_ascii_digit()) {
            value = value.saturating_mul(10).saturating_add(i32::from(*d - b'0'));
            j += 1;
        }
        if j > exp_start {
            exp = exp.saturating_add(exp_sign * value);
            i = j;
        }
    }
    Some((i, sign * mantissa * 2f64.powi(exp)))
}

/// Extract exactly `N` numbers for `key`; surplus numbers are dropped.
pub fn parse_fixed<const N: usize>(text: &str, key: &str) -> Result<[f64; N], RecordError> {
    let start = find_key_array_start(text, key)?;
    let values = scan_numbers(text, start, key)?;
    if values.len() < N {
        return Err(RecordError::NotEnoughValues {
            key: key.to_owned(),
            expected: N,
            found: values.len(),
        });
    }
    let mut out = [0.0; N];
    out.copy_from_slice(&values[..N]);
    Ok(out)
}
