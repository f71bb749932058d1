//! Polars `AnyValue` utility functions.
//!
//! Survey extracts arrive with codes typed inconsistently between files: the
//! same district can be `7`, `7.0` or `"7"` depending on how a part was
//! converted. Everything that compares codes goes through [`canonical_code`]
//! so that a code renders the same way on every path.

use polars::prelude::{AnyValue, Column};

/// Renders a raw cell as a canonical survey code.
///
/// - `Null` and blank strings are `None`
/// - integral floats drop their fractional part (`1.0` -> `"1"`)
/// - strings of the form `<digits>.<zeros>` drop the fraction (`"07.0"` -> `"07"`)
/// - leading zeros are otherwise preserved
/// - booleans render as `"1"` / `"0"`
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use tus_common::canonical_code;
///
/// assert_eq!(canonical_code(AnyValue::Int64(1)), Some("1".to_string()));
/// assert_eq!(canonical_code(AnyValue::Float64(1.0)), Some("1".to_string()));
/// assert_eq!(canonical_code(AnyValue::String("1.0")), Some("1".to_string()));
/// assert_eq!(canonical_code(AnyValue::String("07")), Some("07".to_string()));
/// assert_eq!(canonical_code(AnyValue::Null), None);
/// ```
pub fn canonical_code(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(v.to_string()),
        AnyValue::Int16(v) => Some(v.to_string()),
        AnyValue::Int32(v) => Some(v.to_string()),
        AnyValue::Int64(v) => Some(v.to_string()),
        AnyValue::UInt8(v) => Some(v.to_string()),
        AnyValue::UInt16(v) => Some(v.to_string()),
        AnyValue::UInt32(v) => Some(v.to_string()),
        AnyValue::UInt64(v) => Some(v.to_string()),
        AnyValue::Float32(v) => Some(format_numeric(f64::from(v))),
        AnyValue::Float64(v) => Some(format_numeric(v)),
        AnyValue::Boolean(b) => Some(if b { "1" } else { "0" }.to_string()),
        AnyValue::String(s) => non_blank(canonical_code_str(s)),
        AnyValue::StringOwned(s) => non_blank(canonical_code_str(&s)),
        other => non_blank(canonical_code_str(&other.to_string())),
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Canonical form of a code that is already text.
///
/// # Examples
///
/// ```
/// use tus_common::canonical_code_str;
///
/// assert_eq!(canonical_code_str(" 2.00 "), "2");
/// assert_eq!(canonical_code_str("003"), "003");
/// assert_eq!(canonical_code_str("1.5"), "1.5");
/// assert_eq!(canonical_code_str("A1"), "A1");
/// ```
pub fn canonical_code_str(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some((whole, fraction)) = trimmed.split_once('.') else {
        return trimmed.to_string();
    };
    let digits = whole.strip_prefix('-').unwrap_or(whole);
    let integral = !digits.is_empty()
        && digits.chars().all(|ch| ch.is_ascii_digit())
        && !fraction.is_empty()
        && fraction.chars().all(|ch| ch == '0');
    if integral {
        whole.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Formats a floating-point number without a trailing fractional zero.
///
/// # Examples
///
/// ```
/// use tus_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(10.0), "10");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        // `-0.0` renders as "-0" otherwise
        return format!("{}", v as i64);
    }
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Strips leading zeros from an all-digit code (`"007"` -> `"7"`).
///
/// Non-numeric codes are returned unchanged; `"000"` becomes `"0"`.
pub fn strip_leading_zeros(code: &str) -> String {
    if code.is_empty() || !code.chars().all(|ch| ch.is_ascii_digit()) {
        return code.to_string();
    }
    let stripped = code.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// Canonical codes for every row of a column.
pub fn column_codes(column: &Column) -> Vec<Option<String>> {
    (0..column.len())
        .map(|idx| canonical_code(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};
    use proptest::prelude::*;

    #[test]
    fn test_canonical_code_null_and_blank() {
        assert_eq!(canonical_code(AnyValue::Null), None);
        assert_eq!(canonical_code(AnyValue::String("")), None);
        assert_eq!(canonical_code(AnyValue::String("   ")), None);
    }

    #[test]
    fn test_canonical_code_integers() {
        assert_eq!(canonical_code(AnyValue::Int32(42)), Some("42".to_string()));
        assert_eq!(canonical_code(AnyValue::Int64(-3)), Some("-3".to_string()));
        assert_eq!(canonical_code(AnyValue::UInt8(0)), Some("0".to_string()));
    }

    #[test]
    fn test_canonical_code_floats() {
        assert_eq!(canonical_code(AnyValue::Float64(1.0)), Some("1".to_string()));
        assert_eq!(canonical_code(AnyValue::Float64(20.0)), Some("20".to_string()));
        assert_eq!(canonical_code(AnyValue::Float32(2.5)), Some("2.5".to_string()));
    }

    #[test]
    fn test_canonical_code_strings_keep_leading_zeros() {
        assert_eq!(canonical_code(AnyValue::String("07")), Some("07".to_string()));
        assert_eq!(canonical_code(AnyValue::String("07.0")), Some("07".to_string()));
        assert_eq!(canonical_code(AnyValue::String(" 003 ")), Some("003".to_string()));
    }

    #[test]
    fn test_canonical_code_str_leaves_real_decimals() {
        assert_eq!(canonical_code_str("1.05"), "1.05");
        assert_eq!(canonical_code_str("1."), "1.");
        assert_eq!(canonical_code_str(".0"), ".0");
        assert_eq!(canonical_code_str("-4.000"), "-4");
    }

    #[test]
    fn test_boolean_codes() {
        assert_eq!(canonical_code(AnyValue::Boolean(true)), Some("1".to_string()));
        assert_eq!(canonical_code(AnyValue::Boolean(false)), Some("0".to_string()));
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(1.25), "1.25");
        assert_eq!(format_numeric(-0.0), "0");
    }

    #[test]
    fn test_strip_leading_zeros() {
        assert_eq!(strip_leading_zeros("007"), "7");
        assert_eq!(strip_leading_zeros("000"), "0");
        assert_eq!(strip_leading_zeros("10"), "10");
        assert_eq!(strip_leading_zeros("0A"), "0A");
        assert_eq!(strip_leading_zeros(""), "");
    }

    #[test]
    fn test_column_codes_mixed_float_column() {
        let column = Series::new("code".into(), &[Some(1.0f64), None, Some(2.5)]).into_column();
        assert_eq!(
            column_codes(&column),
            vec![Some("1".to_string()), None, Some("2.5".to_string())]
        );
    }

    proptest! {
        #[test]
        fn integer_codes_agree_across_representations(code in 0i64..100_000) {
            let as_int = canonical_code(AnyValue::Int64(code));
            let as_float = canonical_code(AnyValue::Float64(code as f64));
            let text = code.to_string();
            let as_text = canonical_code(AnyValue::String(&text));
            let decimal = format!("{code}.0");
            let as_decimal_text = canonical_code(AnyValue::String(&decimal));
            prop_assert_eq!(&as_int, &as_float);
            prop_assert_eq!(&as_int, &as_text);
            prop_assert_eq!(&as_int, &as_decimal_text);
        }
    }
}
