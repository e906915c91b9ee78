//! Substring scanning over JSON text.
//!
//! This is not a parser. Every function looks for a literal pattern built from the key and
//! works outwards from the FIRST occurrence of that pattern anywhere in the text:
//!
//! - the key is never checked against the enclosing object, so `"key":` inside a nested object
//!   or inside an unrelated string value matches just as well as a top level field
//! - quoted values end at the next `"` byte, an escaped quote (`\"`) inside a value truncates it
//!
//! Both behaviours match what the host expects and are pinned by the tests below. Results are
//! borrowed from the input so nothing is copied until the caller decides it needs to be.

use crate::draft::escape_json;

const QUOTE: u8 = b'"';
const OPEN_BRACE: u8 = b'{';
const CLOSE_BRACE: u8 = b'}';

/// byte offset of the first occurrence of `needle` in `haystack`
fn find_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| i + from)
}

fn skip_while(bytes: &[u8], mut idx: usize, pred: impl Fn(u8) -> bool) -> usize {
    while idx < bytes.len() && pred(bytes[idx]) {
        idx += 1;
    }
    idx
}

fn is_space_or_tab(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// index just past the last byte of a `"key":` style pattern, `None` when absent
fn after_pattern(json: &str, key: &str, suffix: &str) -> Option<usize> {
    let pattern = format!("\"{}\"{}", key, suffix);
    find_from(json.as_bytes(), pattern.as_bytes(), 0).map(|i| i + pattern.len())
}

/// Value of `key` as text, or `""` when no value can be found.
///
/// Tries the quoted form `"key":"` first and returns everything up to the next `"`. Failing
/// that, looks for `"key":`, skips spaces, and takes either a quoted string or a run of ASCII
/// digits. Objects, arrays, booleans and null are not values as far as this function is
/// concerned.
pub fn find_json_field<'a>(json: &'a str, key: &str) -> &'a str {
    let bytes = json.as_bytes();

    if let Some(start) = after_pattern(json, key, ":\"") {
        let end = skip_while(bytes, start, |b| b != QUOTE);
        if end > start {
            return &json[start..end];
        }
    }

    let Some(colon) = after_pattern(json, key, ":") else {
        return "";
    };
    let mut start = skip_while(bytes, colon, |b| b == b' ');
    let end = if bytes.get(start) == Some(&QUOTE) {
        start += 1;
        skip_while(bytes, start, |b| b != QUOTE)
    } else {
        skip_while(bytes, start, |b| b.is_ascii_digit())
    };

    if end > start {
        &json[start..end]
    } else {
        ""
    }
}

/// The object value of `key` including its braces, or `""` when `"key":{` does not occur.
///
/// Braces are depth counted from the opening brace so nested objects are returned whole.
/// Braces inside string values are counted too. If the text ends before the depth returns to
/// zero the remainder of the text is returned.
pub fn extract_json_object<'a>(json: &'a str, key: &str) -> &'a str {
    let Some(after) = after_pattern(json, key, ":{") else {
        return "";
    };
    let bytes = json.as_bytes();
    let start = after - 1;

    let mut depth: usize = 0;
    for (i, b) in bytes.iter().enumerate().skip(start) {
        match *b {
            OPEN_BRACE => depth += 1,
            CLOSE_BRACE => {
                depth -= 1;
                if depth == 0 {
                    return &json[start..=i];
                }
            }
            _ => {}
        }
    }
    &json[start..]
}

/// Leading ASCII digits of `text` as a u64, `0` when there are none.
///
/// Accumulation wraps on overflow the same way the host's 64 bit arithmetic does.
#[cfg_attr(feature = "fuzzing", test_fuzz::test_fuzz)]
pub fn parse_uint64(text: &str) -> u64 {
    text.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0_u64, |acc, digit| {
            acc.wrapping_mul(10).wrapping_add((digit - b'0') as u64)
        })
}

/// offset just past the first `:` that follows `"key"`, with spaces and tabs skipped
fn value_start(json: &str, key: &str) -> Option<usize> {
    let bytes = json.as_bytes();
    let key_at = after_pattern(json, key, "")?;
    let colon = find_from(bytes, b":", key_at)?;
    Some(skip_while(bytes, colon + 1, is_space_or_tab))
}

/// The quoted value following `"key"` and its colon.
///
/// Unlike [`find_json_field`] the value does not have to follow the colon directly, the first
/// quoted string after it is taken.
pub fn parse_string<'a>(json: &'a str, key: &str) -> Option<&'a str> {
    let bytes = json.as_bytes();
    let start = value_start(json, key)?;
    let open = find_from(bytes, b"\"", start)?;
    let close = find_from(bytes, b"\"", open + 1)?;
    Some(&json[open + 1..close])
}

/// The unsigned integer following `"key"` and its colon, `None` when no digits follow.
pub fn parse_number(json: &str, key: &str) -> Option<u64> {
    let start = value_start(json, key)?;
    let digits = &json[start..skip_while(json.as_bytes(), start, |b| b.is_ascii_digit())];
    if digits.is_empty() {
        None
    } else {
        Some(parse_uint64(digits))
    }
}

/// `true` or `false` following `"key"` and its colon, `None` for anything else.
pub fn parse_boolean(json: &str, key: &str) -> Option<bool> {
    let rest = &json[value_start(json, key)?..];
    if rest.starts_with("true") {
        Some(true)
    } else if rest.starts_with("false") {
        Some(false)
    } else {
        None
    }
}

/// Amount parameter: the field value run through [`parse_uint64`], `0` when absent.
pub fn parse_amount_field(json: &str, key: &str) -> u64 {
    parse_uint64(find_json_field(json, key))
}

/// Flag parameter: `"true"` or `"1"` are true, everything else (including absence) is false.
pub fn parse_bool_field(json: &str, key: &str) -> bool {
    matches!(find_json_field(json, key), "true" | "1")
}

/// Flat `{"k":"v",...}` object, keys and values escaped, in the order given.
pub fn stringify_pairs(pairs: &[(&str, &str)]) -> String {
    let mut out = String::from("{");
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('"');
        out.push_str(&escape_json(key));
        out.push_str("\":\"");
        out.push_str(&escape_json(value));
        out.push('"');
    }
    out.push('}');
    out
}

#[cfg(test)]
pub mod tests {
    use crate::json::*;

    const FIXTURE: &str = r#"{"a":"1","b":2,"c":{"d":3}}"#;

    #[test]
    fn find_json_field_fixture_test() {
        assert_eq!("1", find_json_field(FIXTURE, "a"));
        assert_eq!("2", find_json_field(FIXTURE, "b"));
        assert_eq!("", find_json_field(FIXTURE, "missing"));
        // objects are not scalar values
        assert_eq!("", find_json_field(FIXTURE, "c"));
    }

    #[test]
    fn find_json_field_unquoted_forms_test() {
        assert_eq!("100", find_json_field(r#"{"amount": 100,"count":50}"#, "amount"));
        assert_eq!("50", find_json_field(r#"{"amount": 100,"count":50}"#, "count"));
        assert_eq!("spaced", find_json_field(r#"{"name":  "spaced"}"#, "name"));
        assert_eq!("", find_json_field(r#"{"flag":true}"#, "flag"));
        assert_eq!("", find_json_field(r#"{"none":null}"#, "none"));
        assert_eq!("", find_json_field(r#"{"neg":-5}"#, "neg"));
    }

    #[test]
    fn find_json_field_empty_string_falls_through_test() {
        // the quoted form captures nothing so the unquoted pass retries and also finds nothing
        assert_eq!("", find_json_field(r#"{"name":"","other":"x"}"#, "name"));
    }

    #[test]
    fn find_json_field_matches_nested_keys_test() {
        // first occurrence anywhere wins, even inside a nested object
        let json = r#"{"outer":{"id":"inner"},"id":"top"}"#;
        assert_eq!("inner", find_json_field(json, "id"));
        let json = r#"{"list":[{"amount":1}],"amount":2}"#;
        assert_eq!("1", find_json_field(json, "amount"));
    }

    #[test]
    fn find_json_field_truncates_at_escaped_quote_test() {
        let json = r#"{"memo":"say \"hi\"","x":1}"#;
        assert_eq!("say \\", find_json_field(json, "memo"));
    }

    #[test]
    fn extract_json_object_fixture_test() {
        assert_eq!(r#"{"d":3}"#, extract_json_object(FIXTURE, "c"));
        assert_eq!("", extract_json_object(FIXTURE, "a"));
        assert_eq!("", extract_json_object(FIXTURE, "missing"));
    }

    #[test]
    fn extract_json_object_balances_nested_braces_test() {
        let json = r#"{"x":{"y":{"z":1}}}"#;
        assert_eq!(r#"{"y":{"z":1}}"#, extract_json_object(json, "x"));
        assert_eq!(r#"{"z":1}"#, extract_json_object(json, "y"));

        let json = r#"{"asset":{"amount":100,"tokenId":"TOKEN"},"owner":"AAEC"}"#;
        let asset = extract_json_object(json, "asset");
        assert_eq!(r#"{"amount":100,"tokenId":"TOKEN"}"#, asset);
        assert_eq!("100", find_json_field(asset, "amount"));
        assert_eq!("TOKEN", find_json_field(asset, "tokenId"));
    }

    #[test]
    fn extract_json_object_unterminated_returns_remainder_test() {
        assert_eq!(r#"{"y":1"#, extract_json_object(r#"{"x":{"y":1"#, "x"));
    }

    #[test]
    fn parse_uint64_boundaries_test() {
        assert_eq!(0, parse_uint64(""));
        assert_eq!(0, parse_uint64("abc"));
        assert_eq!(123, parse_uint64("123abc"));
        assert_eq!(456, parse_uint64("456.789"));
        assert_eq!(0, parse_uint64(" 1"));
        assert_eq!(u64::MAX, parse_uint64("18446744073709551615"));
    }

    #[test]
    fn parse_string_test() {
        assert_eq!(Some("test"), parse_string(r#"{"name": "test"}"#, "name"));
        assert_eq!(Some(""), parse_string(r#"{"name":""}"#, "name"));
        assert_eq!(None, parse_string(r#"{"name":1}"#, "name"));
        assert_eq!(None, parse_string(r#"{"other":"x"}"#, "name"));
    }

    #[test]
    fn parse_number_test() {
        assert_eq!(Some(42), parse_number("{\"n\":\t 42}", "n"));
        assert_eq!(None, parse_number(r#"{"n":"42"}"#, "n"));
        assert_eq!(None, parse_number(r#"{"m":42}"#, "n"));
    }

    #[test]
    fn parse_boolean_test() {
        assert_eq!(Some(true), parse_boolean(r#"{"ok": true}"#, "ok"));
        assert_eq!(Some(false), parse_boolean(r#"{"ok":false}"#, "ok"));
        assert_eq!(None, parse_boolean(r#"{"ok":"true"}"#, "ok"));
        assert_eq!(None, parse_boolean(r#"{"ok":1}"#, "ok"));
    }

    #[test]
    fn parameter_helpers_test() {
        let params = r#"{"to":"abc","amount":"250","burn":"1","lock":"no"}"#;
        assert_eq!(250, parse_amount_field(params, "amount"));
        assert_eq!(0, parse_amount_field(params, "fee"));
        assert!(parse_bool_field(params, "burn"));
        assert!(!parse_bool_field(params, "lock"));
        assert!(!parse_bool_field(params, "missing"));
    }

    #[test]
    fn stringify_pairs_test() {
        assert_eq!("{}", stringify_pairs(&[]));
        assert_eq!(
            r#"{"a":"1","b":"say \"hi\""}"#,
            stringify_pairs(&[("a", "1"), ("b", "say \"hi\"")])
        );
        let built = stringify_pairs(&[("name", "test"), ("value", "hello")]);
        assert_eq!("hello", find_json_field(&built, "value"));
    }
}
