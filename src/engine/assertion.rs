//! Assertion evaluation
//!
//! An assertion is evaluated in two stages. The source picks a [`Value`] out
//! of the response, then the comparison is dispatched on the value's kind.
//! Each kind has its own exhaustive match over [`Comparison`], so a new
//! operator has to be placed explicitly for every kind.

use indexmap::IndexMap;

use crate::model::value::{format_number, is_numeric, parse_number};
use crate::model::{Assertion, Comparison, Response, ResultAssertion, Source, Value};

/// Outcome of a comparison: `None` when the operator does not apply to the
/// value kind, `Some(Err)` when the expected literal is unusable.
pub type Outcome = Option<std::result::Result<bool, String>>;

/// Evaluate one assertion against a response
pub fn evaluate(assertion: &Assertion, response: &Response) -> ResultAssertion {
    let value = match resolve(assertion, response) {
        Resolved::Value(value) => value,
        Resolved::Absent(success) => {
            let message = assertion.comparison.messages().render(
                success,
                &assertion.property,
                &assertion.value,
            );
            return ResultAssertion::evaluated(assertion, success, message);
        }
        Resolved::Error(error) => return ResultAssertion::failed(assertion, error),
    };

    match compare(assertion.comparison, &value, &assertion.value) {
        Some(Ok(success)) => {
            let actual = match &value {
                Value::Null | Value::Array(_) | Value::Object(_) => assertion.property.clone(),
                scalar => scalar.to_string(),
            };
            let message =
                assertion
                    .comparison
                    .messages()
                    .render(success, &actual, &assertion.value);
            ResultAssertion::evaluated(assertion, success, message)
        }
        Some(Err(error)) => ResultAssertion::failed(assertion, error),
        None => ResultAssertion::failed(
            assertion,
            format!(
                "the comparison {} was not supported for the source ({} {})",
                assertion.comparison,
                assertion.source,
                value.kind()
            ),
        ),
    }
}

enum Resolved {
    Value(Value),
    /// Nothing at the requested location; the flag is the outcome
    Absent(bool),
    Error(String),
}

fn resolve(assertion: &Assertion, response: &Response) -> Resolved {
    let property = assertion.property.as_str();
    match assertion.source {
        Source::Status => Resolved::Value(Value::Number(f64::from(response.status_code))),
        Source::Time => Resolved::Value(Value::Number(response.time_elapsed.as_secs_f64())),
        Source::Text => Resolved::Value(match parse_number(&response.body) {
            Some(n) => Value::Number(n),
            None => Value::String(response.body.clone()),
        }),
        Source::Json => resolve_tree(assertion, response.json(), "JSON"),
        Source::Xml => resolve_tree(assertion, response.xml(), "XML"),
        Source::Header => match response.headers.get(property) {
            Some(_) if assertion.comparison == Comparison::HasKey => Resolved::Absent(true),
            Some(values) => Resolved::Value(Value::String(
                values.first().cloned().unwrap_or_default(),
            )),
            None => match assertion.comparison {
                Comparison::IsNull | Comparison::HasKey => Resolved::Absent(true),
                _ => Resolved::Error(format!("Header {:?} not found.", property)),
            },
        },
    }
}

fn resolve_tree(
    assertion: &Assertion,
    tree: std::result::Result<&Value, String>,
    format: &str,
) -> Resolved {
    let root = match tree {
        Ok(root) => root,
        Err(error) => return Resolved::Error(error),
    };
    match root.lookup(&assertion.property) {
        Some(value) => Resolved::Value(value.clone()),
        None if assertion.comparison == Comparison::IsNull => Resolved::Absent(true),
        None => Resolved::Error(format!(
            "Unable to locate {} property in path '{}' in {}",
            assertion.property, assertion.property, format
        )),
    }
}

/// Compare a resolved value with the expected literal
pub fn compare(comparison: Comparison, value: &Value, expected: &str) -> Outcome {
    match value {
        Value::Number(n) => compare_number(comparison, *n, expected),
        Value::String(s) => compare_string(comparison, s, expected),
        Value::Bool(b) => compare_bool(comparison, *b, expected),
        Value::Array(items) => compare_array(comparison, items, expected),
        Value::Object(map) => compare_object(comparison, map, expected),
        Value::Null => compare_null(comparison),
    }
}

fn expected_number(comparison: Comparison, expected: &str) -> std::result::Result<f64, String> {
    parse_number(expected)
        .ok_or_else(|| format!("'{}' should be a number to compare with {}", expected, comparison))
}

fn compare_number(comparison: Comparison, n: f64, expected: &str) -> Outcome {
    use Comparison as C;
    let result = match comparison {
        C::IsANumber => Ok(true),
        C::Equal => Ok(format_number(n) == expected),
        C::NotEqual => Ok(format_number(n) != expected),
        C::EqualNumber => parse_number(expected)
            .map(|e| n == e)
            .ok_or_else(|| format!("'{}' was not a number impossible to use equal_number", expected)),
        C::IsLessThan => expected_number(comparison, expected).map(|e| n < e),
        C::IsLessThanOrEqual => expected_number(comparison, expected).map(|e| n <= e),
        C::IsGreaterThan => expected_number(comparison, expected).map(|e| n > e),
        C::IsGreaterThanOrEqual => expected_number(comparison, expected).map(|e| n >= e),
        C::Contains
        | C::DoesNotContain
        | C::NotEmpty
        | C::Empty
        | C::IsNull
        | C::HasValue
        | C::HasKey => return None,
    };
    Some(result)
}

fn compare_string(comparison: Comparison, s: &str, expected: &str) -> Outcome {
    use Comparison as C;
    let result = match comparison {
        C::Equal => Ok(s == expected),
        C::NotEqual => Ok(s != expected),
        C::Contains => Ok(s.contains(expected)),
        C::DoesNotContain => Ok(!s.contains(expected)),
        C::IsANumber => Ok(is_numeric(s)),
        C::EqualNumber => match (parse_number(s), parse_number(expected)) {
            (Some(actual), Some(e)) => Ok(actual == e),
            (None, _) => Err(format!("'{}' was not a number impossible to use equal_number", s)),
            (Some(_), None) => Err(format!(
                "'{}' was not a number impossible to use equal_number",
                expected
            )),
        },
        C::IsLessThan => Ok(s < expected),
        C::IsLessThanOrEqual => Ok(s <= expected),
        C::IsGreaterThan => Ok(s > expected),
        C::IsGreaterThanOrEqual => Ok(s >= expected),
        C::NotEmpty => Ok(!s.trim().is_empty()),
        C::Empty => Ok(s.trim().is_empty()),
        C::IsNull | C::HasValue | C::HasKey => return None,
    };
    Some(result)
}

/// Boolean literals in the spellings scenario files have always accepted
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn compare_bool(comparison: Comparison, b: bool, expected: &str) -> Outcome {
    use Comparison as C;
    let parsed = || {
        parse_bool(expected).ok_or_else(|| {
            format!("'{}' was not comparable with a boolean value {}", expected, b)
        })
    };
    let result = match comparison {
        C::Equal => parsed().map(|e| b == e),
        C::NotEqual => parsed().map(|e| b != e),
        C::EqualNumber
        | C::IsANumber
        | C::IsLessThan
        | C::IsLessThanOrEqual
        | C::IsGreaterThan
        | C::IsGreaterThanOrEqual
        | C::Contains
        | C::DoesNotContain
        | C::NotEmpty
        | C::Empty
        | C::IsNull
        | C::HasValue
        | C::HasKey => return None,
    };
    Some(result)
}

/// Recursive `equal` used by `has_value`; anything that cannot be compared
/// is simply not a match.
fn is_equal(value: &Value, expected: &str) -> bool {
    matches!(compare(Comparison::Equal, value, expected), Some(Ok(true)))
}

fn compare_array(comparison: Comparison, items: &[Value], expected: &str) -> Outcome {
    use Comparison as C;
    let contains = || items.iter().any(|item| item.to_string() == expected);
    let result = match comparison {
        C::IsNull => Ok(false),
        C::NotEmpty => Ok(!items.is_empty()),
        C::Empty => Ok(items.is_empty()),
        C::Contains => Ok(contains()),
        C::DoesNotContain => Ok(!contains()),
        C::HasValue => Ok(items.iter().any(|item| is_equal(item, expected))),
        C::EqualNumber
        | C::Equal
        | C::NotEqual
        | C::IsANumber
        | C::IsLessThan
        | C::IsLessThanOrEqual
        | C::IsGreaterThan
        | C::IsGreaterThanOrEqual
        | C::HasKey => return None,
    };
    Some(result)
}

fn compare_object(comparison: Comparison, map: &IndexMap<String, Value>, expected: &str) -> Outcome {
    use Comparison as C;
    let result = match comparison {
        C::NotEmpty => Ok(!map.is_empty()),
        C::Empty => Ok(map.is_empty()),
        C::HasKey => Ok(map.contains_key(expected)),
        C::HasValue => Ok(map.values().any(|v| is_equal(v, expected))),
        C::EqualNumber
        | C::Equal
        | C::NotEqual
        | C::IsANumber
        | C::IsLessThan
        | C::IsLessThanOrEqual
        | C::IsGreaterThan
        | C::IsGreaterThanOrEqual
        | C::Contains
        | C::DoesNotContain
        | C::IsNull => return None,
    };
    Some(result)
}

fn compare_null(comparison: Comparison) -> Outcome {
    use Comparison as C;
    match comparison {
        C::IsNull => Some(Ok(true)),
        C::EqualNumber
        | C::Equal
        | C::NotEqual
        | C::IsANumber
        | C::IsLessThan
        | C::IsLessThanOrEqual
        | C::IsGreaterThan
        | C::IsGreaterThanOrEqual
        | C::Contains
        | C::DoesNotContain
        | C::NotEmpty
        | C::Empty
        | C::HasValue
        | C::HasKey => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeaderMap;
    use std::time::Duration;

    const USER_JSON: &str = r#"{
        "id": "2819c223-7f76-453a-919d-413861904646",
        "userName": "bjensen@example.com",
        "active": true,
        "age": 42,
        "building": null,
        "name": {"familyName": "Jensen", "givenName": "Barbara"},
        "emails": [{"value": "bjensen@example.com", "type": "work"}],
        "tags": ["a", "b", "c"],
        "scores": [1, 2.5],
        "meta": {}
    }"#;

    fn response(status: u16, body: &str) -> Response {
        let headers: HeaderMap = [
            ("Content-Type", "application/json"),
            ("X-Count", "12"),
        ]
        .into_iter()
        .collect();
        Response::new(status, Duration::from_millis(1100), body, headers)
    }

    fn json(comparison: Comparison, property: &str, value: &str) -> ResultAssertion {
        let assertion = Assertion::new(comparison, value, Source::Json).with_property(property);
        evaluate(&assertion, &response(200, USER_JSON))
    }

    #[test]
    fn test_status_equal_number() {
        let assertion = Assertion::new(Comparison::EqualNumber, "200", Source::Status);
        let result = evaluate(&assertion, &response(200, ""));
        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.message, "'200' was a number equal to 200");

        let assertion = Assertion::new(Comparison::EqualNumber, "qwerty", Source::Status);
        let result = evaluate(&assertion, &response(200, ""));
        assert!(!result.success);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_status_equal_fails_with_message() {
        let assertion = Assertion::new(Comparison::Equal, "200", Source::Status);
        let result = evaluate(&assertion, &response(404, ""));
        assert!(!result.success);
        assert!(result.error.is_none());
        assert_eq!(result.message, "'404' was not equal to 200");
    }

    #[test]
    fn test_time_equal_is_textual() {
        let equal = Assertion::new(Comparison::Equal, "1.1000", Source::Time);
        assert!(!evaluate(&equal, &response(200, "")).success);

        let equal_number = Assertion::new(Comparison::EqualNumber, "1.1000", Source::Time);
        assert!(evaluate(&equal_number, &response(200, "")).success);

        let not_equal = Assertion::new(Comparison::NotEqual, "1.1000", Source::Time);
        assert!(evaluate(&not_equal, &response(200, "")).success);
    }

    #[test]
    fn test_time_ordering() {
        let assertion = Assertion::new(Comparison::IsLessThan, "2", Source::Time);
        assert!(evaluate(&assertion, &response(200, "")).success);

        let assertion = Assertion::new(Comparison::IsGreaterThan, "two", Source::Time);
        let result = evaluate(&assertion, &response(200, ""));
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("'two' should be a number to compare with is_greater_than")
        );
    }

    #[test]
    fn test_number_rejects_string_operators() {
        let assertion = Assertion::new(Comparison::Contains, "20", Source::Status);
        let result = evaluate(&assertion, &response(200, ""));
        assert!(!result.success);
        assert!(result
            .error
            .unwrap()
            .starts_with("the comparison contains was not supported"));
    }

    #[test]
    fn test_json_string_operators() {
        assert!(json(Comparison::Equal, "name.familyName", "Jensen").success);
        assert!(json(Comparison::NotEqual, "name.familyName", "Doe").success);
        assert!(json(Comparison::Contains, "userName", "@example").success);
        assert!(json(Comparison::DoesNotContain, "userName", "@test").success);
        assert!(json(Comparison::NotEmpty, "emails[0].type", "").success);
        assert!(!json(Comparison::Empty, "emails[0].type", "").success);
        assert!(!json(Comparison::IsANumber, "emails[0].type", "").success);
        assert!(json(Comparison::IsLessThan, "name.familyName", "Karl").success);
        assert!(json(Comparison::IsGreaterThanOrEqual, "name.givenName", "Barbara").success);
    }

    #[test]
    fn test_blank_string_is_empty() {
        let body = r#"{"blank": "   ", "padded": " x "}"#;
        let check = |comparison, property: &str| {
            let assertion = Assertion::new(comparison, "", Source::Json).with_property(property);
            evaluate(&assertion, &response(200, body)).success
        };

        assert!(check(Comparison::Empty, "blank"));
        assert!(!check(Comparison::NotEmpty, "blank"));
        assert!(check(Comparison::NotEmpty, "padded"));
        assert!(!check(Comparison::Empty, "padded"));
    }

    #[test]
    fn test_json_large_number_uses_exponent() {
        let body = r#"{"big": 1e21, "count": 1234567}"#;
        let assertion =
            Assertion::new(Comparison::Equal, "1e+21", Source::Json).with_property("big");
        assert!(evaluate(&assertion, &response(200, body)).success);

        let assertion = Assertion::new(Comparison::Equal, "1.234567e+06", Source::Json)
            .with_property("count");
        assert!(evaluate(&assertion, &response(200, body)).success);
    }

    #[test]
    fn test_json_numeric_string() {
        let body = r#"{"amount": "1500.00", "code": "id_2"}"#;
        let assertion = Assertion::new(Comparison::EqualNumber, "1500", Source::Json)
            .with_property("amount");
        assert!(evaluate(&assertion, &response(200, body)).success);

        let assertion =
            Assertion::new(Comparison::EqualNumber, "2", Source::Json).with_property("code");
        let result = evaluate(&assertion, &response(200, body));
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("'id_2' was not a number impossible to use equal_number")
        );
    }

    #[test]
    fn test_json_number() {
        assert!(json(Comparison::Equal, "age", "42").success);
        assert!(json(Comparison::IsANumber, "age", "").success);
        assert!(json(Comparison::IsGreaterThanOrEqual, "age", "42").success);
        assert!(!json(Comparison::IsLessThanOrEqual, "age", "41.5").success);
    }

    #[test]
    fn test_json_bool() {
        assert!(json(Comparison::Equal, "active", "true").success);
        assert!(json(Comparison::NotEqual, "active", "F").success);

        let result = json(Comparison::Equal, "active", "yes");
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("'yes' was not comparable with a boolean value true")
        );

        assert!(json(Comparison::IsANumber, "active", "").error.is_some());
    }

    #[test]
    fn test_json_null() {
        let result = json(Comparison::IsNull, "building", "");
        assert!(result.success);
        assert_eq!(result.message, "'building' was null");

        let result = json(Comparison::IsNull, "floor", "");
        assert!(result.success);

        let result = json(Comparison::Equal, "floor", "1");
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Unable to locate floor property in path 'floor' in JSON")
        );

        assert!(json(Comparison::Empty, "building", "").error.is_some());
    }

    #[test]
    fn test_json_array() {
        let result = json(Comparison::HasValue, "tags", "b");
        assert!(result.success);
        assert_eq!(result.message, "'tags' had value b");
        assert!(!json(Comparison::HasValue, "tags", "z").success);

        assert!(json(Comparison::Contains, "scores", "2.5").success);
        assert!(json(Comparison::DoesNotContain, "scores", "3").success);
        assert!(json(Comparison::NotEmpty, "tags", "").success);
        assert!(!json(Comparison::Empty, "emails", "").success);
        assert!(!json(Comparison::IsNull, "tags", "").success);
        assert!(json(Comparison::Equal, "tags", "a").error.is_some());
    }

    #[test]
    fn test_json_object() {
        assert!(json(Comparison::HasKey, "name", "givenName").success);
        assert!(!json(Comparison::HasKey, "name", "middleName").success);
        assert!(json(Comparison::HasValue, "name", "Jensen").success);
        assert!(json(Comparison::Empty, "meta", "").success);
        assert!(!json(Comparison::NotEmpty, "meta", "").success);
        assert!(json(Comparison::NotEmpty, "", "").success);
        assert!(json(Comparison::IsNull, "name", "").error.is_some());
    }

    #[test]
    fn test_json_invalid_body() {
        let assertion = Assertion::new(Comparison::Equal, "1", Source::Json).with_property("a");
        let result = evaluate(&assertion, &response(200, "<html></html>"));
        assert!(!result.success);
        assert!(result
            .error
            .unwrap()
            .starts_with("there is a result and this is not a valid JSON"));
    }

    #[test]
    fn test_headers() {
        let has_key = Assertion::new(Comparison::HasKey, "", Source::Header)
            .with_property("content-type");
        let result = evaluate(&has_key, &response(200, ""));
        assert!(result.success);
        assert_eq!(result.message, "'content-type' key does exist");

        let equal = Assertion::new(Comparison::Equal, "application/json", Source::Header)
            .with_property("Content-Type");
        assert!(evaluate(&equal, &response(200, "")).success);

        // header values are strings, ordered lexicographically
        let ordered = Assertion::new(Comparison::IsGreaterThan, "9", Source::Header)
            .with_property("X-Count");
        assert!(!evaluate(&ordered, &response(200, "")).success);

        let missing = Assertion::new(Comparison::Equal, "x", Source::Header)
            .with_property("X-Missing");
        let result = evaluate(&missing, &response(200, ""));
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Header \"X-Missing\" not found."));

        let null = Assertion::new(Comparison::IsNull, "", Source::Header)
            .with_property("X-Missing");
        assert!(evaluate(&null, &response(200, "")).success);

        let has_key_missing = Assertion::new(Comparison::HasKey, "", Source::Header)
            .with_property("X-Missing");
        assert!(evaluate(&has_key_missing, &response(200, "")).success);
    }

    #[test]
    fn test_text() {
        let assertion = Assertion::new(Comparison::Contains, "world", Source::Text);
        assert!(evaluate(&assertion, &response(200, "hello world")).success);

        let assertion = Assertion::new(Comparison::IsGreaterThan, "9", Source::Text);
        assert!(evaluate(&assertion, &response(200, "42")).success);
    }

    #[test]
    fn test_xml() {
        let body = "<user><name>Jensen</name><group>a</group><group>b</group></user>";
        let assertion =
            Assertion::new(Comparison::Equal, "Jensen", Source::Xml).with_property("name");
        assert!(evaluate(&assertion, &response(200, body)).success);

        let assertion =
            Assertion::new(Comparison::HasValue, "b", Source::Xml).with_property("group");
        assert!(evaluate(&assertion, &response(200, body)).success);
    }

    #[test]
    fn test_every_comparison_is_placed_for_every_kind() {
        let values = [
            Value::Null,
            Value::Bool(true),
            Value::Number(1.0),
            Value::String("a".into()),
            Value::Array(vec![]),
            Value::Object(IndexMap::new()),
        ];
        let supported: usize = values
            .iter()
            .map(|v| {
                Comparison::ALL
                    .iter()
                    .filter(|c| compare(**c, v, "1").is_some())
                    .count()
            })
            .sum();
        // null 1 + bool 2 + number 8 + string 12 + array 6 + object 4
        assert_eq!(supported, 33);
    }
}
