use {crate::PolicyError, log::debug, serde_json::Value};

/// Implement Display for a given class by formatting it as pretty-printed JSON.
#[macro_export]
macro_rules! display_json {
    ($cls:ident) => {
        impl std::fmt::Display for $cls {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                let buf = Vec::new();
                let serde_formatter = ::serde_json::ser::PrettyFormatter::with_indent(b"    ");
                let mut ser = ::serde_json::Serializer::with_formatter(buf, serde_formatter);
                match self.serialize(&mut ser) {
                    Ok(()) => (),
                    Err(e) => {
                        ::log::error!("Failed to serialize: {}", e);
                        return Err(::std::fmt::Error {});
                    }
                };
                match std::str::from_utf8(&ser.into_inner()) {
                    Ok(s) => write!(f, "{}", s),
                    Err(e) => {
                        ::log::error!("JSON serialization contained non-UTF-8 characters: {}", e);
                        Err(::std::fmt::Error {})
                    }
                }
            }
        }
    };
}

/// Implement FromStr for a given class by decoding it as a JSON document.
#[macro_export]
macro_rules! from_str_json {
    ($cls:ident) => {
        impl ::std::str::FromStr for $cls {
            type Err = $crate::PolicyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match Self::from_json(s.as_bytes()) {
                    Ok(result) => Ok(result),
                    Err(e) => {
                        ::log::debug!("Failed to parse: {}: {:?}", s, e);
                        Err(e)
                    }
                }
            }
        }
    };
}

/// Parse raw bytes into a JSON value, reporting syntax failures as
/// [PolicyError::MalformedDocument].
pub(crate) fn parse_document(data: &[u8]) -> Result<Value, PolicyError> {
    serde_json::from_slice(data).map_err(|e| {
        debug!("Input is not valid JSON: {}", e);
        PolicyError::MalformedDocument(e.to_string())
    })
}

/// The JSON type of a value, as it appears in error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalize a string-or-array-of-strings JSON value into a vector of strings.
///
/// A single string becomes a one-element vector; an array of strings becomes
/// that vector with its order preserved. Any other JSON type, including an
/// array containing a non-string element, is a type mismatch for `field`.
pub(crate) fn string_sequence(field: &str, value: &Value) -> Result<Vec<String>, PolicyError> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => {
            let mut result = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => result.push(s.clone()),
                    _ => {
                        debug!("Field {} contains a non-string element: {}", field, item);
                        return Err(PolicyError::TypeMismatch {
                            field: field.to_string(),
                            expected: "string or array of strings",
                            found: json_type_name(item),
                        });
                    }
                }
            }
            Ok(result)
        }
        _ => {
            debug!("Field {} is not a string or array: {}", field, value);
            Err(PolicyError::TypeMismatch {
                field: field.to_string(),
                expected: "string or array of strings",
                found: json_type_name(value),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::{serutil::{json_type_name, string_sequence}, PolicyError},
        pretty_assertions::assert_eq,
        serde_json::json,
    };

    #[test_log::test]
    fn test_single_string_becomes_one_element() {
        assert_eq!(string_sequence("Action", &json!("sts:AssumeRole")).unwrap(), vec!["sts:AssumeRole"]);
    }

    #[test_log::test]
    fn test_array_preserves_order() {
        let value = json!(["s3:GetObject", "s3:ListBucket", "s3:PutObject"]);
        assert_eq!(
            string_sequence("Action", &value).unwrap(),
            vec!["s3:GetObject", "s3:ListBucket", "s3:PutObject"]
        );
    }

    #[test_log::test]
    fn test_empty_array() {
        assert_eq!(string_sequence("Resource", &json!([])).unwrap(), Vec::<String>::new());
    }

    #[test_log::test]
    fn test_scalar_and_one_element_array_agree() {
        assert_eq!(
            string_sequence("Resource", &json!("*")).unwrap(),
            string_sequence("Resource", &json!(["*"])).unwrap()
        );
    }

    #[test_log::test]
    fn test_rejects_other_types() {
        let e = string_sequence("Action", &json!(42)).unwrap_err();
        assert_eq!(
            e,
            PolicyError::TypeMismatch {
                field: "Action".to_string(),
                expected: "string or array of strings",
                found: "number",
            }
        );
        assert_eq!(e.to_string(), "Invalid type for Action: expected string or array of strings, found number");

        let e = string_sequence("Action", &json!(null)).unwrap_err();
        assert_eq!(e.to_string(), "Invalid type for Action: expected string or array of strings, found null");

        let e = string_sequence("Action", &json!({"s3": "GetObject"})).unwrap_err();
        assert_eq!(e.to_string(), "Invalid type for Action: expected string or array of strings, found object");
    }

    #[test_log::test]
    fn test_rejects_non_string_array_element() {
        let e = string_sequence("Resource", &json!(["arn:aws:s3:::bucket1", 2])).unwrap_err();
        assert_eq!(e.to_string(), "Invalid type for Resource: expected string or array of strings, found number");
    }

    #[test_log::test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(true)), "boolean");
        assert_eq!(json_type_name(&json!(3)), "number");
        assert_eq!(json_type_name(&json!("s")), "string");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
