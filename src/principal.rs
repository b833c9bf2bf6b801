use {
    crate::{
        display_json,
        serutil::{json_type_name, string_sequence},
        PolicyError,
    },
    log::debug,
    serde::{de, de::Deserializer, ser::Serializer, Deserialize, Serialize},
    serde_json::Value,
    std::collections::BTreeMap,
};

/// Principal types (e.g. `AWS`, `Service`, `Federated`, `CanonicalUser`) to
/// the ordered sequence of principal values named under each. A single JSON
/// string and a one-element array decode identically.
pub type PrincipalMap = BTreeMap<String, Vec<String>>;

/// The `Principal` element of a statement.
///
/// Aspen allows the principal to be either the literal string `"*"` (any
/// principal) or a map of principal types to values. The two spellings are
/// kept distinct: `"*"` decodes to [Principal::Any], never to an equivalent
/// `{"AWS": ["*"]}` map, and each form re-encodes as it was written.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Principal {
    Any,
    Specified(PrincipalMap),
}

impl Principal {
    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// The principal map, if this is a specified principal.
    #[inline]
    pub fn specified(&self) -> Option<&PrincipalMap> {
        match self {
            Self::Any => None,
            Self::Specified(map) => Some(map),
        }
    }

    /// The values listed for a principal type, if this is a specified
    /// principal naming that type.
    #[inline]
    pub fn get(&self, principal_type: &str) -> Option<&Vec<String>> {
        self.specified().and_then(|map| map.get(principal_type))
    }

    pub(crate) fn from_value(value: &Value) -> Result<Self, PolicyError> {
        match value {
            Value::String(s) if s == "*" => Ok(Self::Any),
            Value::Object(entries) => {
                let mut map = PrincipalMap::new();
                for (principal_type, values) in entries {
                    map.insert(principal_type.clone(), string_sequence(principal_type, values)?);
                }
                Ok(Self::Specified(map))
            }
            _ => {
                debug!("Principal is not \"*\" or an object: {}", value);
                Err(PolicyError::TypeMismatch {
                    field: "Principal".to_string(),
                    expected: "\"*\" or map of principal types to values",
                    found: json_type_name(value),
                })
            }
        }
    }
}

impl From<PrincipalMap> for Principal {
    fn from(map: PrincipalMap) -> Self {
        Self::Specified(map)
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(de::Error::custom)
    }
}

impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Any => serializer.serialize_str("*"),
            Self::Specified(map) => map.serialize(serializer),
        }
    }
}

display_json!(Principal);

#[cfg(test)]
mod tests {
    use {
        crate::{Principal, PrincipalMap},
        indoc::indoc,
        pretty_assertions::assert_eq,
        serde_json::json,
    };

    #[test_log::test]
    fn test_any() {
        let principal = Principal::from_value(&json!("*")).unwrap();
        assert_eq!(principal, Principal::Any);
        assert!(principal.is_any());
        assert!(principal.specified().is_none());
        assert!(principal.get("AWS").is_none());
        assert_eq!(format!("{}", principal), r#""*""#);
    }

    #[test_log::test]
    fn test_any_is_not_an_aws_wildcard_map() {
        let any = Principal::from_value(&json!("*")).unwrap();
        let wildcard_map = Principal::from_value(&json!({"AWS": ["*"]})).unwrap();
        assert!(!wildcard_map.is_any());
        assert_ne!(any, wildcard_map);
    }

    #[test_log::test]
    fn test_specified() {
        let principal = Principal::from_value(&json!({
            "AWS": "arn:aws:iam::1234567890:root",
            "Service": ["ec2.amazonaws.com", "lambda.amazonaws.com"]
        }))
        .unwrap();

        assert_eq!(principal.get("AWS").unwrap(), &vec!["arn:aws:iam::1234567890:root".to_string()]);
        assert_eq!(
            principal.get("Service").unwrap(),
            &vec!["ec2.amazonaws.com".to_string(), "lambda.amazonaws.com".to_string()]
        );
        assert!(principal.get("Federated").is_none());
        assert_eq!(principal.specified().unwrap().len(), 2);
    }

    #[test_log::test]
    fn test_scalar_equals_one_element_array() {
        let scalar = Principal::from_value(&json!({"AWS": "123456789012"})).unwrap();
        let list = Principal::from_value(&json!({"AWS": ["123456789012"]})).unwrap();
        assert_eq!(scalar, list);
    }

    #[test_log::test]
    fn test_bad_shapes() {
        let e = Principal::from_value(&json!("123456789012")).unwrap_err();
        assert_eq!(
            e.to_string(),
            "Invalid type for Principal: expected \"*\" or map of principal types to values, found string"
        );

        let e = Principal::from_value(&json!(["*"])).unwrap_err();
        assert_eq!(
            e.to_string(),
            "Invalid type for Principal: expected \"*\" or map of principal types to values, found array"
        );

        let e = Principal::from_value(&json!({"AWS": 123456789012_u64})).unwrap_err();
        assert_eq!(e.to_string(), "Invalid type for AWS: expected string or array of strings, found number");
    }

    #[test_log::test]
    fn test_formatting() {
        let mut map = PrincipalMap::new();
        map.insert(
            "AWS".to_string(),
            vec!["123456789012".to_string(), "arn:aws:iam::123456789012:role/test".to_string()],
        );
        let principal = Principal::from(map);

        assert_eq!(
            format!("{}", principal),
            indoc! { r#"
            {
                "AWS": [
                    "123456789012",
                    "arn:aws:iam::123456789012:role/test"
                ]
            }"# }
        );
    }

    #[test_log::test]
    fn test_serde_roundtrip() {
        let principal: Principal = serde_json::from_str(r#"{"AWS": "123456789012"}"#).unwrap();
        let json = serde_json::to_string(&principal).unwrap();
        let again: Principal = serde_json::from_str(&json).unwrap();
        assert_eq!(principal, again);

        let principal: Principal = serde_json::from_str(r#""*""#).unwrap();
        assert_eq!(serde_json::to_string(&principal).unwrap(), r#""*""#);
    }
}
