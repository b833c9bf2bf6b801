use {
    crate::{
        display_json, from_str_json,
        serutil::{json_type_name, parse_document},
        PolicyError, Statement,
    },
    derive_builder::Builder,
    log::debug,
    serde::{
        de,
        de::Deserializer,
        ser::{SerializeMap, Serializer},
        Deserialize, Serialize,
    },
    serde_json::Value,
};

/// The top-level structure holding one decoded policy document.
///
/// Decoding is the only way a `Policy` changes: the value is immutable once
/// built and holds no shared state, so decoded policies may be used freely
/// across threads.
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
pub struct Policy {
    /// The version of the policy language, e.g. `2012-10-17`. Carried as a
    /// free-form string; empty when the document omits `Version`.
    #[builder(setter(into), default)]
    version: String,

    /// An optional identifier for the policy. Accepted from either the `Id`
    /// or `ID` spelling.
    #[builder(setter(into, strip_option), default)]
    id: Option<String>,

    /// The statements of the policy, in document order. A single statement
    /// object and a one-element array decode identically. Never "nil": an
    /// empty `Statement` array yields an empty vector.
    #[builder(setter(into), default)]
    statements: Vec<Statement>,
}

impl Policy {
    #[inline]
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[inline]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Decode a policy document from raw JSON bytes.
    ///
    /// This is all-or-nothing: on error no partially-populated policy is
    /// produced. Unknown top-level keys are ignored.
    pub fn from_json(data: &[u8]) -> Result<Self, PolicyError> {
        Self::from_value(&parse_document(data)?)
    }

    pub(crate) fn from_value(value: &Value) -> Result<Self, PolicyError> {
        let object = match value {
            Value::Object(object) => object,
            _ => {
                debug!("Policy document is not an object: {}", value);
                return Err(PolicyError::MalformedDocument(format!(
                    "expected a JSON object, found {}",
                    json_type_name(value)
                )));
            }
        };

        let version = match object.get("Version") {
            None => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                debug!("Version is not a string: {}", other);
                return Err(PolicyError::TypeMismatch {
                    field: "Version".to_string(),
                    expected: "string",
                    found: json_type_name(other),
                });
            }
        };

        let id = match object.get("Id").or_else(|| object.get("ID")) {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                debug!("Id is not a string: {}", other);
                return Err(PolicyError::TypeMismatch {
                    field: "Id".to_string(),
                    expected: "string",
                    found: json_type_name(other),
                });
            }
        };

        let statements = match object.get("Statement") {
            None => return Err(PolicyError::MissingField("Statement")),
            Some(value) => Statement::list_from_value(value)?,
        };

        Ok(Self {
            version,
            id,
            statements,
        })
    }
}

display_json!(Policy);
from_str_json!(Policy);

impl<'de> Deserialize<'de> for Policy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(de::Error::custom)
    }
}

impl Serialize for Policy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(None)?;
        if !self.version.is_empty() {
            state.serialize_entry("Version", &self.version)?;
        }
        if let Some(id) = &self.id {
            state.serialize_entry("Id", id)?;
        }
        state.serialize_entry("Statement", &self.statements)?;
        state.end()
    }
}
