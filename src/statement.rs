use {
    crate::{
        display_json, from_str_json,
        serutil::{json_type_name, parse_document, string_sequence},
        Condition, PolicyError, Principal,
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

/// A single permission statement within a policy.
///
/// The effect is carried as a free-form string (`"Allow"`/`"Deny"` by
/// convention); this layer does not validate it against the allowed values.
/// `Action` and `Resource` decode to ordered sequences via the one-or-many
/// rule and are empty when absent. Statement-level keys this model does not
/// carry (`Sid`, `NotAction`, ...) are ignored when decoding.
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
pub struct Statement {
    #[builder(setter(into), default)]
    effect: String,

    #[builder(setter(into), default)]
    action: Vec<String>,

    #[builder(setter(into, strip_option), default)]
    principal: Option<Principal>,

    #[builder(setter(into), default)]
    resource: Vec<String>,

    #[builder(setter(into), default)]
    condition: Condition,
}

impl Statement {
    #[inline]
    pub fn builder() -> StatementBuilder {
        StatementBuilder::default()
    }

    #[inline]
    pub fn effect(&self) -> &str {
        &self.effect
    }

    #[inline]
    pub fn action(&self) -> &[String] {
        &self.action
    }

    #[inline]
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    #[inline]
    pub fn resource(&self) -> &[String] {
        &self.resource
    }

    #[inline]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Decode a single statement from raw JSON bytes.
    pub fn from_json(data: &[u8]) -> Result<Self, PolicyError> {
        Self::from_value(&parse_document(data)?)
    }

    pub(crate) fn from_value(value: &Value) -> Result<Self, PolicyError> {
        let object = match value {
            Value::Object(object) => object,
            _ => {
                debug!("Statement is not an object: {}", value);
                return Err(PolicyError::TypeMismatch {
                    field: "Statement".to_string(),
                    expected: "object or array of objects",
                    found: json_type_name(value),
                });
            }
        };

        let effect = match object.get("Effect") {
            None => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                debug!("Effect is not a string: {}", other);
                return Err(PolicyError::TypeMismatch {
                    field: "Effect".to_string(),
                    expected: "string",
                    found: json_type_name(other),
                });
            }
        };

        let action = match object.get("Action") {
            None => Vec::new(),
            Some(value) => string_sequence("Action", value)?,
        };

        let principal = match object.get("Principal") {
            None => None,
            Some(value) => Some(Principal::from_value(value)?),
        };

        let resource = match object.get("Resource") {
            None => Vec::new(),
            Some(value) => string_sequence("Resource", value)?,
        };

        let condition = match object.get("Condition") {
            None => Condition::new(),
            Some(value) => Condition::from_value(value)?,
        };

        Ok(Self {
            effect,
            action,
            principal,
            resource,
            condition,
        })
    }

    /// Decode the `Statement` element of a policy: a single statement object
    /// or an array of statement objects, normalized to a vector either way.
    pub(crate) fn list_from_value(value: &Value) -> Result<Vec<Self>, PolicyError> {
        match value {
            Value::Object(_) => Ok(vec![Self::from_value(value)?]),
            Value::Array(items) => items.iter().map(Self::from_value).collect(),
            _ => {
                debug!("Statement is not an object or array: {}", value);
                Err(PolicyError::TypeMismatch {
                    field: "Statement".to_string(),
                    expected: "object or array of objects",
                    found: json_type_name(value),
                })
            }
        }
    }
}

display_json!(Statement);
from_str_json!(Statement);

impl<'de> Deserialize<'de> for Statement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(de::Error::custom)
    }
}

impl Serialize for Statement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(None)?;
        state.serialize_entry("Effect", &self.effect)?;
        if !self.action.is_empty() {
            state.serialize_entry("Action", &self.action)?;
        }
        if let Some(principal) = &self.principal {
            state.serialize_entry("Principal", principal)?;
        }
        if !self.resource.is_empty() {
            state.serialize_entry("Resource", &self.resource)?;
        }
        if !self.condition.is_empty() {
            state.serialize_entry("Condition", &self.condition)?;
        }
        state.end()
    }
}
