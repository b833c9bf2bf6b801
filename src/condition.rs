use {
    crate::{
        display_json, from_str_json,
        serutil::{json_type_name, parse_document, string_sequence},
        PolicyError,
    },
    log::debug,
    serde::{de, de::Deserializer, ser::Serializer, Deserialize, Serialize},
    serde_json::Value,
    std::{
        borrow::Borrow,
        collections::{
            btree_map::{Entry, IntoIter, Iter, Keys, Values},
            BTreeMap,
        },
        iter::{FromIterator, IntoIterator},
    },
};

/// The values recorded under a single condition operator: condition key
/// (e.g. `aws:PrincipalAccount`) to an ordered sequence of allowed values.
/// A single JSON string and a one-element array decode identically.
pub type ConditionMap = BTreeMap<String, Vec<String>>;

/// The `Condition` element of a statement: condition operator name
/// (e.g. `StringEquals`) to the keys and values it constrains.
///
/// Operator names are not validated against the set of operators AWS defines;
/// this layer only enforces the two-level mapping-to-sequence shape. A
/// statement without a `Condition` element decodes to an empty map.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Condition {
    map: BTreeMap<String, ConditionMap>,
}

impl Condition {
    #[inline]
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        String: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.contains_key(key)
    }

    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&ConditionMap>
    where
        String: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.get(key)
    }

    #[inline]
    pub fn entry(&mut self, key: String) -> Entry<'_, String, ConditionMap> {
        self.map.entry(key)
    }

    #[inline]
    pub fn insert(&mut self, key: String, value: ConditionMap) -> Option<ConditionMap> {
        self.map.insert(key, value)
    }

    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<ConditionMap>
    where
        String: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.remove(key)
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, String, ConditionMap> {
        self.map.iter()
    }

    #[inline]
    pub fn keys(&self) -> Keys<'_, String, ConditionMap> {
        self.map.keys()
    }

    #[inline]
    pub fn values(&self) -> Values<'_, String, ConditionMap> {
        self.map.values()
    }

    /// Decode a `Condition` element from raw JSON bytes.
    pub fn from_json(data: &[u8]) -> Result<Self, PolicyError> {
        Self::from_value(&parse_document(data)?)
    }

    pub(crate) fn from_value(value: &Value) -> Result<Self, PolicyError> {
        let operators = match value {
            Value::Object(operators) => operators,
            _ => {
                debug!("Condition is not an object: {}", value);
                return Err(PolicyError::MalformedCondition(format!(
                    "expected an object of condition operators, found {}",
                    json_type_name(value)
                )));
            }
        };

        let mut map = BTreeMap::new();
        for (operator, keys) in operators {
            let keys = match keys {
                Value::Object(keys) => keys,
                _ => {
                    debug!("Condition operator {} is not an object: {}", operator, keys);
                    return Err(PolicyError::MalformedCondition(format!(
                        "operator {} must be an object of condition keys, found {}",
                        operator,
                        json_type_name(keys)
                    )));
                }
            };

            let mut condition_map = ConditionMap::new();
            for (key, values) in keys {
                let values = string_sequence(key, values).map_err(|e| match e {
                    PolicyError::TypeMismatch {
                        found,
                        ..
                    } => PolicyError::MalformedCondition(format!(
                        "values for {}/{} must be a string or array of strings, found {}",
                        operator, key, found
                    )),
                    other => other,
                })?;
                condition_map.insert(key.clone(), values);
            }

            map.insert(operator.clone(), condition_map);
        }

        Ok(Self {
            map,
        })
    }
}

display_json!(Condition);
from_str_json!(Condition);

impl From<BTreeMap<String, ConditionMap>> for Condition {
    fn from(map: BTreeMap<String, ConditionMap>) -> Self {
        Self {
            map,
        }
    }
}

impl FromIterator<(String, ConditionMap)> for Condition {
    fn from_iter<T: IntoIterator<Item = (String, ConditionMap)>>(iter: T) -> Self {
        Self {
            map: BTreeMap::from_iter(iter),
        }
    }
}

impl IntoIterator for Condition {
    type Item = (String, ConditionMap);
    type IntoIter = IntoIter<String, ConditionMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<'a> IntoIterator for &'a Condition {
    type Item = (&'a String, &'a ConditionMap);
    type IntoIter = Iter<'a, String, ConditionMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(de::Error::custom)
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.map.serialize(serializer)
    }
}
