//! Records, delete selectors and bounded structural cloning.

use serde_json::{Map, Value};
use stagehand_core::error::DomainError;

/// Arbitrary nested data stored for a `(partition, user)` pair.
pub type Record = Value;

/// Limits applied when cloning caller-supplied data into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Maximum container nesting depth.
    pub max_depth: usize,
    /// Maximum number of values (containers and scalars) in one record.
    pub max_nodes: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_nodes: 10_000,
        }
    }
}

/// The record returned for users with no stored data.
#[must_use]
pub fn empty_record() -> Record {
    Value::Object(Map::new())
}

/// Whether `value` is a map or a list.
#[must_use]
pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Whether `value` is a map or list holding at least one element.
#[must_use]
pub fn is_populated(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

/// Selects the element `Registry::delete` removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Zero-based position in a list record.
    Index(usize),
    /// Key in a map record.
    Key(String),
}

impl Selector {
    /// Interprets an untyped host value as a selector.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` unless `value` is a
    /// non-negative integer or a string.
    pub fn from_value(value: &Value) -> Result<Self, DomainError> {
        match value {
            Value::String(key) => Ok(Self::Key(key.clone())),
            Value::Number(number) => number
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Self::Index)
                .ok_or_else(|| {
                    DomainError::InvalidArgument(format!(
                        "delete position must be a non-negative integer, got {number}"
                    ))
                }),
            other => Err(DomainError::InvalidArgument(format!(
                "delete selector must be a position or a key, got {other}"
            ))),
        }
    }

    /// Removes the selected element from `record`. Returns `false` when
    /// nothing matched: an out-of-range position, an absent key, or a
    /// selector kind that does not fit the record's shape.
    pub(crate) fn remove_from(&self, record: &mut Record) -> bool {
        match (self, record) {
            (Self::Index(index), Value::Array(items)) if *index < items.len() => {
                items.remove(*index);
                true
            }
            (Self::Key(key), Value::Object(map)) => map.remove(key).is_some(),
            _ => false,
        }
    }
}

impl From<usize> for Selector {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Self::Key(value.to_owned())
    }
}

impl From<String> for Selector {
    fn from(value: String) -> Self {
        Self::Key(value)
    }
}

/// Clones `value` while enforcing the depth and size limits in `config`.
///
/// # Errors
///
/// Returns `DomainError::InvalidArgument` if the value nests deeper than
/// `max_depth` containers or holds more than `max_nodes` values.
pub fn structural_clone(value: &Value, config: &RegistryConfig) -> Result<Value, DomainError> {
    let mut nodes = 0;
    clone_bounded(value, 0, &mut nodes, config)
}

fn clone_bounded(
    value: &Value,
    depth: usize,
    nodes: &mut usize,
    config: &RegistryConfig,
) -> Result<Value, DomainError> {
    *nodes += 1;
    if *nodes > config.max_nodes {
        return Err(DomainError::InvalidArgument(format!(
            "record exceeds {} values",
            config.max_nodes
        )));
    }
    if is_container(value) && depth >= config.max_depth {
        return Err(DomainError::InvalidArgument(format!(
            "record nests deeper than {} levels",
            config.max_depth
        )));
    }

    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| clone_bounded(item, depth + 1, nodes, config))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => map
            .iter()
            .map(|(key, item)| -> Result<(String, Value), DomainError> {
                Ok((key.clone(), clone_bounded(item, depth + 1, nodes, config)?))
            })
            .collect::<Result<Map<String, Value>, _>>()
            .map(Value::Object),
        scalar => Ok(scalar.clone()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn nested_lists(depth: usize) -> Value {
        let mut value = json!(1);
        for _ in 0..depth {
            value = Value::Array(vec![value]);
        }
        value
    }

    #[test]
    fn test_structural_clone_copies_nested_data() {
        let original = json!({"items": [{"id": 1}, {"id": 2}], "name": "kit"});

        let cloned = structural_clone(&original, &RegistryConfig::default()).unwrap();

        assert_eq!(cloned, original);
    }

    #[test]
    fn test_structural_clone_accepts_max_depth() {
        let config = RegistryConfig {
            max_depth: 4,
            max_nodes: 100,
        };

        assert!(structural_clone(&nested_lists(4), &config).is_ok());
    }

    #[test]
    fn test_structural_clone_rejects_excessive_depth() {
        // Arrange
        let config = RegistryConfig {
            max_depth: 4,
            max_nodes: 100,
        };

        // Act
        let result = structural_clone(&nested_lists(5), &config);

        // Assert
        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
    }

    #[test]
    fn test_structural_clone_rejects_too_many_values() {
        let config = RegistryConfig {
            max_depth: 8,
            max_nodes: 10,
        };
        let wide = Value::Array((0..10).map(Value::from).collect());

        let result = structural_clone(&wide, &config);

        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
    }

    #[test]
    fn test_selector_from_value_accepts_positions_and_keys() {
        assert_eq!(Selector::from_value(&json!(2)).unwrap(), Selector::Index(2));
        assert_eq!(
            Selector::from_value(&json!("sword")).unwrap(),
            Selector::Key("sword".to_owned())
        );
    }

    #[test]
    fn test_selector_from_value_rejects_other_shapes() {
        for value in [json!(-1), json!(1.5), json!(true), json!(null), json!([0])] {
            assert!(
                matches!(
                    Selector::from_value(&value),
                    Err(DomainError::InvalidArgument(_))
                ),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_remove_from_ignores_out_of_range_position() {
        let mut record = json!(["a", "b"]);

        let removed = Selector::Index(5).remove_from(&mut record);

        assert!(!removed);
        assert_eq!(record, json!(["a", "b"]));
    }

    #[test]
    fn test_remove_from_removes_map_key() {
        let mut record = json!({"a": 1, "b": 2});

        let removed = Selector::from("a").remove_from(&mut record);

        assert!(removed);
        assert_eq!(record, json!({"b": 2}));
    }

    #[test]
    fn test_is_populated_distinguishes_empty_containers() {
        assert!(!is_populated(&json!({})));
        assert!(!is_populated(&json!([])));
        assert!(!is_populated(&json!("text")));
        assert!(is_populated(&json!([0])));
        assert!(is_populated(&json!({"k": null})));
    }
}
