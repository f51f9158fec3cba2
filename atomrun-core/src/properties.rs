//! Dynamic process properties
//!
//! Runtime key/value overrides passed into a single execution. On the command
//! line they are written as `key:value` pairs separated by `;`, for example
//! `DPP_1:abc123;DPP_2:xyz 321`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A single dynamic process property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicProperty {
    pub name: String,
    pub value: String,
}

/// Ordered list of dynamic process properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicProperties(Vec<DynamicProperty>);

impl DynamicProperties {
    /// Parse a `key:value;key:value` string
    ///
    /// Each pair is split on its first `:` only, so values may contain `:`.
    /// Blank segments left by leading, trailing or repeated `;` are skipped.
    ///
    /// # Errors
    /// Returns [`ValidationError::MalformedProperty`] for the first segment
    /// that has no `:` at all.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let mut properties = Vec::new();

        for pair in input.trim().split(';').filter(|pair| !pair.is_empty()) {
            let (name, value) = pair
                .split_once(':')
                .ok_or_else(|| ValidationError::MalformedProperty(pair.to_string()))?;

            properties.push(DynamicProperty {
                name: name.to_string(),
                value: value.to_string(),
            });
        }

        Ok(Self(properties))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DynamicProperty> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[DynamicProperty] {
        &self.0
    }
}

impl From<Vec<(String, String)>> for DynamicProperties {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(name, value)| DynamicProperty { name, value })
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a DynamicProperties {
    type Item = &'a DynamicProperty;
    type IntoIter = std::slice::Iter<'a, DynamicProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(props: &DynamicProperties) -> Vec<(&str, &str)> {
        props
            .iter()
            .map(|p| (p.name.as_str(), p.value.as_str()))
            .collect()
    }

    #[test]
    fn test_parse_preserves_order() {
        let props = DynamicProperties::parse("key1:value1;key2:value2;a:b").unwrap();
        assert_eq!(
            pairs(&props),
            vec![("key1", "value1"), ("key2", "value2"), ("a", "b")]
        );
    }

    #[test]
    fn test_parse_splits_on_first_colon_only() {
        let props = DynamicProperties::parse("url:https://host:8443/path").unwrap();
        assert_eq!(pairs(&props), vec![("url", "https://host:8443/path")]);
    }

    #[test]
    fn test_parse_skips_blank_segments() {
        let props = DynamicProperties::parse(";;key1:value1;;;key2:value 2;").unwrap();
        assert_eq!(pairs(&props), vec![("key1", "value1"), ("key2", "value 2")]);

        assert!(DynamicProperties::parse(";;;").unwrap().is_empty());
        assert!(DynamicProperties::parse("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_allows_empty_name_or_value() {
        let props = DynamicProperties::parse("key:;:value").unwrap();
        assert_eq!(pairs(&props), vec![("key", ""), ("", "value")]);
    }

    #[test]
    fn test_parse_rejects_pair_without_separator() {
        for input in ["key2", "key2;key1:value1", "key1:value1;key2", "a:b;bad;c:d"] {
            let err = DynamicProperties::parse(input).unwrap_err();
            assert!(
                matches!(err, ValidationError::MalformedProperty(_)),
                "{input}"
            );
        }

        let err = DynamicProperties::parse("key1:value1;key2").unwrap_err();
        assert_eq!(err, ValidationError::MalformedProperty("key2".to_string()));
    }
}
