use crate::error::{Result, WnError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Key of a named property: a name plus up to two tags.
///
/// Zone properties and user-rate parameters share this shape, e.g.
/// `("t9",)`, `("exposure", "n")` or `("rate", "fe56", "high")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyKey {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag2: Option<String>,
}

impl PropertyKey {
    /// Build a key from 1 to 3 parts.
    pub fn new<S: AsRef<str>>(parts: &[S]) -> Result<Self> {
        let parts: Vec<String> = parts.iter().map(|p| p.as_ref().trim().to_string()).collect();
        match parts.as_slice() {
            [] => Err(WnError::EmptyPropertyKey),
            [name] => Ok(PropertyKey::from(name.as_str())),
            [name, tag1] => Ok(PropertyKey::tagged(name, tag1)),
            [name, tag1, tag2] => Ok(PropertyKey {
                name: name.clone(),
                tag1: Some(tag1.clone()),
                tag2: Some(tag2.clone()),
            }),
            _ => Err(WnError::TooManyPropertyTags(parts.len())),
        }
    }

    pub fn tagged(name: &str, tag1: &str) -> Self {
        PropertyKey {
            name: name.to_string(),
            tag1: Some(tag1.to_string()),
            tag2: None,
        }
    }

    /// Number of parts in the key (1 to 3).
    pub fn len(&self) -> usize {
        1 + self.tag1.is_some() as usize + self.tag2.is_some() as usize
    }
}

impl From<&str> for PropertyKey {
    fn from(name: &str) -> Self {
        PropertyKey {
            name: name.to_string(),
            tag1: None,
            tag2: None,
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for tag in [&self.tag1, &self.tag2].into_iter().flatten() {
            write!(f, ", {}", tag)?;
        }
        Ok(())
    }
}

/// A property as it appears in a decoded record: key parts plus text value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub name: String,
    #[serde(default)]
    pub tag1: Option<String>,
    #[serde(default)]
    pub tag2: Option<String>,
    pub value: String,
}

impl PropertyRecord {
    /// The record's key. A `tag2` without a `tag1` is kept as the first tag.
    pub fn key(&self) -> PropertyKey {
        let mut tags = [&self.tag1, &self.tag2].into_iter().flatten().cloned();
        PropertyKey {
            name: self.name.clone(),
            tag1: tags.next(),
            tag2: tags.next(),
        }
    }
}

/// Collect property records into a key -> value map.
pub fn collect_properties(records: &[PropertyRecord]) -> HashMap<PropertyKey, String> {
    records
        .iter()
        .map(|p| (p.key(), p.value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_from_parts() {
        let key = PropertyKey::new(&["exposure", "n"]).unwrap();
        assert_eq!(key, PropertyKey::tagged("exposure", "n"));
        assert_eq!(key.len(), 2);
        assert_eq!(PropertyKey::new(&["t9"]).unwrap(), PropertyKey::from("t9"));
        assert_eq!(PropertyKey::new(&["a", "b", "c"]).unwrap().len(), 3);
    }

    #[test]
    fn test_new_rejects_too_many_parts() {
        let err = PropertyKey::new(&["a", "b", "c", "d"]).unwrap_err();
        assert!(matches!(err, WnError::TooManyPropertyTags(4)));
    }

    #[test]
    fn test_new_rejects_empty_key() {
        assert!(matches!(
            PropertyKey::new::<&str>(&[]),
            Err(WnError::EmptyPropertyKey)
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(PropertyKey::from("time").to_string(), "time");
        assert_eq!(
            PropertyKey::new(&["rate", "fe56", "high"]).unwrap().to_string(),
            "rate, fe56, high"
        );
    }

    #[test]
    fn test_collect_properties() {
        let records = vec![
            PropertyRecord {
                name: "t9".to_string(),
                tag1: None,
                tag2: None,
                value: "1.5".to_string(),
            },
            PropertyRecord {
                name: "exposure".to_string(),
                tag1: Some("n".to_string()),
                tag2: None,
                value: "0.2".to_string(),
            },
        ];
        let props = collect_properties(&records);
        assert_eq!(props[&PropertyKey::from("t9")], "1.5");
        assert_eq!(props[&PropertyKey::tagged("exposure", "n")], "0.2");
    }
}
