//! Allow/forbid filtering of named definitions
//!
//! Channels pick the handlers and processors they use from the globally
//! configured ones. Filtering happens once while the service graph is
//! assembled, never per record.

use crate::core::{LoggerError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSpec {
    pub allowed: Vec<String>,
    pub forbidden: Vec<String>,
}

impl FilterSpec {
    pub fn allow<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: names.into_iter().map(Into::into).collect(),
            forbidden: Vec::new(),
        }
    }

    pub fn forbid<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: Vec::new(),
            forbidden: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty() && self.forbidden.is_empty()
    }

    /// Reject a spec that both allows and forbids
    pub fn validate(&self, option_path: &str) -> Result<()> {
        if !self.allowed.is_empty() && !self.forbidden.is_empty() {
            return Err(LoggerError::config(
                option_path,
                "Use only 'allowed' or 'forbidden', these options are incompatible.",
            ));
        }
        Ok(())
    }
}

/// Select the definitions a filter lets through, keeping their original order.
///
/// `option_path` is the configuration path of the filter (without the
/// trailing `allowed`/`forbidden`) and `kind` names what is filtered, both
/// used in the error listing every unknown name.
pub fn filter_definitions<T: Clone>(
    definitions: &IndexMap<String, T>,
    filter: &FilterSpec,
    option_path: &str,
    kind: &str,
) -> Result<IndexMap<String, T>> {
    filter.validate(option_path)?;

    if filter.is_empty() {
        return Ok(definitions.clone());
    }

    let (names, option, keep_listed) = if !filter.allowed.is_empty() {
        (&filter.allowed, "allowed", true)
    } else {
        (&filter.forbidden, "forbidden", false)
    };

    check_known(definitions, names, &format!("{} > {}", option_path, option), kind)?;

    Ok(definitions
        .iter()
        .filter(|(name, _)| names.contains(name) == keep_listed)
        .map(|(name, definition)| (name.clone(), definition.clone()))
        .collect())
}

/// Pick the definitions named in `names`, in the order of `names`.
///
/// Duplicate names are used once.
pub fn filter_to_keys<T: Clone>(
    definitions: &IndexMap<String, T>,
    names: &[String],
    option_path: &str,
    kind: &str,
) -> Result<IndexMap<String, T>> {
    check_known(definitions, names, option_path, kind)?;

    Ok(names
        .iter()
        .filter_map(|name| {
            definitions
                .get(name)
                .map(|definition| (name.clone(), definition.clone()))
        })
        .collect())
}

fn check_known<T>(
    definitions: &IndexMap<String, T>,
    names: &[String],
    option_path: &str,
    kind: &str,
) -> Result<()> {
    let mut missing: Vec<&str> = Vec::new();
    for name in names {
        if !definitions.contains_key(name) && !missing.contains(&name.as_str()) {
            missing.push(name);
        }
    }

    if missing.is_empty() {
        return Ok(());
    }

    Err(LoggerError::config(
        option_path,
        format!(
            "Some of the given {} do not exist - '{}'.",
            kind,
            missing.join(", ")
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions() -> IndexMap<String, u8> {
        IndexMap::from([
            ("a".to_string(), 1),
            ("b".to_string(), 2),
            ("c".to_string(), 3),
        ])
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let filtered =
            filter_definitions(&definitions(), &FilterSpec::default(), "log > x", "handlers")
                .unwrap();
        assert_eq!(filtered, definitions());
    }

    #[test]
    fn test_allowed_keeps_definition_order() {
        let filtered = filter_definitions(
            &definitions(),
            &FilterSpec::allow(["c", "a"]),
            "log > x",
            "handlers",
        )
        .unwrap();
        assert_eq!(filtered.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_forbidden_is_complement() {
        let filtered = filter_definitions(
            &definitions(),
            &FilterSpec::forbid(["b"]),
            "log > x",
            "processors",
        )
        .unwrap();
        assert_eq!(filtered.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_every_missing_name_is_reported() {
        let err = filter_definitions(
            &definitions(),
            &FilterSpec::allow(["a", "x", "y"]),
            "log > channels > main > handlers",
            "handlers",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration of 'log > channels > main > handlers > allowed': \
             Some of the given handlers do not exist - 'x, y'."
        );
    }

    #[test]
    fn test_allowed_and_forbidden_are_exclusive() {
        let filter = FilterSpec {
            allowed: vec!["a".into()],
            forbidden: vec!["b".into()],
        };
        assert!(filter_definitions(&definitions(), &filter, "log > x", "handlers").is_err());
    }

    #[test]
    fn test_filter_to_keys_follows_requested_order() {
        let names = vec!["c".to_string(), "a".to_string(), "c".to_string()];
        let picked = filter_to_keys(&definitions(), &names, "log > bridge", "channels").unwrap();
        assert_eq!(picked.into_iter().collect::<Vec<_>>(), vec![
            ("c".to_string(), 3),
            ("a".to_string(), 1)
        ]);
    }
}
