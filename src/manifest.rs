//! Package manifest normalization and hashing
//!
//! A manifest maps package names to optional version strings (`None` means
//! "latest"). It is held in a `BTreeMap` so the canonical JSON serialization
//! is key-sorted without any extra work, which is what makes the manifest
//! fingerprint stable across logically identical inputs.

use crate::error::{ForgeError, ForgeResult};
use crate::fingerprint::fingerprint;
use serde_json::Value;
use std::collections::BTreeMap;

/// Normalized package name -> optional version mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    packages: BTreeMap<String, Option<String>>,
}

impl PackageManifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a manifest from its JSON form: `{"Name": "1.2.3" | null, ...}`
    ///
    /// Blank input is accepted as the empty manifest. Anything that is not a
    /// flat object of string-or-null values is rejected.
    pub fn parse(json: &str) -> ForgeResult<Self> {
        if json.trim().is_empty() {
            return Ok(Self::new());
        }

        let value: Value = serde_json::from_str(json).map_err(|e| ForgeError::ManifestParse {
            reason: e.to_string(),
        })?;

        let Value::Object(object) = value else {
            return Err(ForgeError::ManifestParse {
                reason: "expected a flat JSON object of package name to version".to_string(),
            });
        };

        let mut packages = BTreeMap::new();
        for (name, version) in object {
            let version = match version {
                Value::String(v) => Some(v),
                Value::Null => None,
                other => {
                    return Err(ForgeError::ManifestParse {
                        reason: format!(
                            "package '{}' has non-string version: {}",
                            name, other
                        ),
                    })
                }
            };
            packages.insert(name, version);
        }

        Ok(Self { packages })
    }

    /// Whether the manifest holds the given package
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Insert or replace a package entry (`None` = latest version)
    pub fn put(&mut self, name: impl Into<String>, version: Option<String>) {
        self.packages.insert(name.into(), version);
    }

    /// Iterate entries in canonical (key-sorted) order
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.packages
            .iter()
            .map(|(name, version)| (name.as_str(), version.as_deref()))
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Serialize with deterministic key ordering
    ///
    /// Required for fingerprint stability: two manifests holding the same
    /// entries always produce byte-identical JSON.
    pub fn canonical_json(&self) -> String {
        let map: serde_json::Map<String, Value> = self
            .packages
            .iter()
            .map(|(name, version)| {
                let value = version
                    .as_ref()
                    .map_or(Value::Null, |v| Value::String(v.clone()));
                (name.clone(), value)
            })
            .collect();
        Value::Object(map).to_string()
    }

    /// Fingerprint of the canonical serialization
    pub fn fingerprint(&self) -> String {
        fingerprint(self.canonical_json().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_versions_and_latest() {
        let manifest = PackageManifest::parse(r#"{"Foo": "1.2.3", "Bar": null}"#).unwrap();
        assert_eq!(manifest.len(), 2);
        assert!(manifest.contains("Foo"));
        assert!(manifest.contains("Bar"));
        let entries: Vec<_> = manifest.entries().collect();
        assert_eq!(entries, vec![("Bar", None), ("Foo", Some("1.2.3"))]);
    }

    #[test]
    fn parse_blank_is_empty() {
        assert!(PackageManifest::parse("").unwrap().is_empty());
        assert!(PackageManifest::parse("  \n").unwrap().is_empty());
        assert!(PackageManifest::parse("{}").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_non_object() {
        assert!(matches!(
            PackageManifest::parse("[1, 2]"),
            Err(ForgeError::ManifestParse { .. })
        ));
    }

    #[test]
    fn parse_rejects_nested_values() {
        assert!(matches!(
            PackageManifest::parse(r#"{"Foo": {"version": "1"}}"#),
            Err(ForgeError::ManifestParse { .. })
        ));
        assert!(matches!(
            PackageManifest::parse(r#"{"Foo": 1}"#),
            Err(ForgeError::ManifestParse { .. })
        ));
    }

    #[test]
    fn parse_rejects_malformed_json() {
        assert!(matches!(
            PackageManifest::parse("{not json"),
            Err(ForgeError::ManifestParse { .. })
        ));
    }

    #[test]
    fn canonical_json_is_key_sorted() {
        let a = PackageManifest::parse(r#"{"Zebra": null, "Alpha": "1.0"}"#).unwrap();
        let b = PackageManifest::parse(r#"{"Alpha": "1.0", "Zebra": null}"#).unwrap();
        assert_eq!(a.canonical_json(), b.canonical_json());
        assert_eq!(a.canonical_json(), r#"{"Alpha":"1.0","Zebra":null}"#);
    }

    #[test]
    fn fingerprint_deterministic_across_orderings() {
        let a = PackageManifest::parse(r#"{"B": null, "A": "2.0", "C": "3.1"}"#).unwrap();
        let b = PackageManifest::parse(r#"{"C": "3.1", "A": "2.0", "B": null}"#).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn put_changes_fingerprint() {
        let mut manifest = PackageManifest::new();
        let before = manifest.fingerprint();
        manifest.put("Newtonsoft.Json", None);
        assert_ne!(before, manifest.fingerprint());
    }

    #[test]
    fn put_existing_entry_is_idempotent() {
        let mut manifest = PackageManifest::parse(r#"{"Newtonsoft.Json": null}"#).unwrap();
        let before = manifest.fingerprint();
        manifest.put("Newtonsoft.Json", None);
        assert_eq!(before, manifest.fingerprint());
    }
}
