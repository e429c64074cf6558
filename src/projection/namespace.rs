use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source namespace to output namespace table
///
/// Besides the explicit entries, any sub-namespace of the source being
/// projected mirrors under the output root: with source `app/models` and
/// output `app/apis`, `app/models/quota` maps to `app/apis/quota`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceMap {
    entries: BTreeMap<String, String>,
}

impl NamespaceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<String>, output: impl Into<String>) -> &mut Self {
        self.entries.insert(source.into(), output.into());
        self
    }

    /// Explicit mapping for `namespace`
    pub fn get(&self, namespace: &str) -> Option<&str> {
        self.entries.get(namespace).map(String::as_str)
    }

    /// Output namespace for a type declared in `namespace`, when the type
    /// lives outside both `source` and `output`
    pub fn output_for(&self, namespace: &str, source: &str, output: &str) -> Option<String> {
        if let Some(mapped) = self.get(namespace) {
            return Some(mapped.to_string());
        }
        let rest = namespace.strip_prefix(source)?.strip_prefix('/')?;
        if rest.is_empty() {
            return None;
        }
        Some(format!("{}/{}", output.trim_end_matches('/'), rest))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>, O: Into<String>> FromIterator<(S, O)> for NamespaceMap {
    fn from_iter<I: IntoIterator<Item = (S, O)>>(iter: I) -> Self {
        NamespaceMap {
            entries: iter
                .into_iter()
                .map(|(s, o)| (s.into(), o.into()))
                .collect(),
        }
    }
}

/// Last `/` segment of a namespace, used as its short qualifier
pub fn short_name(namespace: &str) -> &str {
    namespace.rsplit('/').next().unwrap_or(namespace)
}
