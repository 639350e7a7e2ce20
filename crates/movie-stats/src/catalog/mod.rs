//! Language catalog: display names for the languages that survive aggregation.
//!
//! The catalog is keyed by language code. Display names are decoration used
//! by selection forms, so two codes sharing a name never lose an entry.

mod iso639;

pub use iso639::{ISO_639_1, language_name};

use crate::config::UnknownLanguagePolicy;
use crate::error::{MovieStatsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One selectable language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub code: String,
    pub name: String,
}

/// Immutable code -> display name mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageCatalog {
    by_code: BTreeMap<String, String>,
}

impl LanguageCatalog {
    /// Resolve a display name for every code.
    ///
    /// Returns the catalog and the codes that had no registry name (always
    /// empty under [`UnknownLanguagePolicy::Abort`]).
    ///
    /// # Errors
    ///
    /// Returns [`MovieStatsError::UnknownCode`] for the first unresolvable
    /// code when the policy is `Abort`.
    pub fn build<'a>(
        codes: impl IntoIterator<Item = &'a str>,
        policy: UnknownLanguagePolicy,
    ) -> Result<(Self, Vec<String>)> {
        let mut by_code = BTreeMap::new();
        let mut unresolved = Vec::new();

        for code in codes {
            if by_code.contains_key(code) || unresolved.iter().any(|c: &String| c == code) {
                continue;
            }

            match language_name(code) {
                Some(name) => {
                    by_code.insert(code.to_string(), name.to_string());
                }
                None => match policy {
                    UnknownLanguagePolicy::Abort => {
                        return Err(MovieStatsError::UnknownCode(code.to_string()));
                    }
                    UnknownLanguagePolicy::Skip => {
                        warn!("No language name for code '{}', leaving it out", code);
                        unresolved.push(code.to_string());
                    }
                },
            }
        }

        debug!("Catalogued {} languages", by_code.len());
        Ok((Self { by_code }, unresolved))
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Display name of a catalogued code.
    pub fn name(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(String::as_str)
    }

    /// Code of a display name. Matching ignores case.
    pub fn code_for_name(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.by_code
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(code, _)| code.as_str())
    }

    /// Resolve a form selection, which may be a code or a display name.
    ///
    /// # Errors
    ///
    /// Returns [`MovieStatsError::InvalidSelection`] when neither matches.
    pub fn resolve(&self, selection: &str) -> Result<&str> {
        let trimmed = selection.trim();
        let lowered = trimmed.to_ascii_lowercase();

        if let Some((code, _)) = self.by_code.get_key_value(lowered.as_str()) {
            return Ok(code.as_str());
        }

        self.code_for_name(trimmed)
            .ok_or_else(|| MovieStatsError::invalid_selection("language", selection))
    }

    /// Display names in alphabetical order.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_code.values().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Entries sorted by display name.
    pub fn entries(&self) -> Vec<LanguageEntry> {
        let mut entries: Vec<LanguageEntry> = self
            .by_code
            .iter()
            .map(|(code, name)| LanguageEntry {
                code: code.clone(),
                name: name.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> LanguageCatalog {
        LanguageCatalog::build(["fr", "en", "zh", "de", "en"], UnknownLanguagePolicy::Abort)
            .unwrap()
            .0
    }

    #[test]
    fn test_build_resolves_names() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.name("de"), Some("German"));
        assert_eq!(catalog.name("zh"), Some("Chinese"));
        assert_eq!(catalog.name("it"), None);
    }

    #[test]
    fn test_sorted_names() {
        assert_eq!(
            catalog().sorted_names(),
            vec!["Chinese", "English", "French", "German"]
        );
    }

    #[test]
    fn test_entries_sorted_by_name() {
        let codes: Vec<String> = catalog().entries().into_iter().map(|e| e.code).collect();
        assert_eq!(codes, vec!["zh", "en", "fr", "de"]);
    }

    #[test]
    fn test_resolve_code_or_name() {
        let catalog = catalog();
        assert_eq!(catalog.resolve("en").unwrap(), "en");
        assert_eq!(catalog.resolve("EN").unwrap(), "en");
        assert_eq!(catalog.resolve("French").unwrap(), "fr");
        assert_eq!(catalog.resolve(" german ").unwrap(), "de");

        let err = catalog.resolve("Klingon").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SELECTION");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_unknown_code_aborts() {
        let err = LanguageCatalog::build(["en", "qq"], UnknownLanguagePolicy::Abort).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_CODE");
        assert!(err.to_string().contains("qq"));
    }

    #[test]
    fn test_unknown_code_skipped() {
        let (catalog, unresolved) =
            LanguageCatalog::build(["en", "qq", "qq"], UnknownLanguagePolicy::Skip).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.name("qq"), None);
        assert_eq!(unresolved, vec!["qq".to_string()]);
    }
}
