//! Source and translation catalogs.
//!
//! A catalog is a labelled list of entries whose descriptions carry the
//! markup handled by [`crate::parser`]. The translation file must line up
//! with the source entry for entry; when it does not, it can be synced.

use crate::error::{CatalogError, ParseError};
use crate::format_text;
use crate::types::{Formatted, RenderOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub label: String,
    #[serde(default)]
    pub entries: Vec<CatalogItem>,
}

impl Catalog {
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(text.trim_start_matches('\u{feff}'))?;
        debug!(
            label = %catalog.label,
            entries = catalog.entries.len(),
            "decoded catalog"
        );
        Ok(catalog)
    }

    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.entries.iter().find(|item| item.id == id)
    }
}

/// Checks that `target` can be edited side by side with `source`: same
/// label, same number of entries, and every source id present.
pub fn check_alignment(source: &Catalog, target: &Catalog) -> Result<(), CatalogError> {
    if source.label != target.label {
        return Err(CatalogError::LabelMismatch {
            source_label: source.label.clone(),
            target_label: target.label.clone(),
        });
    }
    if source.entries.len() != target.entries.len() {
        return Err(CatalogError::CountMismatch {
            source_count: source.entries.len(),
            target_count: target.entries.len(),
        });
    }
    if let Some(missing) = source
        .entries
        .iter()
        .find(|item| target.get(&item.id).is_none())
    {
        return Err(CatalogError::MissingEntry(missing.id.clone()));
    }
    Ok(())
}

/// Rebuilds the target in source order. Entries already translated in
/// `target` are kept; the rest are copied from `source`. Target entries
/// whose id is not in the source are dropped.
pub fn sync(source: &Catalog, target: Option<&Catalog>) -> Catalog {
    let existing: HashMap<&str, &CatalogItem> = target
        .map(|t| t.entries.iter().map(|item| (item.id.as_str(), item)).collect())
        .unwrap_or_default();

    let entries = source
        .entries
        .iter()
        .map(|item| {
            existing
                .get(item.id.as_str())
                .map(|kept| (*kept).clone())
                .unwrap_or_else(|| item.clone())
        })
        .collect();

    Catalog {
        label: source.label.clone(),
        entries,
    }
}

/// Like [`sync`], for a translation file as read from disk. A blank file
/// yields a copy of the source.
pub fn sync_from_json(source: &Catalog, target_json: &str) -> Result<Catalog, CatalogError> {
    if target_json.trim().is_empty() {
        return Ok(sync(source, None));
    }
    let target = Catalog::from_json(target_json)?;
    Ok(sync(source, Some(&target)))
}

/// The entry currently being edited, with its description formatted once.
#[derive(Debug, Clone)]
pub struct FocusedItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub formatted: Formatted,
    /// Set when the description did not parse; `formatted` then holds the
    /// raw description in both slots.
    pub error: Option<ParseError>,
}

impl FocusedItem {
    pub fn new(item: &CatalogItem, options: &RenderOptions) -> Self {
        let (formatted, error) = match format_text(&item.description, options) {
            Ok(formatted) => (formatted, None),
            Err(err) => {
                warn!(id = %item.id, error = %err, "description does not parse, showing raw text");
                let raw = Formatted {
                    html: item.description.clone(),
                    markdown: item.description.clone(),
                };
                (raw, Some(err))
            }
        };
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            formatted,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use pretty_assertions::assert_eq;

    fn item(id: &str, name: &str, description: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    fn source() -> Catalog {
        Catalog {
            label: "Spells".to_string(),
            entries: vec![
                item("fireball", "Fireball", "<p>Boom.</p>"),
                item("shield", "Shield", "<p>+5 AC.</p>"),
            ],
        }
    }

    #[test]
    fn test_from_json() {
        let text = r#"{
            "label": "Spells",
            "entries": [
                { "id": "fireball", "name": "Fireball", "description": "<p>Boom.</p>" }
            ]
        }"#;
        let catalog = Catalog::from_json(text).unwrap();
        assert_eq!(catalog.label, "Spells");
        assert_eq!(catalog.entries, vec![item("fireball", "Fireball", "<p>Boom.</p>")]);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Catalog::from_json("{ \"label\": "),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let catalog = source();
        let text = catalog.to_json_pretty().unwrap();
        assert_eq!(Catalog::from_json(&text).unwrap(), catalog);
    }

    #[test]
    fn test_alignment_accepts_reordered_translation() {
        let mut target = source();
        target.entries.reverse();
        target.entries[0].name = "Bouclier".to_string();
        assert!(check_alignment(&source(), &target).is_ok());
    }

    #[test]
    fn test_alignment_failures() {
        let mut other_label = source();
        other_label.label = "Feats".to_string();
        assert!(matches!(
            check_alignment(&source(), &other_label),
            Err(CatalogError::LabelMismatch { .. })
        ));

        let mut short = source();
        short.entries.pop();
        assert!(matches!(
            check_alignment(&source(), &short),
            Err(CatalogError::CountMismatch {
                source_count: 2,
                target_count: 1
            })
        ));

        let mut renamed = source();
        renamed.entries[1].id = "mage-armor".to_string();
        match check_alignment(&source(), &renamed) {
            Err(CatalogError::MissingEntry(id)) => assert_eq!(id, "shield"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_sync_keeps_translations_in_source_order() {
        let target = Catalog {
            label: "Sorts".to_string(),
            entries: vec![
                item("obsolete", "Vieux", "<p>?</p>"),
                item("shield", "Bouclier", "<p>+5 CA.</p>"),
            ],
        };
        let synced = sync(&source(), Some(&target));
        assert_eq!(synced.label, "Spells");
        assert_eq!(
            synced.entries,
            vec![
                item("fireball", "Fireball", "<p>Boom.</p>"),
                item("shield", "Bouclier", "<p>+5 CA.</p>"),
            ]
        );
        assert!(check_alignment(&source(), &synced).is_ok());
    }

    #[test]
    fn test_sync_from_blank_file_copies_source() {
        assert_eq!(sync_from_json(&source(), "  \n").unwrap(), source());
    }

    #[test]
    fn test_focused_item_formats_description() {
        let focused = FocusedItem::new(
            &item("fireball", "Fireball", "<p>Deals <b>8d6</b> fire.</p>"),
            &RenderOptions::default(),
        );
        assert!(focused.error.is_none());
        assert_eq!(focused.formatted.markdown, "\n\nDeals **8d6** fire.\n\n");
    }

    #[test]
    fn test_focused_item_falls_back_to_raw_text() {
        let focused = FocusedItem::new(
            &item("broken", "Broken", "<p>never closed"),
            &RenderOptions::default(),
        );
        assert_eq!(
            focused.error.map(|e| e.kind),
            Some(ParseErrorKind::UnmatchedTag)
        );
        assert_eq!(focused.formatted.html, "<p>never closed");
        assert_eq!(focused.formatted.markdown, "<p>never closed");
    }
}
