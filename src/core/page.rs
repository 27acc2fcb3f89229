//! The page the terminal is embedded in.
//!
//! The terminal never owns the page. It asks whether sections exist and asks
//! the page to scroll or open links; the host decides what that means.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::project::ListingItem;

pub trait Page {
    /// Whether an element with this identifier exists. The identifier is taken
    /// literally, exactly as a `#<id>` lookup would.
    fn has_section(&self, id: &str) -> bool;

    /// Smooth-scrolls to a section. Unknown identifiers are ignored.
    fn scroll_to(&mut self, id: &str);

    /// Opens a destination in a new browsing context.
    fn open_external(&mut self, href: &str);

    /// Hands a `mailto:` address to the mail client.
    fn compose_mail(&mut self, address: &str) {
        self.open_external(&format!("mailto:{address}"));
    }

    /// Starts a download of a page asset.
    fn download(&mut self, href: &str) {
        self.open_external(href);
    }
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("I/O error while reading page manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse page manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Static description of a page: its sections and its project listing.
///
/// An absent `projects` key means the page has no listing container at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageDocument {
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub projects: Option<Vec<ListingItem>>,
}

impl PageDocument {
    pub fn from_json(path: &Path, raw: &str) -> Result<Self, PageError> {
        serde_json::from_str(raw).map_err(|source| PageError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, PageError> {
        let raw = fs::read_to_string(path).map_err(|source| PageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &raw)
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn has_section(&self, id: &str) -> bool {
        self.section(id).is_some()
    }

    pub fn project_listing(&self) -> Option<&[ListingItem]> {
        self.projects.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_parses_sections_and_listing() {
        let raw = r##"{
            "sections": [{ "id": "about", "title": "About" }, { "id": "projects" }],
            "projects": [{ "heading": "Comet", "anchors": [{ "text": "Repo", "href": "#projects" }] }]
        }"##;
        let page = PageDocument::from_json(Path::new("page.json"), raw).expect("parse");

        assert!(page.has_section("about"));
        assert!(!page.has_section("About"));
        assert_eq!(page.section("about").and_then(|s| s.title.as_deref()), Some("About"));
        assert_eq!(page.project_listing().map(<[ListingItem]>::len), Some(1));
    }

    #[test]
    fn missing_listing_is_distinct_from_empty_listing() {
        let absent = PageDocument::from_json(Path::new("p"), r#"{"sections": []}"#).expect("parse");
        let empty = PageDocument::from_json(Path::new("p"), r#"{"projects": []}"#).expect("parse");

        assert!(absent.project_listing().is_none());
        assert_eq!(empty.project_listing().map(<[ListingItem]>::len), Some(0));
    }

    #[test]
    fn unknown_fields_are_rejected_with_path_context() {
        let error = PageDocument::from_json(Path::new("page.json"), r#"{"nav": []}"#)
            .expect_err("unknown field");
        assert!(matches!(error, PageError::Parse { ref path, .. } if path == Path::new("page.json")));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let error = PageDocument::load(&temp.path().join("absent.json")).expect_err("missing");
        assert!(matches!(error, PageError::Io { .. }));
    }
}
