//! Project records and the providers that supply them.
//!
//! Two providers exist: [`MarkupProjects`] reads the page's loosely structured
//! project listing, [`SampleProjects`] is the fixed fallback. The choice is made
//! once, by [`select_project_source`].

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub link: String,
}

impl ProjectRecord {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        technologies: &[&str],
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            technologies: technologies.iter().map(|tech| tech.to_string()).collect(),
            link: link.into(),
        }
    }
}

pub trait ProjectSource {
    /// Records in display order.
    fn projects(&self) -> &[ProjectRecord];

    fn name(&self) -> &'static str;
}

/// The three showcase records used when the page offers none.
#[derive(Debug, Clone)]
pub struct SampleProjects {
    records: Vec<ProjectRecord>,
}

impl Default for SampleProjects {
    fn default() -> Self {
        Self {
            records: vec![
                ProjectRecord::new(
                    "Neon Tasks",
                    "A realtime task manager with WebSocket sync and offline-first support.",
                    &["React", "Node.js", "WebSocket"],
                    "#projects",
                ),
                ProjectRecord::new(
                    "Orbital UI",
                    "Design system and component library for futuristic interfaces.",
                    &["TypeScript", "Styled Components"],
                    "#projects",
                ),
                ProjectRecord::new(
                    "Photon API",
                    "High-performance GraphQL API with caching and observability.",
                    &["GraphQL", "Kubernetes"],
                    "#projects",
                ),
            ],
        }
    }
}

impl ProjectSource for SampleProjects {
    fn projects(&self) -> &[ProjectRecord] {
        &self.records
    }

    fn name(&self) -> &'static str {
        "sample"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Anchor {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// One item of the page's project listing, as loosely as the markup gives it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingItem {
    /// Text of the first `h2`/`h3`/`h4`.
    pub heading: Option<String>,
    pub data_title: Option<String>,
    /// First paragraph text.
    pub paragraph: Option<String>,
    pub data_desc: Option<String>,
    /// Text of the technology tag nodes.
    pub tech: Vec<String>,
    /// Comma-separated technology list attribute.
    pub data_tech: Option<String>,
    pub anchors: Vec<Anchor>,
}

pub const FALLBACK_TECHNOLOGY: &str = "Website";
pub const FALLBACK_PROJECT_LINK: &str = "#projects";

/// Projects scraped from the page listing.
#[derive(Debug, Clone)]
pub struct MarkupProjects {
    records: Vec<ProjectRecord>,
}

impl MarkupProjects {
    /// Returns `None` when no listing item yields a titled record.
    pub fn scrape(items: &[ListingItem]) -> Option<Self> {
        let records: Vec<ProjectRecord> = items.iter().filter_map(scrape_item).collect();
        if records.is_empty() {
            None
        } else {
            Some(Self { records })
        }
    }
}

impl ProjectSource for MarkupProjects {
    fn projects(&self) -> &[ProjectRecord] {
        &self.records
    }

    fn name(&self) -> &'static str {
        "page"
    }
}

fn trimmed_non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn scrape_item(item: &ListingItem) -> Option<ProjectRecord> {
    let first_anchor = item.anchors.first();

    let title = match item.heading.as_deref() {
        Some(heading) => trimmed_non_empty(Some(heading)),
        None => trimmed_non_empty(item.data_title.as_deref()),
    }
    .or_else(|| trimmed_non_empty(first_anchor.map(|anchor| anchor.text.as_str())))?;

    let description = match item.paragraph.as_deref() {
        Some(paragraph) => paragraph.trim().to_string(),
        None => item.data_desc.as_deref().unwrap_or_default().trim().to_string(),
    };

    let mut technologies: Vec<String> = if !item.tech.is_empty() {
        item.tech.iter().map(|tech| tech.trim().to_string()).collect()
    } else if let Some(data_tech) = item.data_tech.as_deref() {
        data_tech.split(',').map(|tech| tech.trim().to_string()).collect()
    } else {
        Vec::new()
    };
    if technologies.is_empty() {
        technologies.push(FALLBACK_TECHNOLOGY.to_string());
    }

    let link = first_anchor
        .and_then(|anchor| anchor.href.as_deref())
        .filter(|href| !href.is_empty())
        .unwrap_or(FALLBACK_PROJECT_LINK)
        .to_string();

    Some(ProjectRecord {
        title,
        description,
        technologies,
        link,
    })
}

/// Picks the page listing when it yields records, the samples otherwise.
pub fn select_project_source(listing: Option<&[ListingItem]>) -> Box<dyn ProjectSource> {
    match listing.and_then(MarkupProjects::scrape) {
        Some(scraped) => {
            tracing::debug!(count = scraped.records.len(), "using page project listing");
            Box::new(scraped)
        }
        None => {
            tracing::debug!("no usable project listing; using sample projects");
            Box::new(SampleProjects::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn anchor(text: &str, href: Option<&str>) -> Anchor {
        Anchor {
            text: text.to_string(),
            href: href.map(str::to_string),
        }
    }

    #[test]
    fn heading_wins_over_data_attributes() {
        let item = ListingItem {
            heading: Some("  Comet CLI ".to_string()),
            data_title: Some("ignored".to_string()),
            paragraph: Some(" Fast builds. ".to_string()),
            data_desc: Some("ignored".to_string()),
            tech: vec![" Rust ".to_string(), "Tokio".to_string()],
            data_tech: Some("ignored".to_string()),
            anchors: vec![anchor("Repo", Some("https://example.com/comet"))],
        };

        assert_eq!(
            scrape_item(&item),
            Some(ProjectRecord::new(
                "Comet CLI",
                "Fast builds.",
                &["Rust", "Tokio"],
                "https://example.com/comet",
            ))
        );
    }

    #[test]
    fn attribute_and_anchor_fallbacks_apply_in_order() {
        let item = ListingItem {
            data_desc: Some("From attributes".to_string()),
            data_tech: Some("Go, gRPC ,Postgres".to_string()),
            anchors: vec![anchor(" Relay ", None)],
            ..ListingItem::default()
        };

        assert_eq!(
            scrape_item(&item),
            Some(ProjectRecord::new(
                "Relay",
                "From attributes",
                &["Go", "gRPC", "Postgres"],
                "#projects",
            ))
        );
    }

    #[test]
    fn empty_heading_falls_through_to_anchor_text() {
        let item = ListingItem {
            heading: Some("   ".to_string()),
            data_title: Some("not consulted when a heading exists".to_string()),
            anchors: vec![anchor("Anchor title", Some(""))],
            ..ListingItem::default()
        };

        let record = scrape_item(&item).expect("anchor text supplies title");
        assert_eq!(record.title, "Anchor title");
        assert_eq!(record.technologies, vec!["Website".to_string()]);
        assert_eq!(record.link, "#projects");
        assert_eq!(record.description, "");
    }

    #[test]
    fn untitled_items_are_skipped() {
        let items = vec![
            ListingItem::default(),
            ListingItem {
                heading: Some("Kept".to_string()),
                ..ListingItem::default()
            },
        ];
        let scraped = MarkupProjects::scrape(&items).expect("one item survives");
        assert_eq!(scraped.projects().len(), 1);
        assert_eq!(scraped.projects()[0].title, "Kept");
    }

    #[test]
    fn selection_falls_back_to_samples() {
        assert_eq!(select_project_source(None).name(), "sample");
        assert_eq!(select_project_source(Some(&[])).name(), "sample");
        assert_eq!(
            select_project_source(Some(&[ListingItem::default()])).name(),
            "sample"
        );

        let samples = SampleProjects::default();
        let titles: Vec<&str> = samples
            .projects()
            .iter()
            .map(|record| record.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Neon Tasks", "Orbital UI", "Photon API"]);
    }
}
