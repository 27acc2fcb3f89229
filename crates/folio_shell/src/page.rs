//! The page the shell stands in for.
//!
//! A TTY has no document to scroll, so page effects are queued as
//! [`PageEvent`]s that the shell reports as status rows. External destinations
//! can additionally be handed to the system opener.

use std::process::{Command, Stdio};

use folio_term::{EnvConfig, Page, PageDocument, PageError, Section};

pub const DEFAULT_SECTIONS: [&str; 5] = ["home", "about", "skills", "projects", "contact"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Scrolled(String),
    Opened(String),
    Mailed(String),
    Downloaded(String),
}

impl PageEvent {
    pub fn status(&self) -> String {
        match self {
            Self::Scrolled(id) => format!("→ scrolled to #{id}"),
            Self::Opened(href) => format!("→ opening {href}"),
            Self::Mailed(address) => format!("→ composing mail to {address}"),
            Self::Downloaded(href) => format!("→ downloading {href}"),
        }
    }
}

pub fn default_document() -> PageDocument {
    PageDocument {
        sections: DEFAULT_SECTIONS
            .iter()
            .map(|id| Section {
                id: id.to_string(),
                title: None,
            })
            .collect(),
        projects: None,
    }
}

#[derive(Debug)]
pub struct ShellPage {
    document: PageDocument,
    events: Vec<PageEvent>,
    open_links: bool,
}

impl ShellPage {
    pub fn new(document: PageDocument, open_links: bool) -> Self {
        Self {
            document,
            events: Vec::new(),
            open_links,
        }
    }

    /// Loads `FOLIO_PAGE` when set, the built-in page otherwise.
    pub fn from_config(config: &EnvConfig) -> Result<Self, PageError> {
        let document = match config.page_path.as_deref() {
            Some(path) => PageDocument::load(path)?,
            None => default_document(),
        };
        tracing::debug!(
            sections = document.sections.len(),
            listing = document.projects.is_some(),
            "page loaded"
        );
        Ok(Self::new(document, config.open_links))
    }

    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    pub fn events(&self) -> &[PageEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<PageEvent> {
        std::mem::take(&mut self.events)
    }

    fn launch(&self, target: &str) {
        if !self.open_links {
            return;
        }
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        let spawned = Command::new(opener)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if let Err(error) = spawned {
            tracing::warn!(%error, opener, target, "failed to launch opener");
        }
    }
}

impl Page for ShellPage {
    fn has_section(&self, id: &str) -> bool {
        self.document.has_section(id)
    }

    fn scroll_to(&mut self, id: &str) {
        if self.document.has_section(id) {
            self.events.push(PageEvent::Scrolled(id.to_string()));
        }
    }

    fn open_external(&mut self, href: &str) {
        self.launch(href);
        self.events.push(PageEvent::Opened(href.to_string()));
    }

    fn compose_mail(&mut self, address: &str) {
        self.launch(&format!("mailto:{address}"));
        self.events.push(PageEvent::Mailed(address.to_string()));
    }

    fn download(&mut self, href: &str) {
        self.events.push(PageEvent::Downloaded(href.to_string()));
    }
}
