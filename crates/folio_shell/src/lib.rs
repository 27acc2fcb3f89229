//! Native TTY host for the portfolio terminal.
//!
//! ## Page manifest
//!
//! Without `FOLIO_PAGE` the shell uses a built-in page with the sections
//! `home`, `about`, `skills`, `projects` and `contact` and no project listing,
//! so `projects` shows the sample records. A manifest replaces both:
//!
//! ```json
//! {
//!   "sections": [{ "id": "about", "title": "About" }, { "id": "projects" }],
//!   "projects": [
//!     { "heading": "Comet", "paragraph": "Edge cache.", "tech": ["Rust"],
//!       "anchors": [{ "text": "Repo", "href": "https://example.com/comet" }] }
//!   ]
//! }
//! ```
//!
//! Unknown JSON fields are rejected.
//!
//! ## Keys
//!
//! Enter submits, Up/Down recall history, Tab completes, Ctrl-O follows the
//! most recent link, Ctrl-C and Ctrl-D exit.

pub mod page;
pub mod shell;
