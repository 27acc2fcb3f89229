//! Terminal state: commands, history, completion, keys and the page seam.

pub mod autocomplete;
pub mod command;
pub mod history;
pub mod input;
pub mod page;
pub mod project;
pub mod registry;
pub mod terminal;
