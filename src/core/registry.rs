//! Command registry and dispatcher.
//!
//! Handlers are pure: they read the page and the project records and return
//! the render operations to apply. Applying them is the controller's job, so a
//! handler can never touch the transcript directly.

use crate::core::command::{parse_command, Command, PROMPT};
use crate::core::page::Page;
use crate::core::project::ProjectSource;
use crate::render::transcript::{Link, ProjectCard, TranscriptLine};

pub const SKILLS_SUMMARY: &str = "JavaScript • Node.js • React • Python • DevOps";
pub const ABOUT_TEXT: &str = "I build futuristic web apps — scroll to About for more.";
pub const ABOUT_SECTION: &str = "about";
pub const CONTACT_EMAIL: &str = "kim@example.com";
pub const RESUME_PATH: &str = "/assets/resume.pdf";
pub const PROJECTS_HEADER: &str = "Showing projects:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    Append(TranscriptLine),
    ClearTranscript,
    ScrollTo(String),
}

pub struct DispatchContext<'a> {
    pub registry: &'a Registry,
    pub page: &'a dyn Page,
    pub projects: &'a dyn ProjectSource,
}

type Handler = fn(&DispatchContext<'_>, &Command) -> Vec<RenderOp>;

#[derive(Clone, Copy)]
pub struct CommandSpec {
    pub verb: &'static str,
    /// Verb plus argument shape, as listed by `help`.
    pub usage: &'static str,
    handler: Handler,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("verb", &self.verb)
            .field("usage", &self.usage)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Registry {
    specs: Vec<CommandSpec>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// The fixed command set. Its order is the autocomplete vocabulary order.
    pub fn builtin() -> Self {
        Self {
            specs: vec![
                spec("help", "help", help),
                spec("projects", "projects", projects),
                spec("open", "open <section>", open),
                spec("skills", "skills", skills),
                spec("about", "about", about),
                spec("contact", "contact", contact),
                spec("resume", "resume", resume),
                spec("clear", "clear", clear),
            ],
        }
    }

    pub fn verbs(&self) -> Vec<&'static str> {
        self.specs.iter().map(|spec| spec.verb).collect()
    }

    /// Exact match on the verb; callers lower-case first.
    pub fn lookup(&self, verb: &str) -> Option<&CommandSpec> {
        self.specs.iter().find(|spec| spec.verb == verb)
    }

    pub fn help_line(&self) -> String {
        let usages: Vec<&str> = self.specs.iter().map(|spec| spec.usage).collect();
        format!("Available commands: {}", usages.join(", "))
    }

    /// Echoes `raw` and runs its handler. Blank input produces nothing.
    pub fn dispatch(
        &self,
        raw: &str,
        page: &dyn Page,
        projects: &dyn ProjectSource,
    ) -> Vec<RenderOp> {
        let trimmed = raw.trim();
        let Some(command) = parse_command(trimmed) else {
            return Vec::new();
        };

        let mut ops = vec![RenderOp::Append(TranscriptLine::command(format!(
            "{PROMPT}{trimmed}"
        )))];

        match self.lookup(&command.verb) {
            Some(spec) => {
                tracing::debug!(verb = spec.verb, args = command.arguments.len(), "dispatch");
                let context = DispatchContext {
                    registry: self,
                    page,
                    projects,
                };
                ops.extend((spec.handler)(&context, &command));
            }
            None => {
                tracing::debug!(verb = %command.verb, "unknown command");
                ops.push(output(format!("Command not found: '{trimmed}'. Try 'help'.")));
            }
        }

        ops
    }
}

fn spec(verb: &'static str, usage: &'static str, handler: Handler) -> CommandSpec {
    CommandSpec {
        verb,
        usage,
        handler,
    }
}

fn output(text: impl Into<String>) -> RenderOp {
    RenderOp::Append(TranscriptLine::output(text))
}

fn help(context: &DispatchContext<'_>, _command: &Command) -> Vec<RenderOp> {
    vec![output(context.registry.help_line())]
}

fn projects(context: &DispatchContext<'_>, _command: &Command) -> Vec<RenderOp> {
    let records = context.projects.projects();
    let mut ops = Vec::with_capacity(records.len() + 1);
    ops.push(output(PROJECTS_HEADER));
    ops.extend(
        records
            .iter()
            .map(|record| RenderOp::Append(TranscriptLine::ProjectCard(ProjectCard::from(record)))),
    );
    ops
}

fn open(context: &DispatchContext<'_>, command: &Command) -> Vec<RenderOp> {
    let Some(section) = command.argument(0) else {
        return vec![output("Usage: open <section>")];
    };

    if context.page.has_section(section) {
        vec![
            output(format!("Opening {section}...")),
            RenderOp::ScrollTo(section.to_string()),
        ]
    } else {
        vec![output(format!("Section not found: {section}"))]
    }
}

fn skills(_context: &DispatchContext<'_>, _command: &Command) -> Vec<RenderOp> {
    vec![output(SKILLS_SUMMARY)]
}

fn about(context: &DispatchContext<'_>, _command: &Command) -> Vec<RenderOp> {
    let mut ops = vec![output(ABOUT_TEXT)];
    if context.page.has_section(ABOUT_SECTION) {
        ops.push(RenderOp::ScrollTo(ABOUT_SECTION.to_string()));
    }
    ops
}

fn contact(_context: &DispatchContext<'_>, _command: &Command) -> Vec<RenderOp> {
    vec![
        output("Email: "),
        RenderOp::Append(TranscriptLine::link_only(Link::new(
            format!("mailto:{CONTACT_EMAIL}"),
            CONTACT_EMAIL,
        ))),
    ]
}

fn resume(_context: &DispatchContext<'_>, _command: &Command) -> Vec<RenderOp> {
    vec![RenderOp::Append(TranscriptLine::output_with_link(
        "Resume:",
        Link::download(RESUME_PATH, "Download resume"),
    ))]
}

fn clear(_context: &DispatchContext<'_>, _command: &Command) -> Vec<RenderOp> {
    vec![RenderOp::ClearTranscript]
}
