use std::io;
use std::time::Duration;

use folio_shell::page::ShellPage;
use folio_shell::shell::Shell;
use folio_term::{
    logging, select_project_source, EnvConfig, ProcessTerminal, TerminalController,
    TerminalOptions,
};
use history_store::{
    default_session_base, default_session_dir, prune_stale_sessions, FileStorage, HistoryLog,
};

/// Default session directories idle this long are removed at startup.
const STALE_SESSION_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

fn main() -> io::Result<()> {
    let config = EnvConfig::from_env();
    logging::init(&config).map_err(io::Error::other)?;

    let page = ShellPage::from_config(&config).map_err(io::Error::other)?;
    let projects = select_project_source(page.document().project_listing());

    let history_dir = match config.history_dir.clone() {
        Some(dir) => dir,
        None => {
            let dir = default_session_dir();
            let pruned = prune_stale_sessions(&default_session_base(), &dir, STALE_SESSION_AGE);
            if pruned > 0 {
                tracing::debug!(pruned, "removed stale session directories");
            }
            dir
        }
    };
    let storage = FileStorage::new(history_dir);
    tracing::debug!(dir = %storage.root().display(), projects = projects.name(), "starting shell");
    let history = HistoryLog::new(storage);

    let controller =
        TerminalController::new(TerminalOptions::from_config(&config), history, projects);
    let mut shell = Shell::new(ProcessTerminal::new(), controller, page);
    shell.run()
}
