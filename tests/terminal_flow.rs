use folio_term::{
    intro_script, Caret, Key, KeyOutcome, LinkAction, Page, ProjectRecord, ProjectSource,
    SampleProjects, Step, TerminalController, TerminalOptions, TranscriptLine, TypewriterTiming,
};
use history_store::{HistoryLog, MemoryStorage, HISTORY_KEY};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct PageSpy {
    sections: Vec<&'static str>,
    scrolled: Vec<String>,
    opened: Vec<String>,
}

impl PageSpy {
    fn with_sections(sections: &[&'static str]) -> Self {
        Self {
            sections: sections.to_vec(),
            ..Self::default()
        }
    }
}

impl Page for PageSpy {
    fn has_section(&self, id: &str) -> bool {
        self.sections.iter().any(|section| *section == id)
    }

    fn scroll_to(&mut self, id: &str) {
        self.scrolled.push(id.to_string());
    }

    fn open_external(&mut self, href: &str) {
        self.opened.push(href.to_string());
    }
}

fn reduced_motion() -> TerminalOptions {
    TerminalOptions {
        reduced_motion: true,
        ..TerminalOptions::default()
    }
}

fn controller_with(storage: MemoryStorage) -> TerminalController<MemoryStorage> {
    let mut controller = TerminalController::new(
        reduced_motion(),
        HistoryLog::new(storage),
        Box::new(SampleProjects::default()),
    );
    assert_eq!(controller.start_intro(), Step::Done);
    controller
}

fn ready_controller() -> TerminalController<MemoryStorage> {
    controller_with(MemoryStorage::new())
}

fn texts(controller: &TerminalController<MemoryStorage>) -> Vec<String> {
    controller
        .transcript()
        .lines()
        .iter()
        .map(TranscriptLine::plain_text)
        .collect()
}

fn type_text(controller: &mut TerminalController<MemoryStorage>, page: &mut PageSpy, text: &str) {
    controller.handle_key(&Key::Text(text.to_string()), page);
}

fn submit(controller: &mut TerminalController<MemoryStorage>, page: &mut PageSpy, text: &str) {
    type_text(controller, page, text);
    assert_eq!(controller.handle_key(&Key::Enter, page), KeyOutcome::PreventDefault);
}

#[test]
fn reduced_motion_intro_enables_and_focuses_input_at_once() {
    let controller = ready_controller();

    assert_eq!(controller.transcript().len(), 6);
    assert!(controller.input().enabled);
    assert!(controller.input().focused);
    assert_eq!(controller.caret(), Caret::Hidden);
}

#[test]
fn keys_are_ignored_while_the_intro_types() {
    let mut controller = TerminalController::new(
        TerminalOptions::default(),
        HistoryLog::new(MemoryStorage::new()),
        Box::new(SampleProjects::default()),
    );
    let mut page = PageSpy::default();

    assert!(matches!(controller.start_intro(), Step::Wait(_)));
    assert_eq!(controller.caret(), Caret::Blinking);
    assert_eq!(
        controller.handle_key(&Key::Text("help".to_string()), &mut page),
        KeyOutcome::Ignored
    );
    assert_eq!(controller.handle_key(&Key::Enter, &mut page), KeyOutcome::Ignored);
    assert_eq!(controller.input().value, "");
    assert!(controller.history().is_empty());
}

#[test]
fn typed_intro_hands_over_to_input_only_when_done() {
    let mut controller = TerminalController::new(
        TerminalOptions {
            timing: TypewriterTiming::default(),
            ..TerminalOptions::default()
        },
        HistoryLog::new(MemoryStorage::new()),
        Box::new(SampleProjects::default()),
    );

    let mut step = controller.start_intro();
    let mut ticks = 0;
    while let Step::Wait(_) = step {
        assert!(!controller.input().enabled);
        step = controller.tick_intro();
        ticks += 1;
    }

    let expected_chars: usize = intro_script().iter().map(|line| line.text.chars().count()).sum();
    assert!(ticks >= expected_chars);
    assert!(controller.input().enabled);
    assert_eq!(controller.caret(), Caret::Hidden);
}

#[test]
fn every_submission_echoes_once_before_its_output() {
    let mut controller = ready_controller();
    let mut page = PageSpy::default();
    controller.dispatch("clear", &mut page);

    submit(&mut controller, &mut page, "skills");
    submit(&mut controller, &mut page, "nope");

    assert_eq!(
        texts(&controller),
        vec![
            "kimeddy@portfolio:~$ skills",
            "JavaScript • Node.js • React • Python • DevOps",
            "kimeddy@portfolio:~$ nope",
            "Command not found: 'nope'. Try 'help'.",
        ]
    );
    assert_eq!(controller.input().value, "");
}

#[test]
fn blank_submission_records_and_echoes_nothing() {
    let mut controller = ready_controller();
    let mut page = PageSpy::default();

    submit(&mut controller, &mut page, "   ");

    assert_eq!(controller.transcript().len(), 6);
    assert!(controller.history().is_empty());
}

#[test]
fn history_recall_walks_back_and_forward() {
    let mut controller = ready_controller();
    let mut page = PageSpy::default();
    for command in ["a", "b", "c"] {
        submit(&mut controller, &mut page, command);
    }

    let mut recalled = Vec::new();
    for _ in 0..3 {
        assert_eq!(controller.handle_key(&Key::Up, &mut page), KeyOutcome::PreventDefault);
        recalled.push(controller.input().value.clone());
    }
    assert_eq!(recalled, vec!["c", "b", "a"]);

    controller.handle_key(&Key::Up, &mut page);
    assert_eq!(controller.input().value, "a");

    controller.handle_key(&Key::Down, &mut page);
    assert_eq!(controller.input().value, "b");
}

#[test]
fn arrows_on_empty_history_leave_the_field_alone() {
    let mut controller = ready_controller();
    let mut page = PageSpy::default();
    type_text(&mut controller, &mut page, "draft");

    assert_eq!(controller.handle_key(&Key::Up, &mut page), KeyOutcome::PreventDefault);
    assert_eq!(controller.handle_key(&Key::Down, &mut page), KeyOutcome::PreventDefault);
    assert_eq!(controller.input().value, "draft");
}

#[test]
fn tab_fills_a_single_match_and_lists_several() {
    let mut controller = ready_controller();
    let mut page = PageSpy::default();

    type_text(&mut controller, &mut page, "o");
    assert_eq!(controller.handle_key(&Key::Tab, &mut page), KeyOutcome::PreventDefault);
    assert_eq!(controller.input().value, "open ");

    controller.handle_key(&Key::Backspace, &mut page);
    controller.handle_key(&Key::Backspace, &mut page);
    controller.handle_key(&Key::Backspace, &mut page);
    controller.handle_key(&Key::Backspace, &mut page);
    controller.handle_key(&Key::Backspace, &mut page);
    type_text(&mut controller, &mut page, "c");
    controller.handle_key(&Key::Tab, &mut page);

    assert_eq!(controller.input().value, "c");
    assert_eq!(
        texts(&controller).last().map(String::as_str),
        Some("Suggestions: contact, clear")
    );
}

#[test]
fn backspace_removes_a_whole_grapheme() {
    let mut controller = ready_controller();
    let mut page = PageSpy::default();
    type_text(&mut controller, &mut page, "cafe\u{301}");

    controller.handle_key(&Key::Backspace, &mut page);
    assert_eq!(controller.input().value, "caf");

    type_text(&mut controller, &mut page, "\u{1F469}\u{200D}\u{1F4BB}");
    controller.handle_key(&Key::Backspace, &mut page);
    assert_eq!(controller.input().value, "caf");
}

#[test]
fn uppercase_clear_empties_the_transcript_including_the_intro() {
    let mut controller = ready_controller();
    let mut page = PageSpy::default();

    controller.dispatch("CLEAR", &mut page);

    assert!(controller.transcript().is_empty());
}

#[test]
fn open_missing_section_reports_once_and_does_not_scroll() {
    let mut controller = ready_controller();
    let mut page = PageSpy::with_sections(&["about", "projects"]);
    controller.dispatch("clear", &mut page);

    controller.dispatch("open nosuchsection", &mut page);

    assert_eq!(
        texts(&controller),
        vec![
            "kimeddy@portfolio:~$ open nosuchsection",
            "Section not found: nosuchsection",
        ]
    );
    assert!(page.scrolled.is_empty());

    controller.dispatch("open projects", &mut page);
    assert_eq!(page.scrolled, vec!["projects".to_string()]);
}

#[test]
fn about_scrolls_only_when_the_section_exists() {
    let mut controller = ready_controller();
    let mut without = PageSpy::default();
    controller.dispatch("about", &mut without);
    assert!(without.scrolled.is_empty());

    let mut with = PageSpy::with_sections(&["about"]);
    controller.dispatch("about", &mut with);
    assert_eq!(with.scrolled, vec!["about".to_string()]);
}

#[test]
fn projects_lists_header_then_one_card_per_record_in_order() {
    let mut controller = ready_controller();
    let mut page = PageSpy::default();
    controller.dispatch("clear", &mut page);

    controller.dispatch("projects", &mut page);

    let records = SampleProjects::default();
    let lines = controller.transcript().lines();
    assert_eq!(lines.len(), records.projects().len() + 2);
    assert_eq!(lines[1].plain_text(), "Showing projects:");
    let titles: Vec<&str> = lines[2..]
        .iter()
        .map(|line| match line {
            TranscriptLine::ProjectCard(card) => card.title.as_str(),
            other => panic!("expected a project card, got {other:?}"),
        })
        .collect();
    let expected: Vec<&str> = records
        .projects()
        .iter()
        .map(|record: &ProjectRecord| record.title.as_str())
        .collect();
    assert_eq!(titles, expected);
}

#[test]
fn persisted_history_round_trips_through_recall() {
    let mut controller = ready_controller();
    let mut page = PageSpy::default();
    for command in ["help", "open  about ", "help"] {
        submit(&mut controller, &mut page, command);
    }

    let persisted = controller
        .history()
        .log()
        .storage()
        .raw(HISTORY_KEY)
        .map(str::to_string)
        .expect("history should be persisted");
    assert_eq!(persisted, r#"["help","open  about ","help"]"#);

    let mut storage = MemoryStorage::new();
    storage.insert_raw(HISTORY_KEY, persisted);
    let mut reloaded = controller_with(storage);
    let mut recalled = Vec::new();
    for _ in 0..3 {
        reloaded.handle_key(&Key::Up, &mut page);
        recalled.push(reloaded.input().value.clone());
    }
    assert_eq!(recalled, vec!["help", "open  about ", "help"]);
}

#[test]
fn malformed_persisted_history_starts_empty() {
    let mut storage = MemoryStorage::new();
    storage.insert_raw(HISTORY_KEY, "{not json");
    let controller = controller_with(storage);

    assert!(controller.history().is_empty());
}

#[test]
fn storage_quota_failures_keep_history_in_memory() {
    let mut controller = controller_with(MemoryStorage::with_quota(4));
    let mut page = PageSpy::default();

    submit(&mut controller, &mut page, "skills");

    assert_eq!(controller.history().entries(), ["skills".to_string()]);
    assert_eq!(controller.history().log().storage().raw(HISTORY_KEY), None);
    assert_eq!(
        texts(&controller).last().map(String::as_str),
        Some("JavaScript • Node.js • React • Python • DevOps")
    );
}

#[test]
fn following_the_last_link_activates_it_against_the_page() {
    let mut controller = ready_controller();
    let mut page = PageSpy::with_sections(&["projects"]);

    assert!(controller.follow_last_link(&mut page));
    assert_eq!(page.scrolled, vec!["projects".to_string()]);

    controller.dispatch("contact", &mut page);
    let link = controller.transcript().last_link().expect("contact renders a link");
    assert_eq!(link.action, LinkAction::Mail("kim@example.com".to_string()));
    controller.follow_last_link(&mut page);
    assert_eq!(page.opened, vec!["mailto:kim@example.com".to_string()]);

    controller.dispatch("clear", &mut page);
    assert!(!controller.follow_last_link(&mut page));
}
