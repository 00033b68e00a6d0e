use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{enable_raw_mode, EnterAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::submit::SubmitError;
use crate::survey::{FieldStore, ListField};
use crate::ui::components::{
    Footer, FooterContext, SectionView, Spinner, SuccessScreen, WelcomeScreen,
};
use crate::ui::events::AppEvent;
use crate::ui::focus::{self, FocusState, FocusTarget};
use crate::ui::terminal_guard::TerminalGuard;
use crate::wizard::{Wizard, WizardPhase};

/// Terminal front end for the survey wizard
pub struct App {
    wizard: Wizard,
    focus: FocusState,
    spinner: Spinner,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    tick_count: usize,
    should_quit: bool,
}

impl App {
    /// Wrap an already mounted wizard
    pub fn new(wizard: Wizard) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            wizard,
            focus: FocusState::default(),
            spinner: Spinner::new(),
            event_tx,
            event_rx,
            tick_count: 0,
            should_quit: false,
        }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn focused(&self) -> Option<FocusTarget> {
        self.focus.current(&self.targets())
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut guard = TerminalGuard::new();
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal).await;

        guard.cleanup()?;
        terminal.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(16)) => {
                    if event::poll(Duration::from_millis(0))? {
                        match event::read()? {
                            Event::Key(key) if key.kind == KeyEventKind::Press => {
                                self.handle_key(key, Instant::now());
                            }
                            Event::Paste(text) => self.handle_paste(&text, Instant::now()),
                            _ => {}
                        }
                    }

                    self.wizard.tick(Instant::now());

                    // ~100ms per spinner frame
                    self.tick_count += 1;
                    if self.tick_count % 6 == 0 {
                        self.spinner.tick();
                    }
                }

                Some(event) = self.event_rx.recv() => {
                    self.handle_app_event(event);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SubmissionFinished(result) => {
                if let Err(e) = self.wizard.finish_submit(result) {
                    tracing::warn!(error = %e, "Submission failed");
                }
            }
        }
    }

    fn targets(&self) -> Vec<FocusTarget> {
        focus::targets(self.wizard.section(), self.wizard.fields())
    }

    /// Ignored while a save is in flight; its outcome decides the draft
    fn quit(&mut self, now: Instant) {
        if self.wizard.is_submitting() {
            return;
        }
        self.wizard.unload(now);
        self.should_quit = true;
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if (ctrl && key.code == KeyCode::Char('q')) || key.code == KeyCode::Esc {
            self.quit(now);
            return;
        }

        match self.wizard.phase() {
            WizardPhase::Welcome => {
                if key.code == KeyCode::Enter {
                    self.wizard.begin();
                    self.focus.reset();
                    self.sync_option();
                }
                return;
            }
            WizardPhase::Submitted(_) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char('q')) {
                    self.should_quit = true;
                }
                return;
            }
            _ => {}
        }

        if ctrl {
            match key.code {
                KeyCode::Char('n') => self.advance(now),
                KeyCode::Char('p') => self.retreat(now),
                KeyCode::Char('s') => self.start_submit(now),
                KeyCode::Char('d') => self.remove_list_item(now),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::PageDown => self.advance(now),
            KeyCode::PageUp => self.retreat(now),
            KeyCode::Tab => {
                self.wizard.blur(now);
                self.focus.next(self.targets().len());
                self.sync_option();
            }
            KeyCode::BackTab => {
                self.wizard.blur(now);
                self.focus.prev(self.targets().len());
                self.sync_option();
            }
            _ => self.edit_focused(key.code, now),
        }
    }

    fn edit_focused(&mut self, code: KeyCode, now: Instant) {
        let Some(target) = self.focused() else {
            return;
        };

        match (target, code) {
            (FocusTarget::Text(field), KeyCode::Char(c)) => self.wizard.push_char(now, field, c),
            (FocusTarget::Text(field), KeyCode::Backspace) => self.wizard.pop_char(now, field),
            (FocusTarget::Text(field), KeyCode::Enter) => {
                if field.is_multiline() {
                    self.wizard.push_char(now, field, '\n');
                } else {
                    self.wizard.blur(now);
                    self.focus.next(self.targets().len());
                    self.sync_option();
                }
            }

            (FocusTarget::Choice(_), KeyCode::Up) => self.focus.option_up(),
            (FocusTarget::Choice(field), KeyCode::Down) => {
                self.focus.option_down(field.options().len())
            }
            (FocusTarget::Choice(field), KeyCode::Char(' ') | KeyCode::Enter) => {
                self.wizard.select_choice(now, field, self.focus.option());
            }

            (FocusTarget::Set(_), KeyCode::Up) => self.focus.option_up(),
            (FocusTarget::Set(field), KeyCode::Down) => {
                self.focus.option_down(field.options().len())
            }
            (FocusTarget::Set(field), KeyCode::Char(' ') | KeyCode::Enter) => {
                self.wizard.toggle_set_member(now, field, self.focus.option());
            }

            (FocusTarget::ListItem(field, i), KeyCode::Char(c)) => {
                self.wizard.push_list_char(now, field, i, c)
            }
            (FocusTarget::ListItem(field, i), KeyCode::Backspace) => {
                self.wizard.pop_list_char(now, field, i)
            }
            (FocusTarget::ListItem(field, _), KeyCode::Enter) => self.append_list_item(field, now),

            _ => {}
        }
    }

    fn handle_paste(&mut self, text: &str, now: Instant) {
        match self.focused() {
            Some(FocusTarget::Text(field)) => {
                let mut value = self.wizard.fields().text(field).to_string();
                value.push_str(text);
                self.wizard.set_text(now, field, value);
            }
            Some(FocusTarget::ListItem(field, i)) => {
                let value = list_value(self.wizard.fields(), field, i) + text;
                self.wizard.update_list_item(now, field, i, value);
            }
            _ => {}
        }
    }

    fn append_list_item(&mut self, field: ListField, now: Instant) {
        self.wizard.append_list_item(now, field);
        let last = self.wizard.fields().list(field).len().saturating_sub(1);
        let targets = self.targets();
        self.focus.focus(&targets, FocusTarget::ListItem(field, last));
    }

    fn remove_list_item(&mut self, now: Instant) {
        if let Some(FocusTarget::ListItem(field, i)) = self.focused() {
            self.wizard.remove_list_item(now, field, i);
            self.focus.clamp(self.targets().len());
        }
    }

    fn advance(&mut self, now: Instant) {
        match self.wizard.advance(now) {
            Ok(t) if t.moved() => {
                self.focus.reset();
                self.sync_option();
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(missing = ?e.missing, "Advance blocked"),
        }
    }

    fn retreat(&mut self, now: Instant) {
        if self.wizard.retreat(now).moved() {
            self.focus.reset();
            self.sync_option();
        }
    }

    fn start_submit(&mut self, now: Instant) {
        match self.wizard.begin_submit(now) {
            Ok(pending) => {
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = pending.run().await;
                    let _ = tx.send(AppEvent::SubmissionFinished(result));
                });
            }
            Err(SubmitError::InFlight) => {}
            Err(e) => tracing::debug!(error = %e, "Submission not started"),
        }
    }

    /// Point the option cursor at the current answer of a focused choice
    fn sync_option(&mut self) {
        if let Some(FocusTarget::Choice(field)) = self.focused() {
            let selected = self.wizard.fields().choice_index(field).unwrap_or(0);
            self.focus.set_option(selected, field.options().len());
        }
    }

    fn footer_context(&self) -> FooterContext {
        match self.wizard.phase() {
            WizardPhase::Welcome => FooterContext::Welcome,
            WizardPhase::Submitting => FooterContext::Submitting,
            WizardPhase::Submitted(_) => FooterContext::Submitted,
            WizardPhase::Editing | WizardPhase::Failed { .. } => FooterContext::Editing {
                focus: self.focused(),
                final_section: self.wizard.is_final_section(),
            },
        }
    }

    pub fn draw(&self, f: &mut Frame) {
        let [main, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(f.area());
        let buf = f.buffer_mut();

        match self.wizard.phase() {
            WizardPhase::Welcome => {
                WelcomeScreen::new(self.wizard.restored_draft()).render(main, buf)
            }
            WizardPhase::Submitted(submitted) => SuccessScreen::new(submitted).render(main, buf),
            _ => SectionView::new(&self.wizard, self.focused(), self.focus.option())
                .with_tick(self.spinner.position())
                .render(main, buf),
        }

        Footer::for_context(self.footer_context()).render(footer, buf);
    }
}

fn list_value(fields: &FieldStore, field: ListField, index: usize) -> String {
    fields
        .list(field)
        .get(index)
        .cloned()
        .unwrap_or_default()
}
