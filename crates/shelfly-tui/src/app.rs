//! Application orchestrator: event loop, screen routing, session gate,
//! and the overlay stack (form, confirm dialog, help, toasts).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
};
use secrecy::SecretString;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use shelfly_core::{BookDraft, BookId, Catalog, CoreError, SessionState};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, EventReader};
use crate::form::BookForm;
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

const TICK_RATE: Duration = Duration::from_millis(250);
const RENDER_RATE: Duration = Duration::from_millis(33);
const TOAST_DURATION: Duration = Duration::from_secs(3);

pub struct App {
    catalog: Catalog,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    active_screen: ScreenId,
    previous_screen: ScreenId,
    session: SessionState,
    running: bool,
    help_visible: bool,
    search_active: bool,
    search_query: String,
    pending_confirm: Option<ConfirmAction>,
    form: Option<BookForm>,
    notification: Option<(Notification, Instant)>,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
    data_cancel: CancellationToken,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            catalog,
            screens: create_screens(),
            // Gate until the session is resolved.
            active_screen: ScreenId::SignIn,
            previous_screen: ScreenId::Dashboard,
            session: SessionState::Unknown,
            running: true,
            help_visible: false,
            search_active: false,
            search_query: String::new(),
            pending_confirm: None,
            form: None,
            notification: None,
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }

        spawn_data_bridge(
            self.catalog.clone(),
            self.action_tx.clone(),
            self.data_cancel.clone(),
        );

        let mut events = EventReader::new(TICK_RATE, RENDER_RATE);
        info!("event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => self.handle_key_event(key)?,
                Event::Resize(w, h) => self.send(Action::Resize(w, h)),
                Event::Tick => self.send(Action::Tick),
                Event::Render => tui.draw(|frame| self.render(frame))?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(action)?;
            }
        }

        events.stop();
        self.data_cancel.cancel();
        tui.exit()?;
        info!("event loop stopped");
        Ok(())
    }

    fn send(&self, action: Action) {
        let _ = self.action_tx.send(action);
    }

    // ── Key routing ──────────────────────────────────────────────────
    //
    // Overlays take precedence over screens: form, then confirm dialog,
    // then help, then the search bar, then global keys.

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.send(Action::Quit);
            return Ok(());
        }

        if let Some(form) = &mut self.form {
            if let Some(action) = form.handle_key_event(key) {
                self.send(action);
            }
            return Ok(());
        }

        if self.pending_confirm.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.send(Action::ConfirmYes),
                KeyCode::Char('n') | KeyCode::Esc => self.send(Action::ConfirmNo),
                _ => {}
            }
            return Ok(());
        }

        if self.help_visible {
            self.send(Action::ToggleHelp);
            return Ok(());
        }

        if self.search_active {
            self.handle_search_key(key);
            return Ok(());
        }

        if !self.session.is_signed_in() {
            self.forward_key(ScreenId::SignIn, key)?;
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') => self.send(Action::Quit),
            KeyCode::Char('?') => self.send(Action::ToggleHelp),
            KeyCode::Char('S') => self.send(Action::RequestSignOut),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let id = c
                    .to_digit(10)
                    .and_then(|n| u8::try_from(n).ok())
                    .and_then(ScreenId::from_number);
                if let Some(id) = id {
                    self.send(Action::SwitchScreen(id));
                }
            }
            KeyCode::Tab => self.send(Action::SwitchScreen(self.active_screen.next())),
            KeyCode::BackTab => self.send(Action::SwitchScreen(self.active_screen.prev())),
            KeyCode::Esc => self.send(Action::GoBack),
            _ => self.forward_key(self.active_screen, key)?,
        }
        Ok(())
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.send(Action::CloseSearch),
            KeyCode::Enter => self.send(Action::SearchSubmit),
            KeyCode::Backspace => {
                self.search_query.pop();
                self.send(Action::SearchInput(self.search_query.clone()));
            }
            KeyCode::Char(c) => {
                self.search_query.push(c);
                self.send(Action::SearchInput(self.search_query.clone()));
            }
            _ => {}
        }
    }

    fn forward_key(&mut self, id: ScreenId, key: KeyEvent) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&id) {
            if let Some(action) = screen.handle_key_event(key)? {
                self.send(action);
            }
        }
        Ok(())
    }

    // ── Action processing ────────────────────────────────────────────

    #[allow(clippy::too_many_lines)]
    fn process_action(&mut self, action: Action) -> Result<()> {
        match &action {
            Action::Tick | Action::Render => {}
            other => debug!(action = ?other, "processing"),
        }

        match action {
            Action::Quit => self.running = false,
            Action::Render | Action::Resize(..) => {}
            Action::Tick => {
                self.expire_notification();
                self.broadcast(&Action::Tick)?;
            }

            Action::SwitchScreen(id) => self.switch_screen(id),
            Action::GoBack => self.switch_screen(self.previous_screen),

            // Data events and filter changes fan out to every screen.
            Action::BooksUpdated(_)
            | Action::SearchInput(_)
            | Action::GenreFilter(_)
            | Action::StatusFilter(_)
            | Action::ClearFilters => self.broadcast(&action)?,

            Action::SessionChanged(ref state) => {
                let state = state.clone();
                self.forward(ScreenId::SignIn, &action)?;
                self.apply_session(state);
            }

            Action::Refresh => self.spawn_refresh(),
            Action::SubmitCreate(draft) => self.spawn_create(draft),
            Action::SubmitUpdate(id, draft) => self.spawn_update(id, draft),
            Action::MutationDone => self.form = None,

            Action::RequestDelete { id, title } => {
                self.pending_confirm = Some(ConfirmAction::DeleteBook { id, title });
            }
            Action::RequestSignOut => {
                self.pending_confirm = Some(ConfirmAction::SignOut);
            }
            Action::ConfirmYes => self.execute_confirmed(),
            Action::ConfirmNo => {
                if let Some(ConfirmAction::DeleteBook { .. }) = self.pending_confirm.take() {
                    self.notification =
                        Some((Notification::info("Deletion cancelled"), Instant::now()));
                }
            }

            Action::OpenForm(book) => {
                self.form = Some(match book {
                    Some(book) => BookForm::edit(&book),
                    None => BookForm::add(),
                });
            }
            Action::CloseForm => self.form = None,

            Action::OpenSearch => self.search_active = true,
            Action::SearchSubmit => self.search_active = false,
            Action::CloseSearch => {
                self.search_active = false;
                self.search_query.clear();
                self.broadcast(&Action::CloseSearch)?;
            }

            Action::SignInSubmit { username, password } => self.spawn_sign_in(username, password),
            Action::SignInFailed(_) => self.forward(ScreenId::SignIn, &action)?,

            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::Notify(notification) => {
                self.notification = Some((notification, Instant::now()));
            }
            Action::DismissNotification => self.notification = None,
        }
        Ok(())
    }

    fn forward(&mut self, id: ScreenId, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&id) {
            if let Some(follow_up) = screen.update(action)? {
                self.send(follow_up);
            }
        }
        Ok(())
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        let mut follow_ups = Vec::new();
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                follow_ups.push(follow_up);
            }
        }
        for follow_up in follow_ups {
            self.send(follow_up);
        }
        Ok(())
    }

    fn switch_screen(&mut self, id: ScreenId) {
        if id.protected() && !self.session.is_signed_in() {
            return;
        }
        if id == self.active_screen {
            return;
        }
        self.previous_screen = self.active_screen;
        self.active_screen = id;
        for (screen_id, screen) in &mut self.screens {
            screen.set_focused(*screen_id == id);
        }
    }

    /// React to a session transition: route through the sign-in gate and
    /// greet the user when a session appears.
    fn apply_session(&mut self, state: SessionState) {
        let was_signed_in = self.session.is_signed_in();
        self.session = state;

        match &self.session {
            SessionState::SignedIn(user) => {
                if self.active_screen == ScreenId::SignIn {
                    let welcome = format!("Welcome, {}", user.label());
                    self.switch_screen(ScreenId::Dashboard);
                    self.notification = Some((Notification::success(welcome), Instant::now()));
                }
            }
            SessionState::SignedOut => {
                if self.active_screen.protected() {
                    // Drop every transient overlay along with the session.
                    self.form = None;
                    self.pending_confirm = None;
                    self.search_active = false;
                    self.active_screen = ScreenId::SignIn;
                    self.previous_screen = ScreenId::Dashboard;
                    if was_signed_in {
                        self.notification =
                            Some((Notification::info("Signed out"), Instant::now()));
                    }
                }
            }
            SessionState::Unknown => {}
        }
    }

    fn expire_notification(&mut self) {
        if let Some((_, shown_at)) = &self.notification {
            if shown_at.elapsed() >= TOAST_DURATION {
                self.notification = None;
            }
        }
    }

    // ── Catalog operations (spawned, report back via actions) ────────

    fn spawn_refresh(&self) {
        let catalog = self.catalog.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if let Err(err) = catalog.refresh().await {
                report_error(&tx, &err);
            }
        });
    }

    fn spawn_create(&self, draft: BookDraft) {
        let catalog = self.catalog.clone();
        let tx = self.action_tx.clone();
        let title = draft.title.trim().to_owned();
        tokio::spawn(async move {
            match catalog.create(&draft).await {
                Ok(()) => {
                    let _ = tx.send(Action::MutationDone);
                    let _ = tx.send(Action::Notify(Notification::success(format!(
                        "Added \"{title}\""
                    ))));
                }
                Err(err) => report_error(&tx, &err),
            }
        });
    }

    fn spawn_update(&self, id: BookId, draft: BookDraft) {
        let catalog = self.catalog.clone();
        let tx = self.action_tx.clone();
        let title = draft.title.trim().to_owned();
        tokio::spawn(async move {
            match catalog.update(&id, &draft).await {
                Ok(()) => {
                    let _ = tx.send(Action::MutationDone);
                    let _ = tx.send(Action::Notify(Notification::success(format!(
                        "Updated \"{title}\""
                    ))));
                }
                Err(err) => report_error(&tx, &err),
            }
        });
    }

    fn spawn_sign_in(&self, username: String, password: String) {
        let catalog = self.catalog.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let password = SecretString::from(password);
            // Success flows back as SessionChanged through the data bridge.
            if let Err(err) = catalog.sign_in(&username, &password).await {
                warn!(error = %err, "sign-in failed");
                let _ = tx.send(Action::SignInFailed(err.to_string()));
            } else if let Err(err) = catalog.refresh().await {
                report_error(&tx, &err);
            }
        });
    }

    fn execute_confirmed(&mut self) {
        let Some(confirm) = self.pending_confirm.take() else {
            return;
        };
        let catalog = self.catalog.clone();
        let tx = self.action_tx.clone();
        match confirm {
            ConfirmAction::DeleteBook { id, title } => {
                tokio::spawn(async move {
                    match catalog.delete(&id).await {
                        Ok(()) => {
                            let _ = tx.send(Action::Notify(Notification::success(format!(
                                "Deleted \"{title}\""
                            ))));
                        }
                        Err(err) => report_error(&tx, &err),
                    }
                });
            }
            ConfirmAction::SignOut => {
                tokio::spawn(async move {
                    if let Err(err) = catalog.sign_out().await {
                        report_error(&tx, &err);
                    }
                });
            }
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        if !self.session.is_signed_in() {
            if let Some(screen) = self.screens.get(&ScreenId::SignIn) {
                screen.render(frame, area);
            }
            self.render_notification(frame, area);
            return;
        }

        let [tabs_area, content_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_tabs(frame, tabs_area);
        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content_area);
        }
        self.render_status(frame, status_area);

        if let Some(form) = &self.form {
            form.render(frame, area);
        }
        if let Some(confirm) = &self.pending_confirm {
            render_confirm(frame, area, confirm);
        }
        if self.help_visible {
            render_help(frame, area);
        }
        self.render_notification(frame, area);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|id| Line::from(format!(" {} {} ", id.number(), id.label())))
            .collect();
        let selected = ScreenId::ALL
            .iter()
            .position(|id| *id == self.active_screen)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .style(theme::tab_inactive())
            .highlight_style(theme::tab_active())
            .divider("|");
        frame.render_widget(tabs, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        if self.search_active {
            let line = Line::from(vec![
                Span::styled(" /", theme::key_hint_key()),
                Span::styled(
                    format!("{}\u{2588}", self.search_query),
                    Style::default().fg(theme::PARCHMENT),
                ),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let user = self
            .session
            .user()
            .map_or_else(String::new, |u| u.label().to_owned());
        let mut spans = vec![Span::styled(
            format!(" {user}  "),
            Style::default().fg(theme::SAGE),
        )];
        for (key, what) in [("?", "help"), ("Tab", "screens"), ("S", "sign out"), ("q", "quit")] {
            spans.push(Span::styled(key, theme::key_hint_key()));
            spans.push(Span::styled(format!(" {what}  "), theme::key_hint()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_notification(&self, frame: &mut Frame, area: Rect) {
        let Some((notification, _)) = &self.notification else {
            return;
        };

        let style = match notification.level {
            NotificationLevel::Success => Style::default().fg(theme::SUCCESS_GREEN),
            NotificationLevel::Error => Style::default().fg(theme::ERROR_RED),
            NotificationLevel::Info => Style::default().fg(theme::SKY_BLUE),
        };

        let text_width = u16::try_from(notification.message.len()).unwrap_or(u16::MAX);
        let width = text_width.saturating_add(4).min(area.width);
        let popup = Rect {
            x: area.right().saturating_sub(width),
            y: area.y.saturating_add(1),
            width,
            height: 3.min(area.height),
        };

        frame.render_widget(Clear, popup);
        let toast = Paragraph::new(notification.message.as_str())
            .style(style)
            .block(Block::default().borders(Borders::ALL).border_style(style));
        frame.render_widget(toast, popup);
    }
}

fn report_error(tx: &UnboundedSender<Action>, err: &CoreError) {
    warn!(error = %err, "catalog operation failed");
    if matches!(err, CoreError::SignedOut) {
        let _ = tx.send(Action::SessionChanged(SessionState::SignedOut));
    }
    let _ = tx.send(Action::Notify(Notification::error(err.to_string())));
}

fn render_confirm(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
    let message = confirm.to_string();
    let width = u16::try_from(message.len())
        .unwrap_or(u16::MAX)
        .saturating_add(6)
        .clamp(30, area.width);
    let popup = centered_rect(width, 5, area);

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .title(Span::styled(" Confirm ", theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::field_error());
    let lines = vec![
        Line::from(message),
        Line::default(),
        Line::from(vec![
            Span::styled("y", theme::key_hint_key()),
            Span::styled(" confirm   ", theme::key_hint()),
            Span::styled("n", theme::key_hint_key()),
            Span::styled(" cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        popup,
    );
}

fn render_help(frame: &mut Frame, area: Rect) {
    let bindings = [
        ("1-3", "switch screen"),
        ("Tab / Shift+Tab", "cycle screens"),
        ("j / k", "move selection"),
        ("PgUp / PgDn", "page up / down"),
        ("a", "add book"),
        ("e / Enter", "edit selected"),
        ("d", "delete selected"),
        ("/", "search title or author"),
        ("g", "cycle genre filter"),
        ("s", "cycle status filter"),
        ("c", "clear filters"),
        ("r", "refresh"),
        ("S", "sign out"),
        ("?", "toggle help"),
        ("q", "quit"),
    ];

    let height = u16::try_from(bindings.len()).unwrap_or(u16::MAX).saturating_add(2);
    let popup = centered_rect(44, height, area);

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .title(Span::styled(" Keys ", theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));

    let lines: Vec<Line> = bindings
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!(" {key:<16}"), theme::key_hint_key()),
                Span::styled((*what).to_owned(), theme::key_hint()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Center a fixed-size rect inside `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
