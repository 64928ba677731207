use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::api::ApiService;
use crate::config::AppConfig;
use crate::internal::autocomplete::AutocompleteState;
use crate::internal::categories::{CategoryPill, build_pills};
use crate::internal::models::{Category, StatsSnapshot, StoryItem, Suggestion, UpdateResponse};
use crate::internal::notification::Notification;
use crate::internal::preferences::Preferences;
use crate::internal::render::{NewsView, StoryCard, render_listing, render_search};
use crate::internal::request::{Debouncer, RequestToken};
use crate::internal::state::{Command, Intent, UiState};
use crate::internal::stats::{StatsCommand, StatsModal, StatsTab};
use crate::internal::update::{SYNCING_MESSAGE, UpdateOutcome, UpdateTrigger};
use crate::utils::datetime::Clock;
use crate::utils::theme::TuiTheme;

use ratatui::Frame;
use ratatui::widgets::ListState;

/// Input modes for the UI.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InputMode {
    Normal,
    Search,
}

/// Actions/messages sent through the app action channel.
#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    /// Forward an intent to the UI state reducer.
    Dispatch(Intent),
    EnterSearchMode,
    LeaveSearchMode,
    NavigateUp,
    NavigateDown,
    OpenSelected,
    PrevCategory,
    NextCategory,
    ToggleStats,
    NextStatsTab,
    SelectStatsTab(StatsTab),
    TriggerUpdate,
    LoadCategories,
    CategoriesLoaded(Option<Vec<Category>>),
    NewsLoaded {
        token: RequestToken,
        result: Option<Vec<StoryItem>>,
    },
    SearchLoaded {
        token: RequestToken,
        query: String,
        result: Option<Vec<StoryItem>>,
    },
    /// Debounce elapsed; ask the backend for suggestions.
    FetchSuggestions {
        query: String,
        token: RequestToken,
    },
    SuggestionsLoaded {
        token: RequestToken,
        query: String,
        result: Option<Vec<Suggestion>>,
    },
    StatsLoaded(Option<StatsSnapshot>),
    TopStoriesLoaded {
        tab: StatsTab,
        token: RequestToken,
        result: Option<Vec<StoryItem>>,
    },
    UpdateFinished(Option<UpdateResponse>),
    RefreshStatsModal,
    UpdateReset,
    ClearNotification,
}

pub struct App {
    pub running: bool,
    pub app_version: String,
    pub state: UiState,
    pub pills: Vec<CategoryPill>,
    pub news: NewsView,
    pub list_state: ListState,
    pub stats: StatsModal,
    pub update: UpdateTrigger,
    pub notification: Option<Notification>,
    pub spinner_state: usize,
    pub last_spinner_update: Option<Instant>,
    pub input_mode: InputMode,
    pub theme: TuiTheme,
    pub preferences: Preferences,
    pub config: AppConfig,
    pub api_service: Arc<ApiService>,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
    debouncer: Debouncer,
}

impl App {
    #[tracing::instrument(skip(config))]
    pub fn new(config: AppConfig) -> Result<Self> {
        let start = Instant::now();
        let api_service = ApiService::new(config.base_url.clone(), config.request_timeout())?
            .with_performance_metrics(config.logging.enable_performance_metrics);

        let preferences = match Preferences::load_or_create() {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("Failed to load preferences: {:#}", e);
                Preferences::default()
            }
        };

        let app = Self::with_services(config, api_service, preferences);
        tracing::info!(elapsed = ?start.elapsed(), dark_mode = app.state.dark_mode, "App initialized");
        Ok(app)
    }

    pub fn with_services(
        config: AppConfig,
        api_service: ApiService,
        preferences: Preferences,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let dark_mode = preferences.dark_mode;

        Self {
            running: true,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            state: UiState::new(dark_mode),
            pills: vec![CategoryPill::all()],
            news: NewsView::Loading,
            list_state: ListState::default(),
            stats: StatsModal::new(),
            update: UpdateTrigger::new(),
            notification: None,
            spinner_state: 0,
            last_spinner_update: None,
            input_mode: InputMode::Normal,
            theme: TuiTheme::for_mode(dark_mode),
            debouncer: Debouncer::new(config.autocomplete_debounce()),
            preferences,
            config,
            api_service: Arc::new(api_service),
            action_tx,
            action_rx,
        }
    }

    pub async fn run(&mut self, mut tui: crate::tui::Tui) -> Result<()> {
        self.start();

        let mut event_interval = tokio::time::interval(std::time::Duration::from_millis(16));

        loop {
            let now = Instant::now();
            match self.last_spinner_update {
                Some(last) if now.duration_since(last).as_millis() >= 100 => {
                    self.spinner_state = self.spinner_state.wrapping_add(1);
                    self.last_spinner_update = Some(now);
                }
                Some(_) => {}
                None => self.last_spinner_update = Some(now),
            }

            if let Some(notification) = &self.notification
                && notification.should_dismiss()
            {
                self.handle_action(Action::ClearNotification);
            }

            let frame_start = Instant::now();
            tui.draw(|f| self.ui(f))?;
            if self.config.logging.enable_performance_metrics {
                tracing::trace!(elapsed = ?frame_start.elapsed(), "frame");
            }

            tokio::select! {
                _ = event_interval.tick() => {
                    if event::poll(std::time::Duration::from_millis(0))?
                        && let Event::Key(key) = event::read()?
                            && key.kind == KeyEventKind::Press {
                                self.handle_key_event(key);
                            }
                }
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }
            }

            if !self.running {
                break;
            }
        }
        Ok(())
    }

    /// Initial page load: categories, the "all" listing and the stats snapshot.
    pub fn start(&mut self) {
        self.handle_action(Action::LoadCategories);
        let view = self.state.current_view();
        self.execute(view);
        self.execute(Command::LoadStats);
    }

    pub fn ui(&mut self, f: &mut Frame) {
        super::view::draw(self, f);
    }

    #[tracing::instrument(skip(self), level = "trace")]
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if let Some(action) = self.map_key(key) {
            self.handle_action(action);
        }
    }

    /// Translate a key press into an action for the current mode.
    pub fn map_key(&self, key: KeyEvent) -> Option<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Action::Quit);
        }

        match (self.input_mode, self.stats.is_open()) {
            (InputMode::Search, _) => self.map_search_key(key),
            (InputMode::Normal, true) => self.map_stats_key(key),
            (InputMode::Normal, false) => self.map_normal_key(key),
        }
    }

    fn map_normal_key(&self, key: KeyEvent) -> Option<Action> {
        let action = match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('/') => Action::EnterSearchMode,
            KeyCode::Esc if self.state.is_search_active => Action::Dispatch(Intent::ClearSearch),
            KeyCode::Char('h') | KeyCode::Left => Action::PrevCategory,
            KeyCode::Char('l') | KeyCode::Right => Action::NextCategory,
            KeyCode::Char('j') | KeyCode::Down => Action::NavigateDown,
            KeyCode::Char('k') | KeyCode::Up => Action::NavigateUp,
            KeyCode::Enter => Action::OpenSelected,
            KeyCode::Char('s') => Action::ToggleStats,
            KeyCode::Char('t') => Action::Dispatch(Intent::ToggleTheme),
            KeyCode::Char('u') => Action::TriggerUpdate,
            KeyCode::Char('r') => Action::Dispatch(Intent::Refresh),
            KeyCode::Char('H') => Action::Dispatch(Intent::GoHome),
            _ => return None,
        };
        Some(action)
    }

    fn map_stats_key(&self, key: KeyEvent) -> Option<Action> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('s') => Action::ToggleStats,
            KeyCode::Tab | KeyCode::BackTab => Action::NextStatsTab,
            KeyCode::Char('1') => Action::SelectStatsTab(StatsTab::Recent),
            KeyCode::Char('2') => Action::SelectStatsTab(StatsTab::AllTime),
            KeyCode::Char('t') => Action::Dispatch(Intent::ToggleTheme),
            KeyCode::Char('u') => Action::TriggerUpdate,
            _ => return None,
        };
        Some(action)
    }

    fn map_search_key(&self, key: KeyEvent) -> Option<Action> {
        let action = match key.code {
            KeyCode::Enter => Action::Dispatch(Intent::SubmitSearch),
            KeyCode::Esc if self.state.autocomplete.is_visible() => {
                Action::Dispatch(Intent::DismissSuggestions)
            }
            KeyCode::Esc => Action::LeaveSearchMode,
            KeyCode::Down => Action::Dispatch(Intent::SuggestionDown),
            KeyCode::Up => Action::Dispatch(Intent::SuggestionUp),
            KeyCode::Backspace => {
                let mut text = self.state.search_input.clone();
                text.pop();
                Action::Dispatch(Intent::EditSearch(text))
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut text = self.state.search_input.clone();
                text.push(c);
                Action::Dispatch(Intent::EditSearch(text))
            }
            _ => return None,
        };
        Some(action)
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Dispatch(intent) => {
                if intent == Intent::SubmitSearch {
                    self.input_mode = InputMode::Normal;
                }
                self.dispatch(intent);
            }
            Action::EnterSearchMode => self.input_mode = InputMode::Search,
            Action::LeaveSearchMode => {
                self.input_mode = InputMode::Normal;
                self.dispatch(Intent::DismissSuggestions);
            }
            Action::NavigateUp => self.select_prev(),
            Action::NavigateDown => self.select_next(),
            Action::OpenSelected => self.open_selected(),
            Action::PrevCategory => self.step_category(-1),
            Action::NextCategory => self.step_category(1),
            Action::ToggleStats => match self.stats.is_open() {
                true => self.stats.close(),
                false => {
                    let cmds = self.stats.open();
                    self.run_stats_commands(cmds);
                }
            },
            Action::NextStatsTab => self.stats.next_tab(),
            Action::SelectStatsTab(tab) => self.stats.select_tab(tab),
            Action::TriggerUpdate => self.trigger_update(),
            Action::LoadCategories => {
                let api = self.api_service.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let categories = api.categories().await;
                    let _ = tx.send(Action::CategoriesLoaded(categories));
                });
            }
            Action::CategoriesLoaded(Some(categories)) => {
                self.pills = build_pills(&categories);
                tracing::debug!(count = self.pills.len(), "category pills rebuilt");
            }
            Action::CategoriesLoaded(None) => {
                tracing::warn!("categories unavailable, keeping current pills");
            }
            Action::NewsLoaded { token, result } => {
                if !self.state.accepts_content(token) {
                    tracing::debug!("discarding stale news response");
                    return;
                }
                self.news = render_listing(result, &Clock::system());
                self.reset_selection();
            }
            Action::SearchLoaded {
                token,
                query,
                result,
            } => {
                if !self.state.accepts_content(token) {
                    tracing::debug!(%query, "discarding stale search response");
                    return;
                }
                self.news = render_search(&query, result, &Clock::system());
                self.reset_selection();
            }
            Action::FetchSuggestions { query, token } => {
                let api = self.api_service.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let result = api.autocomplete(&query).await;
                    let _ = tx.send(Action::SuggestionsLoaded {
                        token,
                        query,
                        result,
                    });
                });
            }
            Action::SuggestionsLoaded {
                token,
                query,
                result,
            } => {
                if !self.state.apply_suggestions(token, &query, result) {
                    tracing::debug!(%query, "discarding stale suggestions");
                }
            }
            Action::StatsLoaded(snapshot) => {
                let cmds = self.stats.store_snapshot(snapshot);
                self.run_stats_commands(cmds);
            }
            Action::TopStoriesLoaded { tab, token, result } => {
                self.stats
                    .store_top_stories(tab, token, result, &Clock::system());
            }
            Action::UpdateFinished(response) => self.finish_update(response),
            Action::RefreshStatsModal => {
                let cmds = self.stats.refresh();
                self.run_stats_commands(cmds);
            }
            Action::UpdateReset => self.update.reset(),
            Action::ClearNotification => self.notification = None,
        }
    }

    /// Run an intent through the reducer and execute what it asks for.
    pub fn dispatch(&mut self, intent: Intent) {
        for command in self.state.reduce(intent) {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::LoadNews { .. } | Command::Search { .. } => {
                self.news = NewsView::Loading;
                let api = self.api_service.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    if let Some(action) = fetch_content(&api, command).await {
                        let _ = tx.send(action);
                    }
                });
            }
            Command::ScheduleSuggestions { query, token } => {
                let tx = self.action_tx.clone();
                self.debouncer.schedule(move || {
                    let _ = tx.send(Action::FetchSuggestions { query, token });
                });
            }
            Command::CancelSuggestions => self.debouncer.cancel(),
            Command::PersistTheme(dark_mode) => {
                self.theme = TuiTheme::for_mode(dark_mode);
                match self.preferences.set_dark_mode(dark_mode) {
                    Ok(()) => {
                        let name = if dark_mode { "dark" } else { "light" };
                        self.notification = Some(Notification::info(format!("Theme: {}", name)));
                    }
                    Err(e) => {
                        tracing::error!("Failed to save theme preference: {:#}", e);
                        self.notification =
                            Some(Notification::error("Failed to save theme preference"));
                    }
                }
            }
            Command::LoadStats => {
                self.run_stats_commands(vec![StatsCommand::FetchSnapshot]);
                let cmds = self.stats.refresh();
                self.run_stats_commands(cmds);
            }
        }
    }

    fn run_stats_commands(&mut self, commands: Vec<StatsCommand>) {
        for command in commands {
            let api = self.api_service.clone();
            let tx = self.action_tx.clone();
            match command {
                StatsCommand::FetchSnapshot => {
                    tokio::spawn(async move {
                        let snapshot = api.stats().await;
                        let _ = tx.send(Action::StatsLoaded(snapshot));
                    });
                }
                StatsCommand::FetchTopStories { tab, token } => {
                    tokio::spawn(async move {
                        let result = api.top_stories(tab).await;
                        let _ = tx.send(Action::TopStoriesLoaded { tab, token, result });
                    });
                }
            }
        }
    }

    fn trigger_update(&mut self) {
        if !self.update.start() {
            tracing::debug!("update already in progress");
            return;
        }
        self.notification = Some(Notification::progress(SYNCING_MESSAGE));

        let api = self.api_service.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let response = api.update().await;
            let _ = tx.send(Action::UpdateFinished(response));
        });
    }

    fn finish_update(&mut self, response: Option<UpdateResponse>) {
        let outcome = self.update.finish(response);
        tracing::info!(?outcome, "update finished");

        match &outcome {
            UpdateOutcome::Success(_) => {
                self.notification = Some(Notification::success(outcome.notice()));

                // Categories, the current view and stats reload together.
                let content = self.state.current_view();
                let api = self.api_service.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let (categories, content, stats) = futures::join!(
                        api.categories(),
                        fetch_content(&api, content),
                        api.stats()
                    );
                    let _ = tx.send(Action::CategoriesLoaded(categories));
                    if let Some(action) = content {
                        let _ = tx.send(action);
                    }
                    let _ = tx.send(Action::StatsLoaded(stats));
                    let _ = tx.send(Action::RefreshStatsModal);
                });
            }
            UpdateOutcome::Failure(_) => {
                self.notification = Some(Notification::error(outcome.notice()));
            }
        }

        let delay = self.config.update_reset_delay();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Action::UpdateReset);
        });
    }

    fn step_category(&mut self, step: isize) {
        let current = self
            .pills
            .iter()
            .position(|p| p.name == self.state.active_category)
            .unwrap_or(0);
        let last = self.pills.len().saturating_sub(1);
        let next = current.saturating_add_signed(step).min(last);

        if next != current
            && let Some(pill) = self.pills.get(next)
        {
            let name = pill.name.clone();
            self.dispatch(Intent::SelectCategory(name));
        }
    }

    pub fn selected_card(&self) -> Option<&StoryCard> {
        self.list_state
            .selected()
            .and_then(|i| self.news.cards().get(i))
    }

    fn open_selected(&mut self) {
        let Some(card) = self.selected_card() else {
            return;
        };
        match card.url.clone() {
            Some(url) => {
                if let Err(e) = open::that(&url) {
                    tracing::error!("Failed to open {}: {}", url, e);
                    self.notification = Some(Notification::error("Could not open browser"));
                }
            }
            None => {
                self.notification = Some(Notification::info("This story has no link"));
            }
        }
    }

    fn reset_selection(&mut self) {
        match self.news.cards().is_empty() {
            true => self.list_state.select(None),
            false => self.list_state.select(Some(0)),
        }
    }

    fn select_next(&mut self) {
        let len = self.news.cards().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn select_prev(&mut self) {
        if self.news.cards().is_empty() {
            return;
        }
        let i = self.list_state.selected().unwrap_or(0).saturating_sub(1);
        self.list_state.select(Some(i));
    }

    pub fn is_loading(&self) -> bool {
        self.news == NewsView::Loading
    }

    pub fn get_spinner_char(&self) -> char {
        const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
        SPINNER[self.spinner_state % SPINNER.len()]
    }

    pub fn suggestions_visible(&self) -> bool {
        self.input_mode == InputMode::Search
            && matches!(
                self.state.autocomplete.state(),
                AutocompleteState::Suggesting { .. }
            )
    }
}

/// Fetch whatever a content command asks for and wrap it as a result action.
async fn fetch_content(api: &ApiService, command: Command) -> Option<Action> {
    match command {
        Command::LoadNews { category, token } => Some(Action::NewsLoaded {
            token,
            result: api.news(&category).await,
        }),
        Command::Search {
            query,
            category,
            token,
        } => {
            let result = api.search(&query, &category).await;
            Some(Action::SearchLoaded {
                token,
                query,
                result,
            })
        }
        _ => None,
    }
}
