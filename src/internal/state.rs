use crate::internal::autocomplete::{Autocomplete, InputOutcome};
use crate::internal::categories::ALL_CATEGORIES;
use crate::internal::models::Suggestion;
use crate::internal::request::{RequestToken, RequestTracker};

/// User intents that change [`UiState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SelectCategory(String),
    /// Search box text changed.
    EditSearch(String),
    /// Enter in the search box: takes the highlighted suggestion if any.
    SubmitSearch,
    ClearSearch,
    GoHome,
    ToggleTheme,
    /// Re-run whatever the news area currently shows.
    Refresh,
    SuggestionDown,
    SuggestionUp,
    DismissSuggestions,
}

/// Side effects requested by the reducer, executed by the app loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadNews {
        category: String,
        token: RequestToken,
    },
    Search {
        query: String,
        category: String,
        token: RequestToken,
    },
    /// Debounce, then fetch suggestions.
    ScheduleSuggestions { query: String, token: RequestToken },
    CancelSuggestions,
    PersistTheme(bool),
    LoadStats,
}

/// Everything the page remembers between key presses.
#[derive(Debug)]
pub struct UiState {
    pub active_category: String,
    pub dark_mode: bool,
    /// Last submitted search, empty outside search mode.
    pub search_query: String,
    /// Text currently typed in the search box.
    pub search_input: String,
    pub is_search_active: bool,
    pub autocomplete: Autocomplete,
    content_requests: RequestTracker,
}

impl UiState {
    pub fn new(dark_mode: bool) -> Self {
        Self {
            active_category: ALL_CATEGORIES.to_string(),
            dark_mode,
            search_query: String::new(),
            search_input: String::new(),
            is_search_active: false,
            autocomplete: Autocomplete::new(),
            content_requests: RequestTracker::new(),
        }
    }

    /// Highlighted suggestion index, if any.
    pub fn autocomplete_selected_index(&self) -> Option<usize> {
        self.autocomplete.selected()
    }

    /// Whether a news/search response still matches the latest request.
    pub fn accepts_content(&self, token: RequestToken) -> bool {
        self.content_requests.is_current(token)
    }

    /// Apply a suggestion response; stale ones are dropped.
    pub fn apply_suggestions(
        &mut self,
        token: RequestToken,
        query: &str,
        suggestions: Option<Vec<Suggestion>>,
    ) -> bool {
        self.autocomplete.on_suggestions(token, query, suggestions)
    }

    /// Command that reloads the current news area.
    pub fn current_view(&mut self) -> Command {
        match self.is_search_active {
            true => Command::Search {
                query: self.search_query.clone(),
                category: self.active_category.clone(),
                token: self.content_requests.issue(),
            },
            false => self.load_news(),
        }
    }

    fn load_news(&mut self) -> Command {
        Command::LoadNews {
            category: self.active_category.clone(),
            token: self.content_requests.issue(),
        }
    }

    fn leave_search(&mut self) {
        self.is_search_active = false;
        self.search_query.clear();
        self.search_input.clear();
        self.autocomplete.hide();
    }

    /// The single place UI state changes.
    pub fn reduce(&mut self, intent: Intent) -> Vec<Command> {
        tracing::debug!(?intent, "reduce");
        match intent {
            Intent::SelectCategory(name) => {
                self.active_category = name;
                self.leave_search();
                vec![Command::CancelSuggestions, self.load_news()]
            }
            Intent::GoHome => {
                self.active_category = ALL_CATEGORIES.to_string();
                self.leave_search();
                vec![Command::CancelSuggestions, self.load_news()]
            }
            Intent::EditSearch(text) => {
                let outcome = self.autocomplete.on_input(&text);
                self.search_input = text;
                match outcome {
                    InputOutcome::Hide => vec![Command::CancelSuggestions],
                    InputOutcome::Fetch { query, token } => {
                        vec![Command::ScheduleSuggestions { query, token }]
                    }
                }
            }
            Intent::SubmitSearch => {
                if let Some(value) = self.autocomplete.accept() {
                    self.search_input = value;
                }
                self.autocomplete.hide();

                let query = self.search_input.trim().to_string();
                match query.is_empty() {
                    true => {
                        self.is_search_active = false;
                        self.search_query.clear();
                        vec![Command::CancelSuggestions, self.load_news()]
                    }
                    false => {
                        self.is_search_active = true;
                        self.search_query = query;
                        vec![Command::CancelSuggestions, self.current_view()]
                    }
                }
            }
            Intent::ClearSearch => {
                self.leave_search();
                vec![Command::CancelSuggestions, self.load_news()]
            }
            Intent::ToggleTheme => {
                self.dark_mode = !self.dark_mode;
                vec![Command::PersistTheme(self.dark_mode)]
            }
            Intent::Refresh => vec![self.current_view(), Command::LoadStats],
            Intent::SuggestionDown => {
                self.autocomplete.move_down();
                Vec::new()
            }
            Intent::SuggestionUp => {
                self.autocomplete.move_up();
                Vec::new()
            }
            Intent::DismissSuggestions => {
                self.autocomplete.hide();
                vec![Command::CancelSuggestions]
            }
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_of(cmd: &Command) -> RequestToken {
        match cmd {
            Command::LoadNews { token, .. } | Command::Search { token, .. } => *token,
            other => panic!("no token in {:?}", other),
        }
    }

    fn suggest(state: &mut UiState, text: &str, values: &[&str]) {
        let cmds = state.reduce(Intent::EditSearch(text.to_string()));
        let Some(Command::ScheduleSuggestions { query, token }) = cmds.into_iter().next() else {
            panic!("expected suggestions to be scheduled");
        };
        let list = values
            .iter()
            .map(|v| Suggestion {
                value: v.to_string(),
            })
            .collect();
        assert!(state.apply_suggestions(token, &query, Some(list)));
    }

    #[test]
    fn starts_on_all_categories() {
        let state = UiState::new(true);
        assert_eq!(state.active_category, "all");
        assert!(state.dark_mode);
        assert!(!state.is_search_active);
        assert_eq!(state.autocomplete_selected_index(), None);
    }

    #[test]
    fn selecting_category_exits_search_and_loads_news() {
        let mut state = UiState::default();
        state.reduce(Intent::EditSearch("rust".into()));
        state.reduce(Intent::SubmitSearch);
        assert!(state.is_search_active);

        let cmds = state.reduce(Intent::SelectCategory("Security".into()));
        assert!(!state.is_search_active);
        assert!(state.search_input.is_empty());
        assert!(state.search_query.is_empty());
        assert!(matches!(
            &cmds[1],
            Command::LoadNews { category, .. } if category == "Security"
        ));
    }

    #[test]
    fn search_remembers_category() {
        let mut state = UiState::default();
        state.reduce(Intent::SelectCategory("Data".into()));
        state.reduce(Intent::EditSearch("  sql ".into()));
        let cmds = state.reduce(Intent::SubmitSearch);
        assert!(matches!(
            &cmds[1],
            Command::Search { query, category, .. } if query == "sql" && category == "Data"
        ));

        let cmds = state.reduce(Intent::ClearSearch);
        assert_eq!(state.active_category, "Data");
        assert!(matches!(
            &cmds[1],
            Command::LoadNews { category, .. } if category == "Data"
        ));
    }

    #[test]
    fn blank_submit_shows_listing() {
        let mut state = UiState::default();
        state.reduce(Intent::EditSearch("   ".into()));
        let cmds = state.reduce(Intent::SubmitSearch);
        assert!(!state.is_search_active);
        assert!(matches!(&cmds[1], Command::LoadNews { .. }));
    }

    #[test]
    fn submit_uses_highlighted_suggestion() {
        let mut state = UiState::default();
        suggest(&mut state, "ru", &["rust", "ruby"]);
        state.reduce(Intent::SuggestionDown);
        state.reduce(Intent::SuggestionDown);
        assert_eq!(state.autocomplete_selected_index(), Some(1));

        let cmds = state.reduce(Intent::SubmitSearch);
        assert_eq!(state.search_input, "ruby");
        assert!(!state.autocomplete.is_visible());
        assert!(matches!(
            &cmds[1],
            Command::Search { query, .. } if query == "ruby"
        ));
    }

    #[test]
    fn blank_edit_cancels_suggestions() {
        let mut state = UiState::default();
        suggest(&mut state, "ru", &["rust"]);
        let cmds = state.reduce(Intent::EditSearch(String::new()));
        assert_eq!(cmds, vec![Command::CancelSuggestions]);
        assert!(!state.autocomplete.is_visible());
    }

    #[test]
    fn go_home_resets_everything() {
        let mut state = UiState::default();
        state.reduce(Intent::SelectCategory("Hardware".into()));
        suggest(&mut state, "ch", &["chips"]);
        state.reduce(Intent::GoHome);
        assert_eq!(state.active_category, "all");
        assert!(state.search_input.is_empty());
        assert!(!state.autocomplete.is_visible());
    }

    #[test]
    fn toggle_theme_persists_new_value() {
        let mut state = UiState::new(false);
        assert_eq!(state.reduce(Intent::ToggleTheme), vec![Command::PersistTheme(true)]);
        assert_eq!(state.reduce(Intent::ToggleTheme), vec![Command::PersistTheme(false)]);
    }

    #[test]
    fn newer_content_request_supersedes_older() {
        let mut state = UiState::default();
        let first = token_of(&state.reduce(Intent::SelectCategory("Data".into()))[1]);
        let second = token_of(&state.reduce(Intent::SelectCategory("AI & ML".into()))[1]);
        assert!(!state.accepts_content(first));
        assert!(state.accepts_content(second));
    }

    #[test]
    fn refresh_repeats_search_when_active() {
        let mut state = UiState::default();
        state.reduce(Intent::EditSearch("llm".into()));
        state.reduce(Intent::SubmitSearch);
        let cmds = state.reduce(Intent::Refresh);
        assert!(matches!(&cmds[0], Command::Search { query, .. } if query == "llm"));
        assert_eq!(cmds[1], Command::LoadStats);
    }
}
