use crate::internal::models::Suggestion;
use crate::internal::request::{RequestToken, RequestTracker};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AutocompleteState {
    #[default]
    Idle,
    Suggesting {
        items: Vec<String>,
        selected: Option<usize>,
    },
    /// Dismissed by Escape or by leaving the search box.
    Hidden,
}

/// What the caller should do after the search text changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Query is blank; the list has been hidden and nothing should be fetched.
    Hide,
    /// Debounce, then fetch suggestions for `query` tagged with `token`.
    Fetch { query: String, token: RequestToken },
}

/// Suggestion dropdown under the search box.
#[derive(Debug, Default)]
pub struct Autocomplete {
    state: AutocompleteState,
    query: String,
    requests: RequestTracker,
}

impl Autocomplete {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AutocompleteState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, AutocompleteState::Suggesting { .. })
    }

    /// Query the current suggestions were fetched for.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn items(&self) -> &[String] {
        match &self.state {
            AutocompleteState::Suggesting { items, .. } => items,
            _ => &[],
        }
    }

    pub fn selected(&self) -> Option<usize> {
        match &self.state {
            AutocompleteState::Suggesting { selected, .. } => *selected,
            _ => None,
        }
    }

    /// React to a change of the search text.
    pub fn on_input(&mut self, text: &str) -> InputOutcome {
        let query = text.trim();
        match query.is_empty() {
            true => {
                self.hide();
                InputOutcome::Hide
            }
            false => InputOutcome::Fetch {
                query: query.to_string(),
                token: self.requests.issue(),
            },
        }
    }

    /// Apply a suggestion response. Returns false when the response was
    /// superseded by newer input and has been discarded.
    pub fn on_suggestions(
        &mut self,
        token: RequestToken,
        query: &str,
        suggestions: Option<Vec<Suggestion>>,
    ) -> bool {
        if !self.requests.is_current(token) {
            tracing::debug!(query, "discarding stale autocomplete response");
            return false;
        }

        match suggestions {
            Some(list) if !list.is_empty() => {
                self.query = query.to_string();
                self.state = AutocompleteState::Suggesting {
                    items: list.into_iter().map(|s| s.value).collect(),
                    selected: None,
                };
            }
            _ => self.hide(),
        }
        true
    }

    pub fn move_down(&mut self) {
        if let AutocompleteState::Suggesting { items, selected } = &mut self.state
            && !items.is_empty()
        {
            *selected = match *selected {
                Some(i) if i + 1 < items.len() => Some(i + 1),
                _ => Some(0),
            };
        }
    }

    pub fn move_up(&mut self) {
        if let AutocompleteState::Suggesting { items, selected } = &mut self.state
            && !items.is_empty()
        {
            *selected = match *selected {
                Some(i) if i > 0 => Some(i - 1),
                _ => Some(items.len() - 1),
            };
        }
    }

    /// Take the highlighted suggestion, hiding the list. `None` when nothing is highlighted.
    pub fn accept(&mut self) -> Option<String> {
        let value = match &self.state {
            AutocompleteState::Suggesting {
                items,
                selected: Some(i),
            } => items.get(*i).cloned(),
            _ => None,
        };
        if value.is_some() {
            self.hide();
        }
        value
    }

    /// Hide the list and drop any response still in flight.
    pub fn hide(&mut self) {
        self.requests.invalidate();
        self.state = AutocompleteState::Hidden;
    }
}

/// A candidate split around the part that matches the typed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight<'a> {
    Plain(&'a str),
    Match {
        before: &'a str,
        matched: &'a str,
        after: &'a str,
    },
}

/// Highlight the first case-insensitive occurrence of `query` in `candidate`.
pub fn highlight<'a>(candidate: &'a str, query: &str) -> Highlight<'a> {
    match find_case_insensitive(candidate, query) {
        Some((start, end)) => Highlight::Match {
            before: &candidate[..start],
            matched: &candidate[start..end],
            after: &candidate[end..],
        },
        None => Highlight::Plain(candidate),
    }
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Byte range of the first case-insensitive match, compared char by char.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }

    'outer: for (start, _) in haystack.char_indices() {
        let mut rest = haystack[start..].char_indices();
        let mut end = start;
        for n in needle.chars() {
            match rest.next() {
                Some((offset, h)) if chars_eq_ignore_case(h, n) => {
                    end = start + offset + h.len_utf8();
                }
                _ => continue 'outer,
            }
        }
        return Some((start, end));
    }
    None
}
