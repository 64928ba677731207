//! Story views as plain data.
//!
//! Fetch results are turned into a small render tree here; the terminal layer
//! in `ui::view` only lays these values out. Keeping the mapping pure lets the
//! wording, defaults and ordering be tested without a terminal.

use crate::internal::models::StoryItem;
use crate::utils::datetime::Clock;
use crate::utils::url::display_domain;

pub const LOADING_NEWS_FAILED: &str = "Error loading news. Please try again.";
pub const NO_NEWS_IN_CATEGORY: &str = "No news found for this category.";
pub const SEARCH_FAILED: &str = "Error searching news. Please try again.";
pub const NO_TOP_STORIES: &str = "No top stories found.";

/// Which list a card is rendered for; only the fallback labels differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStyle {
    Listing,
    Search,
    TopStories,
}

impl CardStyle {
    fn default_category(self) -> &'static str {
        match self {
            CardStyle::Listing => "General",
            CardStyle::Search | CardStyle::TopStories => "Uncategorized",
        }
    }

    fn default_author(self) -> &'static str {
        match self {
            CardStyle::Listing => "Unknown",
            CardStyle::Search | CardStyle::TopStories => "Anonymous",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryCard {
    pub score: u32,
    pub domain: Option<String>,
    pub title: String,
    pub url: Option<String>,
    pub category: String,
    pub author: String,
    pub time: String,
    pub comments: Option<u32>,
}

impl StoryCard {
    pub fn from_item(item: &StoryItem, style: CardStyle, clock: &Clock) -> Self {
        let non_empty = |s: &Option<String>| s.as_deref().filter(|v| !v.trim().is_empty()).map(str::to_string);

        Self {
            score: item.score.unwrap_or(0),
            domain: display_domain(item.url.as_deref()),
            title: non_empty(&item.title).unwrap_or_else(|| "No Title".to_string()),
            url: non_empty(&item.url),
            category: non_empty(&item.category)
                .unwrap_or_else(|| style.default_category().to_string()),
            author: non_empty(&item.by).unwrap_or_else(|| style.default_author().to_string()),
            time: clock.format(item.time.unwrap_or(0)),
            comments: item.descendants.filter(|&n| n > 0),
        }
    }
}

/// Contents of the main news area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NewsView {
    #[default]
    Loading,
    /// An error or empty-state line with no cards.
    Message(String),
    Listing(Vec<StoryCard>),
    SearchResults {
        query: String,
        cards: Vec<StoryCard>,
    },
}

impl NewsView {
    pub fn cards(&self) -> &[StoryCard] {
        match self {
            NewsView::Listing(cards) => cards,
            NewsView::SearchResults { cards, .. } => cards,
            _ => &[],
        }
    }

    /// "Found N results for: ..." line above search results.
    pub fn search_banner(&self) -> Option<String> {
        match self {
            NewsView::SearchResults { query, cards } => {
                Some(format!("Found {} results for: \"{}\"", cards.len(), query))
            }
            _ => None,
        }
    }

    /// Line shown in place of cards, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            NewsView::Message(msg) => Some(msg.clone()),
            NewsView::SearchResults { query, cards } if cards.is_empty() => Some(format!(
                "No results found for \"{}\". Try a different search term.",
                query
            )),
            _ => None,
        }
    }
}

/// Plain category listing, newest first. `None` means the fetch failed.
pub fn render_listing(result: Option<Vec<StoryItem>>, clock: &Clock) -> NewsView {
    let Some(mut stories) = result else {
        return NewsView::Message(LOADING_NEWS_FAILED.to_string());
    };
    if stories.is_empty() {
        return NewsView::Message(NO_NEWS_IN_CATEGORY.to_string());
    }

    // Missing times sort as epoch 0, after every dated story.
    stories.sort_by_key(|s| std::cmp::Reverse(s.time.unwrap_or(0)));
    NewsView::Listing(
        stories
            .iter()
            .map(|s| StoryCard::from_item(s, CardStyle::Listing, clock))
            .collect(),
    )
}

/// Search results in backend order. `None` means the fetch failed.
pub fn render_search(query: &str, result: Option<Vec<StoryItem>>, clock: &Clock) -> NewsView {
    match result {
        None => NewsView::Message(SEARCH_FAILED.to_string()),
        Some(stories) => NewsView::SearchResults {
            query: query.to_string(),
            cards: stories
                .iter()
                .map(|s| StoryCard::from_item(s, CardStyle::Search, clock))
                .collect(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedStory {
    pub rank: usize,
    pub card: StoryCard,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TopStoriesView {
    #[default]
    Loading,
    Empty,
    Ranked(Vec<RankedStory>),
}

impl TopStoriesView {
    pub fn stories(&self) -> &[RankedStory] {
        match self {
            TopStoriesView::Ranked(list) => list,
            _ => &[],
        }
    }
}

/// Ranked top-stories list; failed and empty fetches render the same way.
pub fn render_top_stories(result: Option<Vec<StoryItem>>, clock: &Clock) -> TopStoriesView {
    match result {
        Some(stories) if !stories.is_empty() => TopStoriesView::Ranked(
            stories
                .iter()
                .enumerate()
                .map(|(i, s)| RankedStory {
                    rank: i + 1,
                    card: StoryCard::from_item(s, CardStyle::TopStories, clock),
                })
                .collect(),
        ),
        _ => TopStoriesView::Empty,
    }
}
