use crate::internal::chart::{DonutData, reduce_categories};
use crate::internal::models::{StatsSnapshot, StoryItem};
use crate::internal::render::{TopStoriesView, render_top_stories};
use crate::internal::request::{RequestToken, RequestTracker};
use crate::utils::datetime::Clock;
use strum_macros::{Display, EnumIter};

/// The two "top stories" windows shown as tabs in the stats modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum StatsTab {
    #[strum(to_string = "Recent Top Stories")]
    Recent,
    #[strum(to_string = "All-Time Top Stories")]
    AllTime,
}

impl StatsTab {
    pub fn toggle(self) -> Self {
        match self {
            StatsTab::Recent => StatsTab::AllTime,
            StatsTab::AllTime => StatsTab::Recent,
        }
    }
}

/// Work the stats modal needs done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsCommand {
    FetchSnapshot,
    FetchTopStories { tab: StatsTab, token: RequestToken },
}

/// Stats modal: cached snapshot, category chart and the two ranked lists.
#[derive(Debug)]
pub struct StatsModal {
    open: bool,
    active_tab: StatsTab,
    snapshot: Option<StatsSnapshot>,
    chart: DonutData,
    recent: TopStoriesView,
    all_time: TopStoriesView,
    recent_requests: RequestTracker,
    all_time_requests: RequestTracker,
    awaiting_snapshot: bool,
}

impl Default for StatsModal {
    fn default() -> Self {
        Self {
            open: false,
            active_tab: StatsTab::Recent,
            snapshot: None,
            chart: DonutData::default(),
            recent: TopStoriesView::Loading,
            all_time: TopStoriesView::Loading,
            recent_requests: RequestTracker::new(),
            all_time_requests: RequestTracker::new(),
            awaiting_snapshot: false,
        }
    }
}

impl StatsModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn active_tab(&self) -> StatsTab {
        self.active_tab
    }

    pub fn snapshot(&self) -> Option<&StatsSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn total_stories(&self) -> Option<u64> {
        self.snapshot.as_ref().map(|s| s.total_stories)
    }

    pub fn ask_hn_count(&self) -> i64 {
        self.snapshot
            .as_ref()
            .map(|s| s.count_for("Ask HN"))
            .unwrap_or(0)
    }

    pub fn show_hn_count(&self) -> i64 {
        self.snapshot
            .as_ref()
            .map(|s| s.count_for("Show HN"))
            .unwrap_or(0)
    }

    pub fn chart(&self) -> &DonutData {
        &self.chart
    }

    pub fn top_stories(&self, tab: StatsTab) -> &TopStoriesView {
        match tab {
            StatsTab::Recent => &self.recent,
            StatsTab::AllTime => &self.all_time,
        }
    }

    /// Show the modal. Uses the cached snapshot when there is one.
    pub fn open(&mut self) -> Vec<StatsCommand> {
        self.open = true;
        match self.snapshot.is_some() {
            true => self.load_top_stories(),
            false => {
                self.awaiting_snapshot = true;
                vec![StatsCommand::FetchSnapshot]
            }
        }
    }

    pub fn close(&mut self) {
        self.open = false;
        self.awaiting_snapshot = false;
    }

    pub fn select_tab(&mut self, tab: StatsTab) {
        self.active_tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.active_tab = self.active_tab.toggle();
    }

    /// Cache a `/stats` response. A failed fetch keeps the previous snapshot.
    /// Returns the top-story loads to start if the modal was waiting on it.
    pub fn store_snapshot(&mut self, snapshot: Option<StatsSnapshot>) -> Vec<StatsCommand> {
        if let Some(snapshot) = snapshot {
            self.chart = reduce_categories(&snapshot.categories);
            self.snapshot = Some(snapshot);
        }

        match (self.open, self.awaiting_snapshot) {
            (true, true) => {
                self.awaiting_snapshot = false;
                self.load_top_stories()
            }
            _ => Vec::new(),
        }
    }

    /// Reload the open modal's lists, e.g. after new data was synced.
    pub fn refresh(&mut self) -> Vec<StatsCommand> {
        match self.open {
            true => self.load_top_stories(),
            false => Vec::new(),
        }
    }

    fn load_top_stories(&mut self) -> Vec<StatsCommand> {
        self.recent = TopStoriesView::Loading;
        self.all_time = TopStoriesView::Loading;
        vec![
            StatsCommand::FetchTopStories {
                tab: StatsTab::Recent,
                token: self.recent_requests.issue(),
            },
            StatsCommand::FetchTopStories {
                tab: StatsTab::AllTime,
                token: self.all_time_requests.issue(),
            },
        ]
    }

    /// Apply a top-stories response; stale ones are dropped.
    pub fn store_top_stories(
        &mut self,
        tab: StatsTab,
        token: RequestToken,
        result: Option<Vec<StoryItem>>,
        clock: &Clock,
    ) -> bool {
        let (requests, view) = match tab {
            StatsTab::Recent => (&self.recent_requests, &mut self.recent),
            StatsTab::AllTime => (&self.all_time_requests, &mut self.all_time),
        };
        if !requests.is_current(token) {
            tracing::debug!(%tab, "discarding stale top stories response");
            return false;
        }
        *view = render_top_stories(result, clock);
        true
    }
}
