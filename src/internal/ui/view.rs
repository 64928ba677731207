use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Tabs, Wrap},
};
use strum::IntoEnumIterator;

use super::app::{App, InputMode};
use crate::internal::autocomplete::{Highlight, highlight};
use crate::internal::categories::{CategoryPill, selected_category_label};
use crate::internal::chart::{ChartRenderer, DonutData};
use crate::internal::notification::NotificationType;
use crate::internal::render::{NO_TOP_STORIES, NewsView, StoryCard, TopStoriesView};
use crate::internal::stats::StatsTab;
use crate::internal::update::UpdatePhase;
use crate::utils::theme::{TuiTheme, chart_color};

const MAX_SUGGESTIONS_SHOWN: usize = 8;

#[tracing::instrument(skip(app, f))]
pub fn draw(app: &mut App, f: &mut Frame) {
    let start = std::time::Instant::now();

    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_top_bar(app, f, chunks[0]);
    render_pills(app, f, chunks[1]);
    render_search_box(app, f, chunks[2]);
    render_news(app, f, chunks[3]);
    render_status_bar(app, f, chunks[4]);

    if app.suggestions_visible() {
        render_suggestions(app, f, chunks[2]);
    }
    if app.stats.is_open() {
        render_stats_modal(app, f);
    }
    render_notification(app, f, chunks[3]);

    if app.config.logging.enable_performance_metrics && cfg!(debug_assertions) {
        tracing::debug!(elapsed = ?start.elapsed(), "render.draw");
    }
}

fn render_top_bar(app: &App, f: &mut Frame, area: Rect) {
    let left = Line::from(vec![
        Span::styled(
            "Hacky News ",
            Style::default()
                .fg(app.theme.score)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            selected_category_label(&app.state.active_category),
            Style::default().fg(app.theme.foreground),
        ),
    ]);
    let mode = if app.state.dark_mode { "dark" } else { "light" };
    let right = format!("Theme: {}  v{}", mode, app.app_version);

    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(right.chars().count() as u16),
        ])
        .split(area);

    f.render_widget(Paragraph::new(left), parts[0]);
    f.render_widget(
        Paragraph::new(right)
            .alignment(Alignment::Right)
            .style(Style::default().fg(app.theme.muted)),
        parts[1],
    );
}

/// Result-count banner followed by the clear-search hint.
pub fn banner_line(banner: &str, theme: &TuiTheme) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            banner.to_string(),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  [Esc: clear search]", Style::default().fg(theme.muted)),
    ])
}

/// The category bar as one line; the active pill is highlighted.
pub fn pill_line(pills: &[CategoryPill], active: &str, theme: &TuiTheme) -> Line<'static> {
    let mut spans = Vec::with_capacity(pills.len() * 2);
    for (i, pill) in pills.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ", Style::default().fg(theme.border)));
        }
        let style = match pill.name == active {
            true => Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
            false => Style::default().fg(theme.foreground),
        };
        spans.push(Span::styled(format!(" {} ", pill.label), style));
    }
    Line::from(spans)
}

fn render_pills(app: &App, f: &mut Frame, area: Rect) {
    let line = pill_line(&app.pills, &app.state.active_category, &app.theme);
    f.render_widget(Paragraph::new(line), area);
}

fn render_search_box(app: &App, f: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Search;
    let content = match (editing, app.state.search_input.is_empty()) {
        (true, _) => Line::from(Span::styled(
            format!("{}█", app.state.search_input),
            Style::default().fg(app.theme.foreground),
        )),
        (false, true) => Line::from(Span::styled(
            "Press / to search stories",
            Style::default().fg(app.theme.muted),
        )),
        (false, false) => Line::from(Span::styled(
            app.state.search_input.clone(),
            Style::default().fg(app.theme.foreground),
        )),
    };

    let border = match editing {
        true => app.theme.selection_bg,
        false => app.theme.border,
    };
    let search = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Search ")
            .title_style(Style::default().fg(app.theme.foreground)),
    );
    f.render_widget(search, area);
}

/// One suggestion row with the typed part emphasized.
pub fn suggestion_line(
    candidate: &str,
    query: &str,
    selected: bool,
    theme: &TuiTheme,
) -> Line<'static> {
    let base = match selected {
        true => Style::default().fg(theme.selection_fg).bg(theme.selection_bg),
        false => Style::default().fg(theme.foreground),
    };
    let strong = base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    match highlight(candidate, query) {
        Highlight::Plain(text) => Line::from(Span::styled(text.to_string(), base)),
        Highlight::Match {
            before,
            matched,
            after,
        } => Line::from(vec![
            Span::styled(before.to_string(), base),
            Span::styled(matched.to_string(), strong),
            Span::styled(after.to_string(), base),
        ]),
    }
}

fn render_suggestions(app: &App, f: &mut Frame, search_area: Rect) {
    let autocomplete = &app.state.autocomplete;
    let items = autocomplete.items();
    if items.is_empty() {
        return;
    }

    let screen = f.area();
    let shown = items.len().min(MAX_SUGGESTIONS_SHOWN);
    let top = search_area.y + search_area.height;
    let height = (shown as u16 + 2).min(screen.height.saturating_sub(top));
    let area = Rect::new(search_area.x + 1, top, search_area.width.saturating_sub(2), height);

    let selected = autocomplete.selected();
    let lines: Vec<ListItem> = items
        .iter()
        .take(shown)
        .enumerate()
        .map(|(i, item)| {
            ListItem::new(suggestion_line(
                item,
                autocomplete.query(),
                selected == Some(i),
                &app.theme,
            ))
        })
        .collect();

    let list = List::new(lines)
        .style(Style::default().bg(app.theme.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );

    f.render_widget(Clear, area);
    f.render_widget(list, area);
}

/// Lines for one story card wrapped to `width` columns.
pub fn card_lines(card: &StoryCard, width: usize, theme: &TuiTheme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let mut head = vec![Span::styled(
        format!("▲ {}", card.score),
        Style::default()
            .fg(theme.score)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(domain) = &card.domain {
        head.push(Span::styled(
            format!("  {}", domain),
            Style::default().fg(theme.muted),
        ));
    }
    lines.push(Line::from(head));

    let title_style = Style::default()
        .fg(theme.foreground)
        .add_modifier(Modifier::BOLD);
    for row in textwrap::wrap(&card.title, width.max(1)) {
        lines.push(Line::from(Span::styled(row.into_owned(), title_style)));
    }

    let sep = || Span::styled(" | ", Style::default().fg(theme.border));
    let mut meta = vec![
        Span::styled(card.category.clone(), Style::default().fg(theme.accent)),
        sep(),
        Span::styled("by ", Style::default().fg(theme.muted)),
        Span::styled(card.author.clone(), Style::default().fg(theme.author)),
        sep(),
        Span::styled(card.time.clone(), Style::default().fg(theme.muted)),
    ];
    if let Some(n) = card.comments {
        meta.push(sep());
        meta.push(Span::styled(
            format!("{} comments", n),
            Style::default().fg(theme.muted),
        ));
    }
    lines.push(Line::from(meta));
    lines
}

fn render_news(app: &mut App, f: &mut Frame, area: Rect) {
    let title = match &app.news {
        NewsView::SearchResults { .. } => " Search Results ".to_string(),
        _ => format!(
            " Stories {} ",
            selected_category_label(&app.state.active_category)
        ),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .title(title)
        .title_style(Style::default().fg(app.theme.foreground))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.news == NewsView::Loading {
        let p = Paragraph::new(format!("{} Loading...", app.get_spinner_char()))
            .style(Style::default().fg(app.theme.muted));
        f.render_widget(p, inner);
        return;
    }

    let body = match app.news.search_banner() {
        Some(banner) => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(2), Constraint::Min(0)])
                .split(inner);
            f.render_widget(Paragraph::new(banner_line(&banner, &app.theme)), parts[0]);
            parts[1]
        }
        None => inner,
    };

    if let Some(message) = app.news.message() {
        let p = Paragraph::new(message)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(app.theme.muted));
        f.render_widget(p, body);
        return;
    }

    let list_area = body;
    let width = list_area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .news
        .cards()
        .iter()
        .map(|card| {
            let mut lines = card_lines(card, width, &app.theme);
            lines.push(Line::default());
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().bg(app.theme.border))
        .highlight_symbol("▌ ");
    f.render_stateful_widget(list, list_area, &mut app.list_state);
}

fn render_status_bar(app: &App, f: &mut Frame, area: Rect) {
    let update = match app.update.phase() {
        UpdatePhase::Idle => "u: Update",
        UpdatePhase::Syncing => "Updating...",
        UpdatePhase::Succeeded => "Updated",
        UpdatePhase::Failed => "Update failed",
    };

    let status = match (app.input_mode, app.stats.is_open()) {
        (InputMode::Search, _) => {
            "Type to search | ↑↓: Suggestions | Enter: Search | Esc: Cancel".to_string()
        }
        (InputMode::Normal, true) => format!(
            "Tab/1/2: Switch list | Esc/s: Close | t: Theme | {}",
            update
        ),
        (InputMode::Normal, false) => {
            let clear_hint = match app.state.is_search_active {
                true => " | Esc: Clear search",
                false => "",
            };
            format!(
                "h/l: Category | j/k: Nav | Enter: Open | /: Search | s: Stats | r: Refresh | H: Home | t: Theme | {} | q: Quit{}",
                update, clear_hint
            )
        }
    };

    let p = Paragraph::new(status)
        .style(
            Style::default()
                .fg(app.theme.selection_fg)
                .bg(app.theme.selection_bg),
        );
    f.render_widget(p, area);
}

fn render_notification(app: &App, f: &mut Frame, content: Rect) {
    let Some(notification) = &app.notification else {
        return;
    };

    let (color, title) = match notification.notification_type {
        NotificationType::Info => (app.theme.accent, "Info"),
        NotificationType::Progress => (app.theme.selection_bg, "Syncing"),
        NotificationType::Success => (app.theme.success, "Success"),
        NotificationType::Error => (app.theme.error, "Error"),
    };

    let width = (notification.message.chars().count() as u16 + 4)
        .min(content.width.saturating_sub(4))
        .max(10);
    let x = content.x + content.width.saturating_sub(width) / 2;
    let area = Rect::new(x, content.y + 1, width, 3).intersection(f.area());

    let popup = Paragraph::new(notification.message.as_str())
        .style(
            Style::default()
                .bg(color)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border))
                .title(title),
        )
        .alignment(Alignment::Center);

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

/// Horizontal share bars: a colored bar per slice followed by its legend text.
pub struct ShareBars {
    pub width: usize,
}

impl ChartRenderer for ShareBars {
    type Output = Vec<Line<'static>>;

    fn render(&self, data: &DonutData) -> Vec<Line<'static>> {
        data.slices
            .iter()
            .map(|slice| {
                let share = data.percentage(slice.value) / 100.0;
                let len = ((share * self.width as f64).round() as usize).clamp(1, self.width.max(1));
                Line::from(vec![
                    Span::styled(
                        "█".repeat(len),
                        Style::default().fg(chart_color(slice.color)),
                    ),
                    Span::raw(" ".repeat(self.width.saturating_sub(len) + 1)),
                    Span::raw(data.legend_label(slice)),
                ])
            })
            .collect()
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn render_stats_modal(app: &App, f: &mut Frame) {
    let area = centered_rect(90, 85, f.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.selection_bg))
        .title(" Statistics ")
        .title_style(
            Style::default()
                .fg(app.theme.foreground)
                .add_modifier(Modifier::BOLD),
        )
        .style(Style::default().bg(app.theme.background))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let Some(total) = app.stats.total_stories() else {
        f.render_widget(
            Paragraph::new("Loading stats...").style(Style::default().fg(app.theme.muted)),
            inner,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let summary = Line::from(vec![
        Span::styled("Total stories: ", Style::default().fg(app.theme.muted)),
        Span::styled(total.to_string(), Style::default().fg(app.theme.score)),
        Span::styled("   Ask HN: ", Style::default().fg(app.theme.muted)),
        Span::styled(
            app.stats.ask_hn_count().to_string(),
            Style::default().fg(app.theme.score),
        ),
        Span::styled("   Show HN: ", Style::default().fg(app.theme.muted)),
        Span::styled(
            app.stats.show_hn_count().to_string(),
            Style::default().fg(app.theme.score),
        ),
    ]);
    f.render_widget(Paragraph::new(summary), rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);

    render_category_chart(app, f, columns[0]);
    render_top_stories(app, f, columns[1]);
}

fn render_category_chart(app: &App, f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .title(" Categories ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chart = app.stats.chart();
    let lines = match chart.is_empty() {
        true => vec![Line::styled(
            "No category data",
            Style::default().fg(app.theme.muted),
        )],
        false => ShareBars {
            width: (inner.width as usize / 4).max(4),
        }
        .render(chart),
    };
    f.render_widget(Paragraph::new(lines), inner);
}

fn render_top_stories(app: &App, f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let titles: Vec<String> = StatsTab::iter().map(|t| t.to_string()).collect();
    let selected = StatsTab::iter()
        .position(|t| t == app.stats.active_tab())
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(app.theme.muted))
        .highlight_style(
            Style::default()
                .fg(app.theme.selection_fg)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, rows[0]);

    let width = rows[1].width.saturating_sub(4) as usize;
    let lines: Vec<Line> = match app.stats.top_stories(app.stats.active_tab()) {
        TopStoriesView::Loading => vec![Line::styled(
            "Loading...",
            Style::default().fg(app.theme.muted),
        )],
        TopStoriesView::Empty => vec![Line::styled(
            NO_TOP_STORIES,
            Style::default().fg(app.theme.muted),
        )],
        TopStoriesView::Ranked(stories) => stories
            .iter()
            .flat_map(|ranked| {
                let mut card = card_lines(&ranked.card, width, &app.theme);
                if let Some(first) = card.first_mut() {
                    first.spans.insert(
                        0,
                        Span::styled(
                            format!("#{} ", ranked.rank),
                            Style::default()
                                .fg(app.theme.accent)
                                .add_modifier(Modifier::BOLD),
                        ),
                    );
                }
                card.push(Line::default());
                card
            })
            .collect(),
    };
    f.render_widget(Paragraph::new(lines), rows[1]);
}
