use std::{
    io, thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use garden_forge_core::{
    catalog::{self, Facet, PlantQuery},
    models::{
        NotificationDraft, Plant, PlayerProfile, ProfileUpdate, Rarity, Season, ThemePreference,
    },
    AppConfig, GameState, GameStore, StoreHandle,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, info};

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_SEARCH_LEN: usize = 48;
const PROGRESS_BAR_WIDTH: usize = 12;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    accent_alt: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::LightGreen,
            accent_alt: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

impl Theme {
    fn for_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Light => Self {
                primary_fg: Color::Black,
                accent: Color::Green,
                accent_alt: Color::Blue,
                muted: Color::Gray,
                selection_bg: Color::Gray,
                ..Self::default()
            },
            ThemePreference::Dark | ThemePreference::Auto => Self::default(),
        }
    }
}

fn rarity_color(rarity: Rarity) -> Color {
    match rarity {
        Rarity::Common => Color::Gray,
        Rarity::Uncommon => Color::Green,
        Rarity::Rare => Color::Blue,
        Rarity::Epic => Color::Magenta,
        Rarity::Legendary => Color::Yellow,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Dashboard,
    Farm,
    Plants,
    Pets,
    Tools,
    Market,
    Quests,
    Automation,
    Analytics,
    Community,
    Guides,
    Settings,
}

impl Tab {
    const ALL: [Tab; 12] = [
        Tab::Dashboard,
        Tab::Farm,
        Tab::Plants,
        Tab::Pets,
        Tab::Tools,
        Tab::Market,
        Tab::Quests,
        Tab::Automation,
        Tab::Analytics,
        Tab::Community,
        Tab::Guides,
        Tab::Settings,
    ];

    fn id(self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Farm => "farm",
            Tab::Plants => "plants",
            Tab::Pets => "pets",
            Tab::Tools => "tools",
            Tab::Market => "market",
            Tab::Quests => "quests",
            Tab::Automation => "automation",
            Tab::Analytics => "analytics",
            Tab::Community => "community",
            Tab::Guides => "guides",
            Tab::Settings => "settings",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Farm => "Farm Manager",
            Tab::Plants => "Plant Database",
            Tab::Pets => "Pet Collection",
            Tab::Tools => "Tool Shop",
            Tab::Market => "Market Hub",
            Tab::Quests => "Quests",
            Tab::Automation => "Automation",
            Tab::Analytics => "Analytics",
            Tab::Community => "Community",
            Tab::Guides => "Guides",
            Tab::Settings => "Settings",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Tab::Dashboard => "🏠",
            Tab::Farm => "🌱",
            Tab::Plants => "🌿",
            Tab::Pets => "🐾",
            Tab::Tools => "🔧",
            Tab::Market => "💰",
            Tab::Quests => "📜",
            Tab::Automation => "🤖",
            Tab::Analytics => "📊",
            Tab::Community => "👥",
            Tab::Guides => "📚",
            Tab::Settings => "⚙️",
        }
    }

    /// Unknown identifiers fall back to the dashboard.
    fn from_id(id: &str) -> Tab {
        Self::ALL
            .into_iter()
            .find(|tab| tab.id() == id)
            .unwrap_or(Tab::Dashboard)
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }

    fn offset(self, delta: isize) -> Tab {
        let len = Self::ALL.len() as isize;
        let idx = (self.index() as isize + delta).rem_euclid(len);
        Self::ALL[idx as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatsView {
    Rarity,
    Season,
    Profitability,
    Growth,
}

impl StatsView {
    fn label(self) -> &'static str {
        match self {
            StatsView::Rarity => "By Rarity",
            StatsView::Season => "By Season",
            StatsView::Profitability => "Profitability",
            StatsView::Growth => "Growth Times",
        }
    }

    fn next(self) -> Self {
        match self {
            StatsView::Rarity => StatsView::Season,
            StatsView::Season => StatsView::Profitability,
            StatsView::Profitability => StatsView::Growth,
            StatsView::Growth => StatsView::Rarity,
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
    Loaded,
}

/// Terminal dashboard over a shared [`StoreHandle`].
pub struct GardenForgeApp {
    store: StoreHandle,
    config: AppConfig,
    browser: PlantBrowser,
    status: String,
    should_quit: bool,
    started_at: Instant,
}

impl GardenForgeApp {
    pub fn new(store: StoreHandle, config: AppConfig) -> Self {
        Self {
            store,
            config,
            browser: PlantBrowser::default(),
            status: "Ready".to_string(),
            should_quit: false,
            started_at: Instant::now(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        spawn_startup(self.store.clone(), self.config.startup_delay(), event_tx);

        loop {
            let state = self.store.snapshot();
            terminal.draw(|frame| self.draw(frame, &state))?;
            if self.should_quit {
                break;
            }

            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) || self.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        self.record_session_time();
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    self.set_status(format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Tick) => true,
            Some(AppEvent::Loaded) => {
                let state = self.store.snapshot();
                self.browser.apply_filter(&state.plants);
                info!(plants = state.plants.len(), "Garden data loaded");
                self.set_status(format!("Loaded {} plants", state.plants.len()));
                true
            }
            None => false,
        }
    }

    fn record_session_time(&self) {
        let seconds = self.started_at.elapsed().as_secs();
        self.store.update(|store| record_play_time(store, seconds));
        info!(seconds, "Session ended");
    }

    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn active_tab(&self) -> Tab {
        Tab::from_id(&self.store.read().state().active_tab)
    }

    fn select_tab(&mut self, tab: Tab) {
        self.store.update(|store| store.set_active_tab(tab.id()));
        debug!(tab = tab.id(), "Tab selected");
        self.set_status(tab.label().to_string());
    }

    fn notify(&mut self, kind: &str, message: &str) {
        let id = self.store.update(|store| {
            store.add_notification(
                NotificationDraft::new(kind, message).with_payload(json!({ "source": "dashboard" })),
            )
        });
        debug!(%id, kind, "Notification added");
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key(key),
            _ => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }
        if self.store.read().state().is_loading {
            if key.code == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return Ok(());
        }

        let tab = self.active_tab();
        if tab == Tab::Plants && self.browser.mode == Mode::Search {
            return self.handle_search_key(key);
        }

        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::Tab | KeyCode::Right => {
                self.select_tab(tab.offset(1));
                return Ok(());
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.select_tab(tab.offset(-1));
                return Ok(());
            }
            KeyCode::Char('x') if key.modifiers.is_empty() => {
                self.dismiss_notification();
                return Ok(());
            }
            _ => {}
        }

        match tab {
            Tab::Dashboard => self.handle_dashboard_key(key),
            Tab::Plants => self.handle_browse_key(key),
            _ => Ok(()),
        }
    }

    fn dismiss_notification(&mut self) {
        let oldest = self
            .store
            .read()
            .state()
            .notifications
            .first()
            .map(|n| n.id.clone());
        match oldest {
            Some(id) => {
                self.store.update(|store| store.remove_notification(&id));
                self.set_status("Notification dismissed".to_string());
            }
            None => self.set_status("No notifications".to_string()),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('n') => {
                if self.store.read().profile().is_some() {
                    self.set_status("Profile already exists".to_string());
                } else {
                    let username = default_username();
                    let profile = PlayerProfile::new("local-player", username.clone());
                    self.store.update(|store| store.set_profile(profile));
                    self.set_status(format!("Welcome, {username}!"));
                }
            }
            KeyCode::Char('w') => {
                self.notify("action", "Water All Plants needs the game client");
                self.set_status("Watering queued as a notification".to_string());
            }
            KeyCode::Char('h') => {
                self.notify("action", "Harvest Ready Plants needs the game client");
                self.set_status("Harvest queued as a notification".to_string());
            }
            KeyCode::Char('m') => self.select_tab(Tab::Market),
            KeyCode::Char('a') => {
                self.notify("quest", "Auto-Complete Quests is not available yet");
                self.set_status("Quest tracking is not available".to_string());
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<()> {
        let plants = self.store.snapshot().plants;
        match key.code {
            KeyCode::Esc => {
                self.browser.mode = Mode::Browse;
                self.browser.query.search.clear();
                self.browser.apply_filter(&plants);
                self.set_status("Search cleared".to_string());
            }
            KeyCode::Enter => {
                self.browser.mode = Mode::Browse;
                self.set_status(format!("Search applied: {}", self.browser.query.search));
            }
            KeyCode::Backspace => {
                self.browser.query.search.pop();
                self.browser.apply_filter(&plants);
            }
            KeyCode::Char(c) => {
                if (key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT)
                    && self.browser.query.search.chars().count() < MAX_SEARCH_LEN
                {
                    self.browser.query.search.push(c);
                    self.browser.apply_filter(&plants);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Result<()> {
        let plants = self.store.snapshot().plants;
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.browser.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.browser.move_cursor(-1),
            KeyCode::Char('g') | KeyCode::Home => self.browser.move_to(0),
            KeyCode::Char('G') | KeyCode::End => self.browser.move_to_end(),
            KeyCode::PageDown => self.browser.page_down(),
            KeyCode::PageUp => self.browser.page_up(),
            KeyCode::Char('/') => {
                self.browser.mode = Mode::Search;
                self.set_status("Type to search plants".to_string());
            }
            KeyCode::Char('r') => {
                self.browser.query.rarity = self.browser.query.rarity.cycle(&Rarity::ALL);
                self.browser.apply_filter(&plants);
                self.set_status(format!(
                    "Rarity: {}",
                    facet_label(self.browser.query.rarity, Rarity::label, "All Rarities")
                ));
            }
            KeyCode::Char('e') => {
                self.browser.query.season = self.browser.query.season.cycle(&Season::ALL);
                self.browser.apply_filter(&plants);
                self.set_status(format!(
                    "Season: {}",
                    facet_label(self.browser.query.season, Season::label, "All Seasons")
                ));
            }
            KeyCode::Char('o') => {
                self.browser.query.sort = self.browser.query.sort.next();
                self.browser.apply_filter(&plants);
                self.set_status(format!("Sorted by {}", self.browser.query.sort.label()));
            }
            KeyCode::Char('v') => {
                self.browser.stats_view = self.browser.stats_view.next();
            }
            KeyCode::Esc => {
                self.browser.query = PlantQuery::default();
                self.browser.apply_filter(&plants);
                self.set_status("Filters reset".to_string());
            }
            _ => {}
        }
        Ok(())
    }

    fn theme(state: &GameState) -> Theme {
        state
            .profile
            .as_ref()
            .map(|profile| Theme::for_preference(profile.settings.theme))
            .unwrap_or_default()
    }

    fn draw(&mut self, frame: &mut Frame, state: &GameState) {
        let theme = Self::theme(state);
        if state.is_loading {
            self.draw_loading(frame, &theme);
            return;
        }

        let area = frame.size();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(4),
            ])
            .split(area);

        let tab = Tab::from_id(&state.active_tab);
        render_header(frame, rows[0], state, &theme);
        render_tabs(frame, rows[1], tab, &theme);
        match tab {
            Tab::Dashboard => render_dashboard(frame, rows[2], state, &theme),
            Tab::Plants => self.draw_plants(frame, rows[2], state, &theme),
            other => render_coming_soon(frame, rows[2], other, &theme),
        }
        self.render_status(frame, rows[3], state, tab, &theme);
    }

    fn draw_loading(&self, frame: &mut Frame, theme: &Theme) {
        let area = frame.size();
        let spinner = ["◐", "◓", "◑", "◒"];
        let frame_idx = (self.started_at.elapsed().as_millis() / TICK_RATE.as_millis()) as usize;
        let lines = vec![
            Line::from(Span::styled(
                spinner[frame_idx % spinner.len()],
                Style::default().fg(theme.accent),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Garden Forge",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Loading your garden data...",
                Style::default().fg(theme.muted),
            )),
        ];
        let box_area = centered_rect(40, 8, area);
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, box_area);
    }

    fn draw_plants(&mut self, frame: &mut Frame, area: Rect, state: &GameState, theme: &Theme) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(9),
            ])
            .split(area);

        self.render_plant_filters(frame, rows[0], state, theme);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[1]);
        self.render_plant_list(frame, body[0], theme);
        self.render_plant_details(frame, body[1], theme);
        self.render_plant_stats(frame, rows[2], state, theme);
    }

    fn render_plant_filters(&self, frame: &mut Frame, area: Rect, state: &GameState, theme: &Theme) {
        let query = &self.browser.query;
        let search_style = if self.browser.mode == Mode::Search {
            Style::default().fg(theme.warning)
        } else {
            Style::default().fg(theme.primary_fg)
        };
        let cursor = if self.browser.mode == Mode::Search { "▏" } else { "" };
        let line = Line::from(vec![
            Span::styled("Search: ", Style::default().fg(theme.muted)),
            Span::styled(format!("{}{cursor}", query.search), search_style),
            Span::styled("  Rarity: ", Style::default().fg(theme.muted)),
            Span::raw(facet_label(query.rarity, Rarity::label, "All Rarities")),
            Span::styled("  Season: ", Style::default().fg(theme.muted)),
            Span::raw(facet_label(query.season, Season::label, "All Seasons")),
            Span::styled("  Sort: ", Style::default().fg(theme.muted)),
            Span::raw(query.sort.label()),
            Span::styled(
                format!(
                    "   {} of {} plants found",
                    self.browser.filtered.len(),
                    state.plants.len()
                ),
                Style::default().fg(theme.accent_alt),
            ),
        ]);
        let paragraph = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL).title("🌿 Plant Database"));
        frame.render_widget(paragraph, area);
    }

    fn render_plant_list(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.browser.list_height = area.height.saturating_sub(2) as usize;
        self.browser.clamp_cursor();
        self.browser.ensure_cursor_visible();

        let mut list_state = ListState::default();
        let plants = self.browser.visible_plants(self.browser.list_height);
        if !plants.is_empty() {
            let selected = self
                .browser
                .cursor
                .saturating_sub(self.browser.offset)
                .min(plants.len().saturating_sub(1));
            list_state.select(Some(selected));
        }
        let items: Vec<ListItem> = plants
            .iter()
            .enumerate()
            .map(|(idx, plant)| {
                let is_selected = self.browser.cursor == self.browser.offset + idx;
                let marker = if is_selected {
                    Span::styled(
                        "▶ ",
                        Style::default()
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw("  ")
                };
                ListItem::new(Line::from(vec![
                    marker,
                    Span::raw(format!("{} ", plant.icon)),
                    Span::styled(
                        plant.name.clone(),
                        Style::default()
                            .fg(theme.primary_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(" · {}", plant.rarity.label()),
                        Style::default().fg(rarity_color(plant.rarity)),
                    ),
                ]))
            })
            .collect();

        let title = if items.is_empty() {
            "Plants · none match"
        } else {
            "Plants"
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_plant_details(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default().borders(Borders::ALL).title("Plant Details");
        let Some(plant) = self.browser.current() else {
            let paragraph = Paragraph::new("0 plants found").block(block);
            frame.render_widget(paragraph, area);
            return;
        };

        let seasons = plant
            .seasons
            .iter()
            .map(|season| season.label())
            .collect::<Vec<_>>()
            .join(", ");
        let lines = vec![
            Line::from(vec![
                Span::styled(
                    format!("{} {}", plant.icon, plant.name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  [{}]", plant.rarity.label()),
                    Style::default().fg(rarity_color(plant.rarity)),
                ),
            ]),
            Line::from(Span::styled(
                plant.description.clone(),
                Style::default().fg(theme.muted),
            )),
            Line::from(""),
            Line::from(format!(
                "Sell Price: ₡{}    Seed Cost: ₡{}",
                format_thousands(plant.sell_price),
                format_thousands(plant.buy_price)
            )),
            Line::from(format!("XP Gained: {} XP", plant.xp_gained)),
            Line::from(format!(
                "Growth Time: {}    Unlock Level: {}",
                catalog::format_growth_time(plant.growth_time),
                plant.unlock_level
            )),
            Line::from(format!("Seasons: {seasons}")),
            Line::from(format!("Soil Type: {}", plant.soil_type)),
            Line::from(format!(
                "Water needed: {}x {}",
                plant.water_needed,
                "💧".repeat(plant.water_needed as usize)
            )),
            Line::from(format!(
                "Earns ₡{:.2} per minute",
                catalog::coins_per_minute(plant)
            )),
        ];
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_plant_stats(&self, frame: &mut Frame, area: Rect, state: &GameState, theme: &Theme) {
        let view = self.browser.stats_view;
        let lines: Vec<Line> = match view {
            StatsView::Rarity => catalog::rarity_counts(&state.plants)
                .into_iter()
                .map(|(rarity, count)| {
                    Line::from(vec![
                        Span::styled(
                            format!("{:<10}", rarity.label()),
                            Style::default().fg(rarity_color(rarity)),
                        ),
                        Span::raw(format!("{count:>3}")),
                    ])
                })
                .collect(),
            StatsView::Season => catalog::season_counts(&state.plants)
                .into_iter()
                .map(|(season, count)| Line::from(format!("{:<10}{count:>3}", season.label())))
                .collect(),
            StatsView::Profitability => catalog::top_profitable(&state.plants)
                .into_iter()
                .enumerate()
                .map(|(idx, plant)| {
                    Line::from(vec![
                        Span::styled(format!("#{} ", idx + 1), Style::default().fg(theme.warning)),
                        Span::raw(format!("{} {:<20}", plant.icon, plant.name)),
                        Span::styled(
                            format!("₡{:.2} per minute", catalog::coins_per_minute(plant)),
                            Style::default().fg(theme.muted),
                        ),
                    ])
                })
                .collect(),
            StatsView::Growth => catalog::growth_time_ranking(&state.plants)
                .into_iter()
                .take(area.height.saturating_sub(2) as usize)
                .map(|plant| {
                    Line::from(format!(
                        "{:<20}{}",
                        plant.name,
                        catalog::format_growth_time(plant.growth_time)
                    ))
                })
                .collect(),
        };
        let title = format!("📈 Plant Statistics · {} (v to switch)", view.label());
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_status(
        &self,
        frame: &mut Frame,
        area: Rect,
        state: &GameState,
        tab: Tab,
        theme: &Theme,
    ) {
        let primary = if tab == Tab::Plants && self.browser.mode == Mode::Search {
            format!("Search: {}", self.browser.query.search)
        } else {
            self.status.clone()
        };
        let notification = match state.notifications.first() {
            Some(first) => Line::from(vec![
                Span::styled(
                    format!("🔔 {} ", state.notifications.len()),
                    Style::default().fg(theme.warning),
                ),
                Span::raw(first.message.clone()),
                Span::styled("  (x to dismiss)", Style::default().fg(theme.muted)),
            ]),
            None => Line::from(Span::styled(
                "No notifications",
                Style::default().fg(theme.muted),
            )),
        };
        let hints = match tab {
            Tab::Dashboard => "n profile · w water · h harvest · m market · a quests · ←/→ tabs · q quit",
            Tab::Plants => "/ search · r rarity · e season · o sort · v stats · esc reset · q quit",
            _ => "←/→ tabs · q quit",
        };
        let paragraph = Paragraph::new(vec![
            Line::from(vec![
                Span::raw(primary),
                Span::styled(format!("   {hints}"), Style::default().fg(theme.muted)),
            ]),
            notification,
        ])
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &GameState, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(25),
            Constraint::Percentage(35),
        ])
        .split(area);

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "🌱 Garden Forge",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Grow a Garden Companion",
            Style::default().fg(theme.muted),
        )),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, columns[0]);

    let Some(profile) = state.profile.as_ref() else {
        let hint = Paragraph::new("No profile · press n on the dashboard")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(theme.muted));
        frame.render_widget(hint, columns[1].union(columns[2]));
        return;
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Level {}", profile.level)),
        )
        .gauge_style(Style::default().fg(theme.accent_alt))
        .percent(profile.level_progress().round() as u16)
        .label(format!("{} XP", format_thousands(profile.xp)));
    frame.render_widget(gauge, columns[1]);

    let (connection, color) = if state.is_connected {
        ("🟢 Connected", theme.success)
    } else {
        ("🔴 Offline", theme.danger)
    };
    let stats = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Coins ", Style::default().fg(theme.muted)),
            Span::styled(
                format_thousands(profile.coins),
                Style::default()
                    .fg(theme.warning)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Gems ", Style::default().fg(theme.muted)),
            Span::styled(
                profile.gems.to_string(),
                Style::default().fg(theme.accent_alt),
            ),
        ]),
        Line::from(Span::styled(connection, Style::default().fg(color))),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(stats, columns[2]);
}

fn render_tabs(frame: &mut Frame, area: Rect, active: Tab, theme: &Theme) {
    let titles: Vec<String> = Tab::ALL
        .iter()
        .map(|tab| format!("{} {}", tab.icon(), tab.label()))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(active.index())
        .style(Style::default().fg(theme.muted))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &GameState, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(8),
        ])
        .split(area);

    let username = state
        .profile
        .as_ref()
        .map(|profile| profile.username.as_str())
        .unwrap_or("Gardener");
    let welcome = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Welcome back, {username}! 🌟"),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Your garden is thriving. Here's what's happening today.",
            Style::default().fg(theme.muted),
        )),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(welcome, rows[0]);

    let quick_stats = [
        (
            "🌾 Total Harvests",
            format_thousands(state.farm_stats.total_harvests),
            "+12%",
        ),
        ("🌱 Plants Growing", "47".to_string(), "+3"),
        ("💰 Daily Income", "₡2,450".to_string(), "+18%"),
        ("🐾 Active Pets", "8".to_string(), "+2"),
    ];
    let stat_columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[1]);
    for ((title, value, trend), column) in quick_stats.iter().zip(stat_columns.iter()) {
        let paragraph = Paragraph::new(Line::from(vec![
            Span::styled(
                value.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {trend}"), Style::default().fg(theme.success)),
        ]))
        .block(Block::default().borders(Borders::ALL).title(*title));
        frame.render_widget(paragraph, *column);
    }

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[2]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(4)])
        .split(main[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(6),
            Constraint::Length(6),
        ])
        .split(main[1]);

    let garden = [
        ("Golden Apple Tree", "Growing", 75, "2h 15m"),
        ("Rainbow Rose", "Sprouting", 35, "8h 45m"),
        ("Crystal Flower", "Mature", 90, "30m"),
    ];
    let garden_lines: Vec<Line> = garden
        .iter()
        .map(|(name, stage, percent, left)| {
            Line::from(vec![
                Span::raw(format!("{name:<18} {stage:<10} ")),
                Span::styled(
                    progress_bar(*percent, PROGRESS_BAR_WIDTH),
                    Style::default().fg(theme.accent),
                ),
                Span::styled(format!(" {left} left"), Style::default().fg(theme.muted)),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(garden_lines)
            .block(Block::default().borders(Borders::ALL).title("🌻 Garden Overview")),
        left[0],
    );

    let activities = [
        ("Harvested Golden Apple Tree", "2 minutes ago", "+100 XP"),
        ("Completed Daily Quest", "5 minutes ago", "500 coins"),
        ("Upgraded Watering Can", "10 minutes ago", "Golden Watering Can"),
        ("Discovered Rainbow Rose", "15 minutes ago", "legendary"),
    ];
    let activity_lines: Vec<Line> = activities
        .iter()
        .map(|(action, time, badge)| {
            Line::from(vec![
                Span::raw(format!("{action:<30}")),
                Span::styled(format!("{time:<16}"), Style::default().fg(theme.muted)),
                Span::styled(badge.to_string(), Style::default().fg(theme.warning)),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(activity_lines)
            .block(Block::default().borders(Borders::ALL).title("📋 Recent Activity"))
            .wrap(Wrap { trim: true }),
        left[1],
    );

    let mut quest_lines = Vec::new();
    for quest in state.active_quests.iter().take(3) {
        quest_lines.push(Line::from(vec![
            Span::styled(
                quest.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" [{}]", quest.kind.label()),
                Style::default().fg(theme.muted),
            ),
        ]));
        let percent = (quest.progress_ratio() * 100.0).round() as u16;
        quest_lines.push(Line::from(vec![
            Span::styled(
                progress_bar(percent, PROGRESS_BAR_WIDTH),
                Style::default().fg(theme.accent_alt),
            ),
            Span::raw(format!(" Progress: {}", quest.progress_label())),
        ]));
    }
    if quest_lines.is_empty() {
        quest_lines.push(Line::from(Span::styled(
            "No active quests",
            Style::default().fg(theme.muted),
        )));
    }
    frame.render_widget(
        Paragraph::new(quest_lines)
            .block(Block::default().borders(Borders::ALL).title("📜 Active Quests"))
            .wrap(Wrap { trim: true }),
        right[0],
    );

    let weather = Paragraph::new(vec![
        Line::from("☀️ Sunny Day · +20% growth speed"),
        Line::from(Span::styled(
            "🎪 Spring Festival · Double XP for flower harvests",
            Style::default().fg(theme.warning),
        )),
        Line::from(Span::styled(
            "💧 Rain Coming · In 3 hours - Free watering",
            Style::default().fg(theme.accent_alt),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title("🌤️ Weather & Events"))
    .wrap(Wrap { trim: true });
    frame.render_widget(weather, right[1]);

    let actions = Paragraph::new(vec![
        Line::from("w 🚿 Water All Plants"),
        Line::from("h 🌾 Harvest Ready Plants"),
        Line::from("m 🛒 Visit Market"),
        Line::from("a 🎯 Auto-Complete Quests"),
    ])
    .block(Block::default().borders(Borders::ALL).title("⚡ Quick Actions"));
    frame.render_widget(actions, right[2]);
}

fn render_coming_soon(frame: &mut Frame, area: Rect, tab: Tab, theme: &Theme) {
    let lines = vec![
        Line::from("🚧"),
        Line::from(""),
        Line::from(Span::styled(
            "Coming Soon!",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "This feature is being developed. Stay tuned for updates!",
            Style::default().fg(theme.muted),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} {}", tab.icon(), tab.label()));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, centered_rect(inner.width, 4, inner));
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

/// Credit `seconds` to the farm stats and to the profile, if one exists.
fn record_play_time(store: &mut GameStore, seconds: u64) {
    store.add_play_time(seconds);
    let total = store
        .profile()
        .map(|profile| profile.play_time.saturating_add(seconds));
    store.update_profile(ProfileUpdate {
        play_time: total,
        ..Default::default()
    });
}

/// Raise the loading flag, then drop it once `delay` has elapsed.
fn spawn_startup(store: StoreHandle, delay: Duration, sender: mpsc::Sender<AppEvent>) {
    store.update(|store| store.set_loading(true));
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        store.update(|store| store.set_loading(false));
        let _ = sender.send(AppEvent::Loaded).await;
    });
}

#[derive(Debug)]
struct PlantBrowser {
    query: PlantQuery,
    filtered: Vec<Plant>,
    cursor: usize,
    offset: usize,
    list_height: usize,
    mode: Mode,
    stats_view: StatsView,
}

impl Default for PlantBrowser {
    fn default() -> Self {
        Self {
            query: PlantQuery::default(),
            filtered: Vec::new(),
            cursor: 0,
            offset: 0,
            list_height: 1,
            mode: Mode::Browse,
            stats_view: StatsView::Rarity,
        }
    }
}

impl PlantBrowser {
    fn apply_filter(&mut self, plants: &[Plant]) {
        self.filtered = catalog::filter_plants(plants, &self.query)
            .into_iter()
            .cloned()
            .collect();
        self.cursor = 0;
        self.offset = 0;
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let last = self.filtered.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
        self.ensure_cursor_visible();
    }

    fn move_to(&mut self, index: usize) {
        if self.filtered.is_empty() {
            return;
        }
        self.cursor = index.min(self.filtered.len() - 1);
        self.ensure_cursor_visible();
    }

    fn move_to_end(&mut self) {
        self.move_to(usize::MAX);
    }

    fn page_down(&mut self) {
        if self.list_height == 0 {
            return;
        }
        self.move_cursor(self.list_height as isize);
    }

    fn page_up(&mut self) {
        if self.list_height == 0 {
            return;
        }
        self.move_cursor(-(self.list_height as isize));
    }

    fn visible_plants(&self, height: usize) -> &[Plant] {
        if self.filtered.is_empty() {
            return &[];
        }
        let end = (self.offset + height).min(self.filtered.len());
        &self.filtered[self.offset..end]
    }

    fn current(&self) -> Option<&Plant> {
        self.filtered.get(self.cursor)
    }

    fn clamp_cursor(&mut self) {
        if self.filtered.is_empty() {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= self.filtered.len() {
            self.cursor = self.filtered.len() - 1;
        }
    }

    fn ensure_cursor_visible(&mut self) {
        if self.filtered.is_empty() || self.list_height == 0 {
            self.offset = 0;
            return;
        }
        let height = self.list_height;
        let max_offset = self.filtered.len().saturating_sub(height);

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }

        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }
}

fn facet_label<T: Copy + PartialEq>(
    facet: Facet<T>,
    label: fn(T) -> &'static str,
    all: &'static str,
) -> &'static str {
    facet.value().map(label).unwrap_or(all)
}

fn default_username() -> String {
    std::env::var("USER")
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "Gardener".to_string())
}

fn progress_bar(percent: u16, width: usize) -> String {
    let percent = percent.min(100);
    let filled = (usize::from(percent) * width + 50) / 100;
    format!(
        "{}{} {percent:>3}%",
        "█".repeat(filled),
        "░".repeat(width - filled)
    )
}

fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_forge_core::CATALOG;

    #[test]
    fn tab_ids_round_trip_and_wrap() {
        for tab in Tab::ALL {
            assert_eq!(Tab::from_id(tab.id()), tab);
        }
        assert_eq!(Tab::from_id("nowhere"), Tab::Dashboard);
        assert_eq!(Tab::Dashboard.offset(-1), Tab::Settings);
        assert_eq!(Tab::Settings.offset(1), Tab::Dashboard);
    }

    #[test]
    fn browser_keeps_cursor_in_view() {
        let mut browser = PlantBrowser::default();
        browser.apply_filter(CATALOG.plants());
        browser.list_height = 5;

        browser.move_to_end();
        assert_eq!(browser.cursor, CATALOG.plants().len() - 1);
        assert_eq!(browser.offset, CATALOG.plants().len() - 5);

        browser.move_to(0);
        assert_eq!(browser.offset, 0);
        browser.move_cursor(-3);
        assert_eq!(browser.cursor, 0);
    }

    #[test]
    fn browser_handles_empty_results() {
        let mut browser = PlantBrowser::default();
        browser.query.search = "zzzz-no-such-plant".to_string();
        browser.apply_filter(CATALOG.plants());

        assert!(browser.current().is_none());
        browser.move_cursor(1);
        browser.page_down();
        assert_eq!(browser.cursor, 0);
        assert!(browser.visible_plants(10).is_empty());
    }

    #[test]
    fn play_time_saturates() {
        let mut store = GameStore::new();
        record_play_time(&mut store, 30);
        assert_eq!(store.state().farm_stats.play_time, 30);
        assert!(store.profile().is_none());

        let mut profile = PlayerProfile::new("veteran", "Moss");
        profile.play_time = u64::MAX - 5;
        store.set_profile(profile);
        record_play_time(&mut store, 60);
        assert_eq!(store.profile().map(|p| p.play_time), Some(u64::MAX));
        assert_eq!(store.state().farm_stats.play_time, 90);
    }

    #[test]
    fn formatting_helpers() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(2_450), "2,450");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
        assert_eq!(progress_bar(50, 10), "█████░░░░░  50%");
        assert_eq!(progress_bar(250, 4), "████ 100%");
    }
}
