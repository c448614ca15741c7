use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

use trophee_palmares::view::{EMPTY_PLACES, EMPTY_RESULTS, EMPTY_YEARS};
use trophee_palmares::{
    distinction_rank, places_for_year, ranked_for_selection, years_present, LevelGroup, Snapshot,
    View, ViewState,
};

const PAGE_STEP: usize = 20;

/// One selectable line of the current view
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Year(i64),
    Place(String),
    Level(String),
    Result {
        candidate: String,
        teacher: String,
        distinction: String,
    },
}

pub struct App {
    pub snapshot: Snapshot,
    pub view_state: ViewState,
    pub items: Vec<Item>,
    pub state: TableState,
}

impl App {
    pub fn new(snapshot: Snapshot) -> Self {
        let mut app = Self {
            snapshot,
            view_state: ViewState::home(),
            items: Vec::new(),
            state: TableState::default(),
        };
        app.refresh();
        app
    }

    /// Swap the view state and recompute what is on screen
    pub fn navigate(&mut self, next: ViewState) {
        self.view_state = next;
        self.refresh();
    }

    fn refresh(&mut self) {
        let entries = self.snapshot.entries();
        let selection = &self.view_state.selection;

        self.items = match self.view_state.view {
            View::Home => Vec::new(),
            View::Years => years_present(entries).into_iter().map(Item::Year).collect(),
            View::Places => match selection.year {
                Some(year) => places_for_year(entries, year)
                    .into_iter()
                    .map(Item::Place)
                    .collect(),
                None => Vec::new(),
            },
            View::Results => flatten(ranked_for_selection(entries, selection)),
        };

        if self.items.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    /// Enter: drill down from the selected line
    pub fn open(&mut self) {
        let next = match (self.view_state.view, self.selected_item()) {
            (View::Home, _) => ViewState::years(),
            (View::Years, Some(Item::Year(year))) => self.view_state.select_year(*year),
            (View::Places, Some(Item::Place(place))) => self.view_state.select_place(place.clone()),
            _ => return,
        };
        self.navigate(next);
    }

    pub fn back(&mut self) {
        let next = self.view_state.back();
        self.navigate(next);
    }

    pub fn next(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let i = self
            .state
            .selected()
            .map(|i| (i + PAGE_STEP).min(len - 1))
            .unwrap_or(0);
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = self
            .state
            .selected()
            .map(|i| i.saturating_sub(PAGE_STEP))
            .unwrap_or(0);
        self.state.select(Some(i));
    }
}

/// Level headers and their rows as one list, in display order
fn flatten(groups: Vec<LevelGroup>) -> Vec<Item> {
    let mut items = Vec::new();
    for group in groups {
        items.push(Item::Level(group.label));
        items.extend(group.rows.into_iter().map(|row| Item::Result {
            candidate: row.candidate,
            teacher: row.teacher,
            distinction: row.distinction,
        }));
    }
    items
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Enter | KeyCode::Right => app.open(),
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => app.back(),
                KeyCode::Char('h') => app.navigate(ViewState::home()),
                KeyCode::Char('y') => app.navigate(ViewState::years()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => {
                    if !app.items.is_empty() {
                        app.state.select(Some(0));
                    }
                }
                KeyCode::End => {
                    if !app.items.is_empty() {
                        app.state.select(Some(app.items.len() - 1));
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.view_state.view {
        View::Home => render_home(f, chunks[1], app),
        View::Years | View::Places => render_list(f, chunks[1], app),
        View::Results => render_results(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let views = [View::Home, View::Years, View::Places, View::Results];

    let mut tab_spans = vec![];
    for (i, view) in views.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *view == app.view_state.view {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(view.title().to_string(), style));
    }

    if matches!(app.view_state.view, View::Places | View::Results) {
        tab_spans.push(Span::raw("  |  "));
        tab_spans.push(Span::styled(
            app.view_state.breadcrumb(),
            Style::default().fg(Color::White),
        ));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_home(f: &mut Frame, area: Rect, app: &App) {
    let content = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Welcome",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("  Browse the results of the Trophée."),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Entries: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(app.snapshot.len().to_string()),
        ]),
        Line::from(vec![
            Span::styled("  Loaded:  ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(app.snapshot.loaded_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Press Enter to see the years",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Trophée Palmarès "),
    );

    f.render_widget(paragraph, area);
}

fn empty_state(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(format!("  {}", message))])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", title)),
        );
    f.render_widget(paragraph, area);
}

fn render_list(f: &mut Frame, area: Rect, app: &mut App) {
    let title = app.view_state.view.title().to_string();

    if app.items.is_empty() {
        let message = if app.view_state.view == View::Years {
            EMPTY_YEARS
        } else {
            EMPTY_PLACES
        };
        empty_state(f, area, &title, message);
        return;
    }

    let rows = app.items.iter().map(|item| {
        let text = match item {
            Item::Year(year) => year.to_string(),
            Item::Place(place) => place.clone(),
            _ => String::new(),
        };
        Row::new(vec![Cell::from(text)]).height(1)
    });

    let table = Table::new(rows, [Constraint::Min(20)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", title)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn distinction_color(distinction: &str) -> Color {
    match distinction_rank(Some(distinction)) {
        100 => Color::Magenta,
        60..=99 => Color::Yellow,
        50 => Color::LightYellow,
        30 => Color::White,
        20 => Color::LightRed,
        10 => Color::Cyan,
        _ => Color::Gray,
    }
}

fn render_results(f: &mut Frame, area: Rect, app: &mut App) {
    let title = app.view_state.breadcrumb();

    if app.items.is_empty() {
        empty_state(f, area, &title, EMPTY_RESULTS);
        return;
    }

    let header_cells = ["Candidate", "Teacher", "Distinction"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.items.iter().map(|item| match item {
        Item::Level(label) => Row::new(vec![Cell::from(label.clone()).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )])
        .height(1),
        Item::Result {
            candidate,
            teacher,
            distinction,
        } => Row::new(vec![
            Cell::from(truncate(candidate, 30)),
            Cell::from(truncate(teacher, 30)),
            Cell::from(distinction.clone())
                .style(Style::default().fg(distinction_color(distinction))),
        ])
        .height(1),
        _ => Row::new(Vec::<Cell>::new()),
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(32),
            Constraint::Length(32),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} ", title)),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.items.len();

    let status_spans = vec![
        Span::styled(
            format!(" Row: {}/{} ", selected, total),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Open | "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Back | "),
        Span::styled("y", Style::default().fg(Color::Yellow)),
        Span::raw(" Years | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Nav | "),
        Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)),
        Span::raw(" Fast | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
