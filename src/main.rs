use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::execute;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use exsoviet_ranking::dataset::{self, season_label};
use exsoviet_ranking::nation_coefficient::RankingWeights;
use exsoviet_ranking::ranking_export;
use exsoviet_ranking::rankings;
use exsoviet_ranking::state::{
    metric_label, metric_value, screen_label, AppState, BreakdownMetric, Screen,
};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new() -> Self {
        let mut app = Self {
            state: AppState::new(),
            should_quit: false,
        };
        app.reload();
        app
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => {
                self.state.screen = Screen::Nations;
                self.state.clamp_selection();
            }
            KeyCode::Char('2') => {
                self.state.screen = Screen::Clubs;
                self.state.clamp_selection();
            }
            KeyCode::Char('3') => {
                self.state.screen = Screen::Breakdown;
                self.state.clamp_selection();
            }
            KeyCode::Char('4') => {
                self.state.screen = Screen::History;
                self.state.clamp_selection();
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('s') => self.state.cycle_metric(),
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn reload(&mut self) {
        match dataset::load_tables(None, None) {
            Ok(tables) => {
                let weights = RankingWeights::from_env();
                let snapshot = rankings::compute_snapshot(&tables.nations, &tables.clubs, weights);
                self.state.push_log(format!(
                    "[INFO] Ranked {} nations and {} clubs (nations: {}, clubs: {})",
                    snapshot.nations.len(),
                    snapshot.clubs.len(),
                    tables.nations_source,
                    tables.clubs_source
                ));
                self.state.set_snapshot(
                    snapshot,
                    tables.nations,
                    tables.nations_source,
                    tables.clubs_source,
                );
            }
            Err(err) => {
                self.state.push_log(format!("[WARN] Reload failed: {err}"));
            }
        }
    }

    fn export(&mut self) {
        let path = PathBuf::from("exsoviet_ranking.xlsx");
        match ranking_export::write_snapshot_xlsx(&path, &self.state.snapshot) {
            Ok(report) => {
                self.state.push_log(format!(
                    "[INFO] Exported {} nations / {} clubs to {}",
                    report.nations,
                    report.clubs,
                    path.display()
                ));
            }
            Err(err) => {
                self.state.push_log(format!("[WARN] Export failed: {err}"));
            }
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new();
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Nations => render_nations(frame, chunks[1], &app.state),
        Screen::Clubs => render_clubs(frame, chunks[1], &app.state),
        Screen::Breakdown => render_breakdown(frame, chunks[1], &app.state),
        Screen::History => render_history(frame, chunks[1], &app.state),
    }

    render_logs(frame, chunks[2], &app.state);

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Nations => format!(
            "EX-SOVIET RANKING | {} | {} nations / {} clubs | {}",
            screen_label(state.screen),
            state.snapshot.nations.len(),
            state.snapshot.clubs.len(),
            state.nations_source
        ),
        Screen::Clubs => format!(
            "EX-SOVIET RANKING | {} | Window: {} | {}",
            screen_label(state.screen),
            window_label(&state.snapshot.window_years),
            state.clubs_source
        ),
        Screen::Breakdown => format!(
            "EX-SOVIET RANKING | {} | Metric: {}",
            screen_label(state.screen),
            metric_label(state.metric)
        ),
        Screen::History => {
            let subject = state
                .selected_nation()
                .map(|n| n.country.clone())
                .unwrap_or_else(|| "none".to_string());
            format!(
                "EX-SOVIET RANKING | {} | {}",
                screen_label(state.screen),
                subject
            )
        }
    };
    let line1 = format!("  ,--.  {title}");
    let line2 = " ( () )".to_string();
    let line3 = "  `--'".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Nations | Screen::Clubs => {
            "1 Nations | 2 Clubs | 3 Breakdown | 4 History | j/k/↑/↓ Move | e Export | r Reload | ? Help | q Quit".to_string()
        }
        Screen::Breakdown => {
            "1 Nations | 2 Clubs | 3 Breakdown | 4 History | j/k/↑/↓ Move | s Metric | e Export | r Reload | ? Help | q Quit".to_string()
        }
        Screen::History => {
            "1 Nations | 2 Clubs | 3 Breakdown | 4 History | j/k/↑/↓ Nation | r Reload | ? Help | q Quit".to_string()
        }
    }
}

fn window_label(years: &[i32]) -> String {
    match (years.first(), years.last()) {
        (Some(first), Some(last)) => format!("{}-{}", season_label(*first), season_label(*last)),
        _ => "empty".to_string(),
    }
}

fn render_nations(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = nation_columns();
    render_nation_header(frame, sections[0], &widths);

    let list_area = sections[1];
    let nations = &state.snapshot.nations;
    if nations.is_empty() {
        let empty = Paragraph::new("No nation records loaded")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, nations.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };

        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let n = &nations[idx];
        render_cell_text(frame, cols[0], &n.rank.to_string(), row_style);
        render_cell_text(frame, cols[1], &n.country_code, row_style);
        render_cell_text(frame, cols[2], &n.country, row_style);
        render_cell_text(frame, cols[3], &format!("{:.3}", n.uefa_total), row_style);
        render_cell_text(frame, cols[4], &format!("{:.3}", n.afc_total), row_style);
        render_cell_text(frame, cols[5], &format!("{:.1}", n.fifa_total), row_style);
        render_cell_text(frame, cols[6], &format!("{:.3}", n.coefficient), row_style);
    }
}

fn render_clubs(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let window = &state.snapshot.window_years;
    let widths = club_columns(window.len());
    render_club_header(frame, sections[0], &widths, window);

    let list_area = sections[1];
    let clubs = &state.snapshot.clubs;
    if clubs.is_empty() {
        let empty = Paragraph::new("No club records loaded")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, clubs.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };

        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(&widths)
            .split(row_area);

        let c = &clubs[idx];
        render_cell_text(frame, cols[0], &c.rank.to_string(), row_style);
        render_cell_text(frame, cols[1], &c.team, row_style);
        render_cell_text(frame, cols[2], &c.team_code, row_style);
        render_cell_text(frame, cols[3], &c.country_code, row_style);
        for (offset, (_, value)) in c.season_values.iter().enumerate() {
            render_cell_text(frame, cols[4 + offset], &format!("{value:.3}"), row_style);
        }
        let last = cols.len() - 1;
        render_cell_text(frame, cols[last], &format!("{:.3}", c.coefficient), row_style);
    }
}

fn nation_columns() -> [Constraint; 7] {
    [
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Min(18),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(11),
        Constraint::Length(12),
    ]
}

fn club_columns(window_len: usize) -> Vec<Constraint> {
    let mut widths = vec![
        Constraint::Length(6),
        Constraint::Min(18),
        Constraint::Length(6),
        Constraint::Length(8),
    ];
    for _ in 0..window_len {
        widths.push(Constraint::Length(9));
    }
    widths.push(Constraint::Length(10));
    widths
}

fn render_nation_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Rank", style);
    render_cell_text(frame, cols[1], "Code", style);
    render_cell_text(frame, cols[2], "Country", style);
    render_cell_text(frame, cols[3], "UEFA (5y)", style);
    render_cell_text(frame, cols[4], "AFC (5y)", style);
    render_cell_text(frame, cols[5], "FIFA (5y)", style);
    render_cell_text(frame, cols[6], "Coefficient", style);
}

fn render_club_header(frame: &mut Frame, area: Rect, widths: &[Constraint], window: &[i32]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Rank", style);
    render_cell_text(frame, cols[1], "Club", style);
    render_cell_text(frame, cols[2], "Code", style);
    render_cell_text(frame, cols[3], "Nation", style);
    for (offset, year) in window.iter().enumerate() {
        render_cell_text(frame, cols[4 + offset], &season_label(*year), style);
    }
    let last = cols.len() - 1;
    render_cell_text(frame, cols[last], "Coeff", style);
}

const BAR_SCALE: u64 = 100;

fn render_breakdown(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = breakdown_columns();
    render_breakdown_header(frame, sections[0], &widths, state.metric);

    let list_area = sections[1];
    let nations = &state.snapshot.nations;
    if nations.is_empty() {
        let empty = Paragraph::new("No nation records loaded")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    if list_area.height == 0 {
        return;
    }

    let max = nations
        .iter()
        .fold(0.0_f64, |acc, n| acc.max(metric_value(state.metric, n)));

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, nations.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };

        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let n = &nations[idx];
        let value = metric_value(state.metric, n);
        let name = format!("{:>2}. {} {}", n.rank, n.country_code, n.country);
        render_cell_text(frame, cols[0], &name, row_style);

        let bar = metric_bar_chart(value, max, state.metric, selected);
        frame.render_widget(bar, cols[1]);

        let cell = if state.metric == BreakdownMetric::Fifa {
            format!("{value:.1}")
        } else {
            format!("{value:.3}")
        };
        render_cell_text(frame, cols[2], &cell, row_style);
    }
}

fn breakdown_columns() -> [Constraint; 3] {
    [
        Constraint::Length(26),
        Constraint::Min(20),
        Constraint::Length(12),
    ]
}

fn render_breakdown_header(
    frame: &mut Frame,
    area: Rect,
    widths: &[Constraint],
    metric: BreakdownMetric,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Nation", style);
    render_cell_text(frame, cols[1], metric_label(metric), style);
    render_cell_text(frame, cols[2], "Value", style);
}

fn metric_bar_chart(value: f64, max: f64, metric: BreakdownMetric, selected: bool) -> BarChart<'static> {
    let mut style = Style::default().fg(metric_color(metric));
    if selected {
        style = style.bg(Color::DarkGray);
    }

    let bar = Bar::default()
        .value(scale_bar(value, max))
        .text_value(String::new())
        .style(style);

    BarChart::default()
        .data(BarGroup::default().bars(&[bar]))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(0)
        .max(BAR_SCALE)
}

fn metric_color(metric: BreakdownMetric) -> Color {
    match metric {
        BreakdownMetric::Final => Color::Cyan,
        BreakdownMetric::Uefa => Color::Blue,
        BreakdownMetric::Afc => Color::Green,
        BreakdownMetric::Fifa => Color::Magenta,
    }
}

fn scale_bar(value: f64, max: f64) -> u64 {
    if max <= 0.0 {
        return 0;
    }
    ((value / max) * BAR_SCALE as f64).round() as u64
}

fn render_history(frame: &mut Frame, area: Rect, state: &AppState) {
    const HISTORY_BAR_WIDTH: u16 = 7;
    const HISTORY_SCALE: f64 = 100.0;

    let Some(nation) = state.selected_nation() else {
        let empty = Paragraph::new("No nation selected")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let record = state
        .nations
        .iter()
        .find(|r| r.country_code == nation.country_code);
    let Some(record) = record else {
        let empty = Paragraph::new(format!("No source record for {}", nation.country))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    if record.uefa.is_empty() {
        let empty = Paragraph::new(format!("No UEFA history for {}", nation.country))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let fit = (area.width / (HISTORY_BAR_WIDTH + 1)).max(1) as usize;
    let shown: Vec<_> = record.uefa.iter().rev().take(fit).rev().collect();

    let max = shown.iter().fold(0.0_f64, |acc, pv| acc.max(pv.value));

    let bars: Vec<Bar> = shown
        .iter()
        .map(|pv| {
            Bar::default()
                .value((pv.value * HISTORY_SCALE).round() as u64)
                .label(Line::from(pv.period.label()))
                .text_value(format!("{:.2}", pv.value))
                .style(Style::default().fg(Color::Blue))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .block(
            Block::default()
                .title(format!("UEFA history: {}", nation.country))
                .borders(Borders::ALL),
        )
        .bar_width(HISTORY_BAR_WIDTH)
        .bar_gap(1)
        .max(((max * HISTORY_SCALE).ceil() as u64).max(1));
    frame.render_widget(chart, area);
}

fn render_logs(frame: &mut Frame, area: Rect, state: &AppState) {
    let capacity = (area.height.saturating_sub(1) as usize).max(1);
    let text = if state.logs.is_empty() {
        "No log entries yet".to_string()
    } else {
        state
            .logs
            .iter()
            .rev()
            .take(capacity)
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join("\n")
    };
    let logs = Paragraph::new(text).block(Block::default().title("Log").borders(Borders::TOP));
    frame.render_widget(logs, area);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Ex-Soviet Ranking - Help",
        "",
        "Screens:",
        "  1            Nations",
        "  2            Clubs",
        "  3            Breakdown",
        "  4            History",
        "",
        "Actions:",
        "  j/k or ↑/↓   Move selection",
        "  s            Cycle breakdown metric",
        "  e            Export workbook",
        "  r            Reload tables",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
