use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Tabs};

use cfgperf_terminal::api::{EvaluationResult, RunStatus, ScoresSource};
use cfgperf_terminal::chart_svg::{DEFAULT_SVG_SIZE, write_svg};
use cfgperf_terminal::chart_tui::{ScoreChartLayout, ScoreChartWidget, tui_color};
use cfgperf_terminal::config::AppConfig;
use cfgperf_terminal::export::{export_file_name, export_workbook, timestamp};
use cfgperf_terminal::feed;
use cfgperf_terminal::logging;
use cfgperf_terminal::performance::{PerformanceSummary, PerformanceTrendWidget, RunSummary};
use cfgperf_terminal::scores::short_label;
use cfgperf_terminal::scores_view::PickerItem;
use cfgperf_terminal::state::{
    AppState, Delta, DetailTab, FetchTarget, ProviderCommand, Screen, apply_delta,
};
use cfgperf_terminal::visibility::SelectAllState;

struct App {
    state: AppState,
    config: AppConfig,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    last_detail_refresh: Instant,
}

impl App {
    fn new(config: AppConfig, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(&config),
            config,
            should_quit: false,
            cmd_tx,
            last_detail_refresh: Instant::now(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                _ => self.state.help_overlay = false,
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => match self.state.screen {
                Screen::Configs => self.on_configs_key(key),
                Screen::Detail { .. } => self.on_detail_key(key),
            },
        }
    }

    fn on_configs_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter => {
                let Some(id) = self.state.selected_config().map(|c| c.id.clone()) else {
                    self.state.push_log("[INFO] No config selected");
                    return;
                };
                self.state.open_detail(&id);
                self.request_detail(&id, true);
            }
            KeyCode::Char('r') => self.request_configs(true),
            _ => {}
        }
    }

    fn on_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('b') | KeyCode::Esc => self.state.back_to_configs(),
            KeyCode::Tab => self.state.tab = self.state.tab.next(),
            KeyCode::Char('r') => {
                if let Some(id) = self.state.current_config_id().map(str::to_string) {
                    self.state.detail_loading = true;
                    self.request_detail(&id, true);
                }
            }
            KeyCode::Char('x') => self.export_xlsx(),
            KeyCode::Char('e') => self.export_svg(),
            _ => match self.state.tab {
                DetailTab::Performance => {
                    if key.code == KeyCode::Char('c') {
                        self.state.chart_kind = self.state.chart_kind.cycle();
                    }
                }
                DetailTab::Scores => self.on_scores_key(key),
                DetailTab::Runs => {}
            },
        }
    }

    fn on_scores_key(&mut self, key: KeyEvent) {
        let Some(scores) = self.state.active_scores_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => scores.picker_next(),
            KeyCode::Char('k') | KeyCode::Up => scores.picker_prev(),
            KeyCode::Char(' ') => scores.activate_picker(),
            KeyCode::Char('a') => scores.toggle_selected_category(),
            KeyCode::Char('o') => scores.show_overlay = !scores.show_overlay,
            KeyCode::Char('h') | KeyCode::Left => scores.move_cursor(-1),
            KeyCode::Char('l') | KeyCode::Right => scores.move_cursor(1),
            KeyCode::Char('[') => scores.brush_narrow(),
            KeyCode::Char(']') => scores.brush_widen(),
            KeyCode::Char('<') => scores.brush_pan(-1),
            KeyCode::Char('>') => scores.brush_pan(1),
            KeyCode::Char('0') => {
                scores.brush_reset();
                scores.clear_cursor();
            }
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent, size: Rect) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if !matches!(self.state.screen, Screen::Detail { .. })
            || self.state.tab != DetailTab::Scores
            || self.state.help_overlay
        {
            return;
        }
        let title = chart_title(&self.state);
        let Some(scores) = self.state.active_scores_mut() else {
            return;
        };
        let Some(spec) = scores.chart_spec(&title) else {
            return;
        };
        let layout =
            ScoreChartLayout::compute_page(&spec, scores_chart_rect(size), scores.legend_page);
        if let Some(target) = layout.hit(mouse.column, mouse.row).cloned() {
            scores.apply_legend(&target);
        }
    }

    fn send(&mut self, cmd: ProviderCommand, what: &str, announce: bool) -> bool {
        let Some(tx) = &self.cmd_tx else {
            if announce {
                self.state.push_log(format!("[INFO] {what} fetch unavailable"));
            }
            return false;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log(format!("[WARN] {what} request failed"));
            return false;
        }
        if announce {
            self.state.push_log(format!("[INFO] {what} request sent"));
        }
        true
    }

    fn request_configs(&mut self, announce: bool) {
        self.state.configs_loading = true;
        self.send(ProviderCommand::FetchConfigs, "Configs", announce);
    }

    fn request_detail(&mut self, config_id: &str, announce: bool) {
        let cmd = ProviderCommand::FetchConfigDetail {
            config_id: config_id.to_string(),
        };
        if self.send(cmd, "Detail", announce) {
            self.last_detail_refresh = Instant::now();
        }
    }

    fn maybe_refresh_detail(&mut self) {
        let Some(id) = self.state.current_config_id().map(str::to_string) else {
            return;
        };
        if self.state.detail_loading {
            return;
        }
        if self.last_detail_refresh.elapsed() >= self.config.detail_refresh {
            self.request_detail(&id, false);
        }
    }

    fn export_xlsx(&mut self) {
        let Some(detail) = self.state.detail.as_ref() else {
            self.state.push_log("[INFO] Nothing to export yet");
            return;
        };
        let scores = &self.state.scores;
        let visible = scores.table().project(&scores.visible_keys());
        let path = self
            .config
            .export_dir
            .join(export_file_name(&detail.name, &timestamp(), "xlsx"));
        match export_workbook(&path, detail, &visible) {
            Ok(report) => {
                tracing::info!(path = %report.path.display(), "xlsx export written");
                self.state.push_log(format!(
                    "[INFO] Exported {} score rows x {} series, {} runs -> {}",
                    report.score_rows,
                    report.score_columns,
                    report.runs,
                    report.path.display()
                ));
            }
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }

    fn export_svg(&mut self) {
        let Some(name) = self.state.detail.as_ref().map(|d| d.name.clone()) else {
            self.state.push_log("[INFO] Nothing to export yet");
            return;
        };
        let spec = self
            .state
            .active_scores()
            .and_then(|scores| scores.chart_spec(&chart_title(&self.state)));
        let Some(spec) = spec else {
            self.state.push_log("[INFO] No score chart to export");
            return;
        };
        let path = self
            .config
            .export_dir
            .join(export_file_name(&name, &timestamp(), "svg"));
        match write_svg(&spec, &path, DEFAULT_SVG_SIZE) {
            Ok(()) => self
                .state
                .push_log(format!("[INFO] Chart exported -> {}", path.display())),
            Err(err) => self.state.push_log(format!("[WARN] SVG export failed: {err:#}")),
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = AppConfig::from_env();
    let log_setup = config
        .log_file
        .as_deref()
        .map(logging::init_file_logging);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    feed::spawn_provider(tx, cmd_rx, config.clone());

    let mut app = App::new(config, Some(cmd_tx));
    if let Some(Err(err)) = log_setup {
        app.state.push_log(format!("[WARN] Log file disabled: {err:#}"));
    }
    app.request_configs(false);
    let res = run_app(&mut terminal, &mut app, rx);

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

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.maybe_refresh_detail();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    app.on_mouse(mouse, size);
                }
                _ => {}
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

fn main_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

fn detail_chunks(body: Rect) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(body);
    [chunks[0], chunks[1]]
}

fn scores_chunks(content: Rect) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(20)])
        .split(content);
    [chunks[0], chunks[1]]
}

/// Where the score chart lands for a given terminal size. Rendering and
/// mouse hit testing both go through here.
fn scores_chart_rect(size: Rect) -> Rect {
    let [_, body, _] = main_chunks(size);
    let [_, content] = detail_chunks(body);
    let [_, chart] = scores_chunks(content);
    chart
}

fn ui(frame: &mut Frame, app: &App) {
    let [header_area, body, footer_area] = main_chunks(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, header_area);

    match app.state.screen {
        Screen::Configs => render_configs(frame, body, &app.state),
        Screen::Detail { .. } => render_detail(frame, body, &app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, footer_area);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn chart_title(state: &AppState) -> String {
    match state.detail.as_ref() {
        Some(detail) => format!("{} · scores", detail.name),
        None => "Scores".to_string(),
    }
}

fn header_text(state: &AppState) -> String {
    let title = match &state.screen {
        Screen::Configs => format!("CFGPERF | Configurations ({})", state.configs.len()),
        Screen::Detail { config_id } => {
            let name = state
                .detail
                .as_ref()
                .map(|d| d.name.clone())
                .unwrap_or_else(|| config_id.clone());
            format!("CFGPERF | {name} | {}", state.tab.title())
        }
    };
    let status = if let Some(err) = &state.error {
        format!("Error: {}", err.message)
    } else if state.configs_loading && matches!(state.screen, Screen::Configs) {
        "Loading configurations...".to_string()
    } else if state.detail_loading && matches!(state.screen, Screen::Detail { .. }) {
        "Loading config detail...".to_string()
    } else {
        state.logs.back().cloned().unwrap_or_default()
    };
    format!(" {title}\n {status}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Configs => "j/k Move | Enter Open | r Refresh | ? Help | q Quit".to_string(),
        Screen::Detail { .. } => match state.tab {
            DetailTab::Performance => {
                "Tab Next | c Chart type | x Export | r Refresh | b/Esc Back | ? Help | q Quit"
                    .to_string()
            }
            DetailTab::Scores => {
                "Tab Next | j/k Pick | Space Toggle | a Category | o Overlay | h/l Cursor | [ ] < > 0 Brush | e SVG | x Export | ? Help"
                    .to_string()
            }
            DetailTab::Runs => {
                "Tab Next | x Export | r Refresh | b/Esc Back | ? Help | q Quit".to_string()
            }
        },
    }
}

fn config_columns() -> [Constraint; 6] {
    [
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(11),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Min(12),
    ]
}

fn render_configs(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(5),
        ])
        .split(area);

    let widths = config_columns();
    render_config_header(frame, sections[0], &widths);

    let console = Paragraph::new(console_text(state))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().title("Console").borders(Borders::TOP));
    frame.render_widget(console, sections[2]);

    let list_area = sections[1];
    if state.configs.is_empty() {
        let text = match (&state.error, state.configs_loading) {
            (Some(err), _) if err.target == FetchTarget::Configs => {
                format!("{} (r to retry)", err.message)
            }
            (_, true) => "Loading configurations...".to_string(),
            _ => "No configurations".to_string(),
        };
        let empty = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, state.configs.len(), visible);
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
        let config = &state.configs[idx];
        let (status, status_style) = match config.last_run.as_ref().map(|r| r.status) {
            Some(RunStatus::Success) => ("success", row_style.fg(Color::Green)),
            Some(RunStatus::Failure) => ("failure", row_style.fg(Color::Red)),
            None => ("-", row_style),
        };
        render_cell_text(frame, cols[0], &config.name, row_style);
        render_cell_text(frame, cols[1], status, status_style);
        render_cell_text(frame, cols[2], &format!("{:.1}", config.efficiency), row_style);
        render_cell_text(frame, cols[3], &format!("{:.2}", config.growth_quality), row_style);
        render_cell_text(frame, cols[4], &format!("{:.2}", config.semantic_score), row_style);
        render_cell_text(frame, cols[5], &config.evaluation, row_style);
    }
}

fn render_config_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Config", style);
    render_cell_text(frame, cols[1], "Last run", style);
    render_cell_text(frame, cols[2], "Efficiency", style);
    render_cell_text(frame, cols[3], "Growth", style);
    render_cell_text(frame, cols[4], "Semantic", style);
    render_cell_text(frame, cols[5], "Evaluation", style);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    frame.render_widget(Paragraph::new(text).style(style), text_area);
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

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let [tabs_area, content] = detail_chunks(area);
    let tabs = Tabs::new(DetailTab::ALL.iter().map(|t| t.title()).collect::<Vec<_>>())
        .select(state.tab.index())
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, tabs_area);

    let Some(detail) = state.detail.as_ref() else {
        let text = match &state.error {
            Some(err) => format!("{} (r to retry, b to go back)", err.message),
            None => "Loading...".to_string(),
        };
        let empty = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, content);
        return;
    };

    match state.tab {
        DetailTab::Performance => render_performance(frame, content, state),
        DetailTab::Scores => render_scores(frame, content, state),
        DetailTab::Runs => render_runs(frame, content, &detail.recent_runs),
    }
}

fn render_performance(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(detail) = state.detail.as_ref() else {
        return;
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(area);

    let summary = PerformanceSummary::from_data(&detail.performance_data);
    let runs = RunSummary::from_runs(&detail.recent_runs);
    let stats = match &summary {
        Some(s) => {
            let trend = if s.is_improving() { "▲" } else { "▼" };
            let rate = runs
                .success_rate()
                .map(|r| format!("{r:.0}%"))
                .unwrap_or_else(|| "-".to_string());
            format!(
                "Latest {:.1} {trend} {:+.1} | Avg {:.1} | Range {:.1}-{:.1} | Runs {} ({} good) | Success {rate}",
                s.latest,
                s.change,
                s.average,
                s.min,
                s.max,
                runs.total(),
                runs.good
            )
        }
        None => "No performance data".to_string(),
    };
    frame.render_widget(
        Paragraph::new(stats).block(Block::default().title("Summary").borders(Borders::ALL)),
        rows[0],
    );

    frame.render_widget(
        PerformanceTrendWidget::new(&detail.performance_data, state.chart_kind),
        rows[1],
    );

    let Some(summary) = summary else {
        return;
    };
    let gauges = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[2]);
    let entries = [
        ("Efficiency", summary.latest_in_band_pct(), Color::Blue),
        ("Consistency", summary.consistency_pct(), Color::Green),
        ("Improvement", summary.improvement_pct(), Color::Magenta),
    ];
    for ((title, pct, color), gauge_area) in entries.into_iter().zip(gauges.iter()) {
        let gauge = Gauge::default()
            .block(Block::default().title(title).borders(Borders::ALL))
            .gauge_style(Style::default().fg(color))
            .percent(pct.round().clamp(0.0, 100.0) as u16);
        frame.render_widget(gauge, *gauge_area);
    }
}

fn render_scores(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(scores) = state.active_scores() else {
        return;
    };
    let Some(spec) = scores.chart_spec(&chart_title(state)) else {
        let empty = Paragraph::new("No score metrics").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let [picker_area, chart_area] = scores_chunks(area);
    render_picker(frame, picker_area, state);
    let readout = scores.readout();
    let widget = ScoreChartWidget::new(&spec)
        .cursor(scores.cursor_x(), readout.as_deref())
        .legend_page(scores.legend_page)
        .focused(true);
    frame.render_widget(widget, chart_area);
}

fn checkbox(state: SelectAllState) -> &'static str {
    match state {
        SelectAllState::Checked => "[x]",
        SelectAllState::Indeterminate => "[-]",
        SelectAllState::Unchecked => "[ ]",
    }
}

fn render_picker(frame: &mut Frame, area: Rect, state: &AppState) {
    let scores = &state.scores;
    let source = match state.detail.as_ref().map(|d| d.scores_source) {
        Some(ScoresSource::Sample) => " Metrics (sample) ",
        _ => " Metrics ",
    };
    let block = Block::default().title(source).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items = scores.picker_items();

    let styles = scores.styles();
    let (start, end) = visible_range(scores.picker_selected, items.len(), inner.height as usize);
    let lines: Vec<Line> = items[start..end]
        .iter()
        .enumerate()
        .map(|(offset, item)| {
            let selected = start + offset == scores.picker_selected;
            let base = if selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            match item {
                PickerItem::Category(category) => Line::from(Span::styled(
                    format!("{} {}", checkbox(scores.category_state(*category)), category.label()),
                    base.add_modifier(Modifier::BOLD),
                )),
                PickerItem::Key(key) => {
                    let visible = scores.store().is_visible(key);
                    let mark = if visible { "[x]" } else { "[ ]" };
                    let swatch_style = if visible {
                        base.fg(tui_color(styles.style_for(key).color))
                    } else {
                        base.fg(Color::DarkGray)
                    };
                    Line::from(vec![
                        Span::styled(format!("  {mark} "), base),
                        Span::styled("■ ", swatch_style),
                        Span::styled(short_label(key), base),
                    ])
                }
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_runs(frame: &mut Frame, area: Rect, runs: &[cfgperf_terminal::api::Run]) {
    let summary = RunSummary::from_runs(runs);
    let rate = summary
        .success_rate()
        .map(|r| format!("{r:.0}%"))
        .unwrap_or_else(|| "-".to_string());
    let title = format!(
        " Runs: {} | Good {} | Bad {} | Success {rate} ",
        summary.total(),
        summary.good,
        summary.bad
    );

    if runs.is_empty() {
        let empty = Paragraph::new("No runs recorded")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Run", "Date", "Efficiency", "Evaluation"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = runs
        .iter()
        .map(|run| {
            let (label, color) = match run.evaluation_result {
                EvaluationResult::Good => ("Good", Color::Green),
                EvaluationResult::Bad => ("Bad", Color::Red),
            };
            Row::new(vec![
                Cell::from(run.id.clone()),
                Cell::from(run.date.clone()),
                Cell::from(format!("{:.1}", run.efficiency)),
                Cell::from(label).style(Style::default().fg(color)),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(22),
            Constraint::Length(11),
            Constraint::Length(11),
        ],
    )
    .header(header)
    .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(4)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Config Performance - Help",
        "",
        "Global:",
        "  j/k or ↑/↓   Move",
        "  Enter        Open config",
        "  b / Esc      Back",
        "  Tab          Next tab",
        "  r            Refresh / retry",
        "  x            Export workbook (xlsx)",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Performance:",
        "  c            Cycle line / area / bar",
        "",
        "Scores:",
        "  Space        Toggle metric or category",
        "  a            Select-all for the category",
        "  o            Toggle performance overlay",
        "  h/l          Move crosshair",
        "  [ / ]        Narrow / widen range",
        "  < / >        Pan range",
        "  0            Reset range",
        "  e            Export chart (svg)",
        "  click        Toggle legend entry",
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
