use std::{
    io::{self, Stdout},
    panic,
};

use crossbeam_channel::{never, select, unbounded, Receiver};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};

use crate::app::App;
use crate::error::AppError;
use crate::input::{spawn_input_thread, Input};
use crate::shutdown::Shutdown;
use crate::util::{format_clock, format_stats, y_ceiling};
use crate::window::Snapshot;

/// Owns the terminal while the UI is up: raw mode plus alternate screen.
/// Dropping it restores the terminal, and so does a panic.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub fn enter() -> Result<Self, AppError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            restore_terminal();
            return Err(err.into());
        }
        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(err) => {
                restore_terminal();
                return Err(err.into());
            }
        };
        install_panic_hook();
        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
        let _ = self.terminal.show_cursor();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        previous(info);
    }));
}

pub fn run(app: &mut App, samples: &Receiver<f64>, shutdown: &Shutdown) -> Result<(), AppError> {
    let mut session = TerminalSession::enter()?;

    let (input_tx, input_rx) = unbounded();
    let input_handle = spawn_input_thread(input_tx, shutdown.clone());

    let res = run_app_loop(session.terminal_mut(), app, samples, &input_rx, shutdown);

    shutdown.trigger();
    if input_handle.join().is_err() {
        tracing::error!("input thread panicked");
    }
    res
}

fn run_app_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    samples: &Receiver<f64>,
    inputs: &Receiver<Input>,
    shutdown: &Shutdown,
) -> Result<(), AppError> {
    let closed = never();

    loop {
        draw(terminal, app)?;

        let source = if app.source_closed() { &closed } else { samples };
        let keep_running = select! {
            recv(source) -> msg => {
                match msg {
                    Ok(latency) => app.on_sample(latency),
                    Err(_) => {
                        tracing::info!(host = %app.target, "sample source closed");
                        app.on_source_closed();
                    }
                }
                true
            }
            recv(inputs) -> msg => matches!(msg, Ok(Input::Redraw)),
            recv(shutdown.receiver()) -> _ => false,
        };

        if !keep_running {
            tracing::info!(replies = app.replies, "quitting");
            return Ok(());
        }
    }
}

/// Redraw the whole screen. Fails when the window holds no samples.
pub fn draw<B: Backend>(terminal: &mut Terminal<B>, app: &App) -> Result<(), AppError> {
    let snapshot = app.window.snapshot()?;
    terminal.draw(|f| render(f, app, &snapshot))?;
    Ok(())
}

fn render(f: &mut Frame, app: &App, snapshot: &Snapshot) {
    // ============= whole screen layout ============
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Statistics
            Constraint::Min(5),    // Chart
            Constraint::Length(1), // Status Bar
        ])
        .split(f.size());

    let stats = Paragraph::new(format_stats(&snapshot.stats))
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .title(" Statistics ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(stats, chunks[0]);

    // ============= Latency Chart ============
    let y_max = y_ceiling(&snapshot.points);
    let dataset = Dataset::default()
        .name("Latency")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(&snapshot.points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title(format!(" Ping [{}] ", app.target))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, app.window.capacity() as f64]),
        )
        .y_axis(
            Axis::default()
                .title("ms")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.0}", y_max / 2.0)),
                    Span::raw(format!("{:.0}", y_max)),
                ]),
        );
    f.render_widget(chart, chunks[1]);

    // ============ Bottom Status Bar ============
    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.target),
            Style::default().bg(Color::White).fg(Color::Black).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled("stats: ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.window.mode().label()),
        Span::raw(" | "),
        Span::styled("window: ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}/{}", app.window.len(), app.window.capacity())),
        Span::raw(" | "),
        Span::styled("replies: ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.replies.to_string()),
        Span::raw(" | "),
        Span::styled("last: ", Style::default().fg(Color::DarkGray)),
        Span::raw(format_clock(app.last_reply_at.as_ref())),
        Span::styled(
            format!(" (since {})", format_clock(Some(&app.started_at))),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if app.source_closed() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            "probe exited",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::raw(" | Press 'q' to quit"));

    let status_bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(20, 20, 20)));
    f.render_widget(status_bar, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_WINDOW_SIZE;
    use crate::window::{RollingWindow, StatsMode};
    use crossbeam_channel::bounded;
    use ratatui::backend::TestBackend;
    use std::thread;

    fn test_terminal() -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(160, 20)).unwrap()
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draw_shows_statistics() {
        let mut app = App::new("1.1.1.1", DEFAULT_WINDOW_SIZE, StatsMode::Compat);
        app.on_sample(10.0);
        app.on_sample(50.0);

        let mut terminal = test_terminal();
        draw(&mut terminal, &app).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("Avg: 12.50ms Max: 50.00ms Min: 50.00ms"));
        assert!(text.contains("Ping [1.1.1.1]"));
        assert!(text.contains("replies: 2"));
        assert!(text.contains("window: 4/100"));
        assert!(!text.contains("probe exited"));
    }

    #[test]
    fn test_draw_marks_closed_source() {
        let mut app = App::new("example.com", DEFAULT_WINDOW_SIZE, StatsMode::Exact);
        app.on_source_closed();

        let mut terminal = test_terminal();
        draw(&mut terminal, &app).unwrap();
        assert!(screen(&terminal).contains("probe exited"));
    }

    #[test]
    fn test_draw_empty_history_fails() {
        let mut app = App::new("1.1.1.1", DEFAULT_WINDOW_SIZE, StatsMode::Compat);
        app.window = RollingWindow::new(DEFAULT_WINDOW_SIZE, StatsMode::Compat);

        let mut terminal = test_terminal();
        assert!(matches!(draw(&mut terminal, &app), Err(AppError::EmptyHistory)));
    }

    #[test]
    fn test_loop_consumes_samples_until_quit() {
        let mut app = App::new("1.1.1.1", DEFAULT_WINDOW_SIZE, StatsMode::Compat);
        let (sample_tx, sample_rx) = bounded(0);
        let (input_tx, input_rx) = unbounded();
        let shutdown = Shutdown::new();

        let producer = thread::spawn(move || {
            for latency in [10.0, 50.0] {
                sample_tx.send(latency).unwrap();
            }
            drop(sample_tx);
            input_tx.send(Input::Quit).unwrap();
        });

        let mut terminal = test_terminal();
        run_app_loop(&mut terminal, &mut app, &sample_rx, &input_rx, &shutdown).unwrap();
        producer.join().unwrap();

        assert_eq!(app.replies, 2);
        assert_eq!(app.window.aggregates().avg, 12.5);
    }

    #[test]
    fn test_loop_stops_on_shutdown() {
        let mut app = App::new("1.1.1.1", DEFAULT_WINDOW_SIZE, StatsMode::Compat);
        let (_sample_tx, sample_rx) = bounded::<f64>(0);
        let (_input_tx, input_rx) = unbounded();
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let mut terminal = test_terminal();
        run_app_loop(&mut terminal, &mut app, &sample_rx, &input_rx, &shutdown).unwrap();
        assert_eq!(app.replies, 0);
    }
}
