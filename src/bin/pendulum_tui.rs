//! Damped Pendulum - Terminal User Interface
//!
//! Animates the pendulum on a ratatui canvas with live readouts.
//! App logic lives in `pendulum::tui::pendulum_app`.
//!
//! Usage: `pendulum-tui [path/to/config.yaml]`

#![forbid(unsafe_code)]

#[cfg(feature = "tui")]
fn main() -> pendulum::SimResult<()> {
    use pendulum::config::ExitPolicy;
    use pendulum::tui::PendulumApp;

    tui::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let loaded = match args.get(1) {
        Some(path) => PendulumApp::from_yaml_file(path),
        None => PendulumApp::new(),
    };

    let app = match loaded {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            eprintln!("Usage: pendulum-tui [path/to/config.yaml]");
            std::process::exit(1);
        }
    };

    let exit = app.config.display.exit;
    tui::run(app)?;

    if exit == ExitPolicy::Hard {
        std::process::exit(0);
    }
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn main() {
    eprintln!("TUI feature not enabled. Run with: cargo run --bin pendulum-tui --features tui");
    std::process::exit(1);
}

#[cfg(feature = "tui")]
mod tui {
    use crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use pendulum::render::{self, disc, Pixel, Surface};
    use pendulum::tui::PendulumApp;
    use pendulum::{SimError, SimResult};
    use ratatui::{
        backend::{Backend, CrosstermBackend},
        layout::{Constraint, Direction, Layout, Rect},
        style::{Color, Modifier, Style},
        symbols::Marker,
        text::{Line, Span},
        widgets::{
            canvas::{Canvas, Circle, Context, Line as CanvasLine, Points},
            Block, Borders, Paragraph,
        },
        Frame, Terminal,
    };
    use std::io;
    use std::time::{Duration, Instant};
    use tracing_subscriber::EnvFilter;

    /// Route `tracing` events to stderr, filtered by `RUST_LOG` (default `warn`).
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .finish();

        if tracing::subscriber::set_global_default(subscriber).is_err() {
            eprintln!("tracing subscriber already set");
        }
    }

    fn presentation(e: io::Error) -> SimError {
        SimError::presentation(e.to_string())
    }

    /// Run the TUI application until a quit request.
    ///
    /// The terminal is restored before returning, also when the loop fails.
    pub fn run(mut app: PendulumApp) -> SimResult<()> {
        enable_raw_mode().map_err(presentation)?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, crossterm::cursor::Hide).map_err(presentation)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(presentation)?;
        terminal.clear().map_err(presentation)?;

        let result = run_main_loop(&mut terminal, &mut app);

        disable_raw_mode().map_err(presentation)?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )
        .map_err(presentation)?;

        tracing::debug!(frames = app.frame_count, "terminal restored");
        result
    }

    fn run_main_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut PendulumApp) -> SimResult<()> {
        loop {
            if app.should_quit {
                return Ok(());
            }

            let start = Instant::now();
            app.update();
            terminal.draw(|f| ui(f, app)).map_err(presentation)?;

            pump_events(app, start, poll_terminal)?;
        }
    }

    fn poll_terminal(wait: Duration) -> io::Result<Option<Event>> {
        if event::poll(wait)? {
            event::read().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Handle input until the frame that began at `start` is used up.
    ///
    /// Input arriving early does not end the frame, so held keys cannot
    /// push the step rate above `target_fps`. A quit request returns at once.
    fn pump_events<F>(app: &mut PendulumApp, start: Instant, mut next_event: F) -> SimResult<()>
    where
        F: FnMut(Duration) -> io::Result<Option<Event>>,
    {
        let mut wait = app.budget.remaining(start);
        loop {
            if let Some(Event::Key(key)) = next_event(wait).map_err(presentation)? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key_event(key);
                    if app.should_quit {
                        return Ok(());
                    }
                }
            }

            wait = app.budget.remaining(start);
            if wait.is_zero() {
                return Ok(());
            }
        }
    }

    fn ui(f: &mut Frame, app: &PendulumApp) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(f.area());

        render_title(f, chunks[0], app);
        render_pendulum_canvas(f, chunks[1], app);
        render_status(f, chunks[2], app);
    }

    fn render_title(f: &mut Frame, area: Rect, app: &PendulumApp) {
        let (state, color) = if app.halted.is_some() {
            ("[HALTED]", Color::Red)
        } else if app.paused {
            ("[PAUSED]", Color::Yellow)
        } else {
            ("[RUNNING]", Color::Green)
        };

        let version = match pendulum::GIT_HASH {
            Some(hash) => format!("v{} ({hash})", pendulum::VERSION),
            None => format!("v{}", pendulum::VERSION),
        };

        let title = Paragraph::new(vec![Line::from(vec![
            Span::styled(
                format!(" DAMPED PENDULUM {version} "),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::styled(state, Style::default().fg(color)),
        ])])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls: [Space] Pause  [R] Reset  [Q] Quit"),
        );
        f.render_widget(title, area);
    }

    fn render_pendulum_canvas(f: &mut Frame, area: Rect, app: &PendulumApp) {
        let width = f64::from(app.config.display.width);
        let height = f64::from(app.config.display.height);

        let canvas = Canvas::default()
            .block(Block::default().borders(Borders::ALL).title("Pendulum"))
            .marker(Marker::Braille)
            .background_color(Color::Black)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                let mut surface = CanvasSurface { ctx, height };
                render::replay(&app.commands, &mut surface);
            });

        f.render_widget(canvas, area);
    }

    fn render_status(f: &mut Frame, area: Rect, app: &PendulumApp) {
        let mut spans = vec![Span::styled(
            app.status_line(),
            Style::default().fg(Color::White),
        )];
        if let Some(reason) = &app.halted {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(reason.clone(), Style::default().fg(Color::Red)));
        } else if app.equilibrium_events > 0 {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                format!("Equilibrium x{}", app.equilibrium_events),
                Style::default().fg(Color::Yellow),
            ));
        }

        let status = Paragraph::new(vec![Line::from(spans)]).block(Block::default().borders(Borders::ALL));
        f.render_widget(status, area);
    }

    fn rgb(color: render::Color) -> Color {
        Color::Rgb(color.r, color.g, color.b)
    }

    /// Paints render commands onto a canvas whose y axis points up.
    struct CanvasSurface<'c, 'a> {
        ctx: &'c mut Context<'a>,
        height: f64,
    }

    impl CanvasSurface<'_, '_> {
        fn point(&self, p: Pixel) -> (f64, f64) {
            (f64::from(p.x), self.height - f64::from(p.y))
        }
    }

    impl Surface for CanvasSurface<'_, '_> {
        fn clear(&mut self, _color: render::Color) {
            // The canvas background is repainted every frame.
        }

        fn draw_line(&mut self, from: Pixel, to: Pixel, color: render::Color) {
            let (x1, y1) = self.point(from);
            let (x2, y2) = self.point(to);
            self.ctx.draw(&CanvasLine {
                x1,
                y1,
                x2,
                y2,
                color: rgb(color),
            });
        }

        fn draw_circle(&mut self, center: Pixel, radius: u32, color: render::Color, filled: bool) {
            if filled {
                let coords: Vec<(f64, f64)> = disc(center, radius)
                    .into_iter()
                    .map(|p| self.point(p))
                    .collect();
                self.ctx.draw(&Points {
                    coords: &coords,
                    color: rgb(color),
                });
            } else {
                let (x, y) = self.point(center);
                self.ctx.draw(&Circle {
                    x,
                    y,
                    radius: f64::from(radius),
                    color: rgb(color),
                });
            }
        }

        fn draw_text(&mut self, at: Pixel, text: &str, color: render::Color) {
            let (x, y) = self.point(at);
            self.ctx
                .print(x, y, Span::styled(text.to_owned(), Style::default().fg(rgb(color))));
        }
    }

}
