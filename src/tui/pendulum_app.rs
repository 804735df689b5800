//! Pendulum TUI application state and logic.
//!
//! This module contains the testable state and logic for the pendulum TUI.
//! Terminal I/O is handled by the binary, but all state management lives here.

use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::{PendulumConfig, DEFAULT_CONFIG_YAML};
use crate::engine::{Advance, Simulation};
use crate::error::SimResult;
use crate::render::{render_frame, Readouts, RenderCommand};
use crate::tui::frame_budget::FrameBudget;

/// Application state for the pendulum TUI.
#[derive(Debug)]
pub struct PendulumApp {
    /// Simulation state.
    pub sim: Simulation,
    /// Validated configuration the simulation was built from.
    pub config: PendulumConfig,
    /// Whether stepping is paused.
    pub paused: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Frame counter.
    pub frame_count: u64,
    /// Most recent ring movement.
    pub last: Advance,
    /// Draw list for the current frame.
    pub commands: Vec<RenderCommand>,
    /// Jidoka fault that stopped stepping, if any.
    pub halted: Option<String>,
    /// Frame pacing.
    pub budget: FrameBudget,
    /// Equilibrium diagnostics seen since the last reset.
    pub equilibrium_events: u64,
}

impl PendulumApp {
    /// Create from the embedded default configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the embedded configuration fails validation.
    pub fn new() -> SimResult<Self> {
        Self::from_yaml(DEFAULT_CONFIG_YAML)
    }

    /// Create from YAML configuration string.
    ///
    /// # Errors
    ///
    /// Returns error if YAML parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SimResult<Self> {
        Self::from_config(PendulumConfig::from_yaml(yaml)?)
    }

    /// Create from a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed, or validated.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        Self::from_config(PendulumConfig::load(path)?)
    }

    /// Create from a specific configuration.
    ///
    /// # Errors
    ///
    /// Returns error if `config` fails validation.
    pub fn from_config(config: PendulumConfig) -> SimResult<Self> {
        let sim = Simulation::new(&config)?;
        let last = sim.snapshot();
        let commands = render_frame(&last, &config.display);
        let budget = FrameBudget::from_fps(config.display.target_fps);

        Ok(Self {
            sim,
            config,
            paused: false,
            should_quit: false,
            frame_count: 0,
            last,
            commands,
            halted: None,
            budget,
            equilibrium_events: 0,
        })
    }

    /// Reset the simulation to the initial condition.
    pub fn reset(&mut self) {
        self.sim.reset();
        self.last = self.sim.snapshot();
        self.commands = render_frame(&self.last, &self.config.display);
        self.frame_count = 0;
        self.halted = None;
        self.equilibrium_events = 0;
    }

    /// Step once and rebuild the draw list.
    ///
    /// A Jidoka fault halts stepping; the last good frame stays on screen.
    pub fn update(&mut self) {
        if self.paused || self.halted.is_some() {
            return;
        }

        match self.sim.step() {
            Ok(report) => {
                self.equilibrium_events += report.warnings.len() as u64;
                self.last = report.advance;
                self.commands = render_frame(&self.last, &self.config.display);
                self.frame_count += 1;
            }
            Err(e) => {
                tracing::warn!(frame = self.frame_count, error = %e, "simulation halted");
                self.halted = Some(e.to_string());
            }
        }
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Char('r') => self.reset(),
            _ => {}
        }
    }

    /// Handle a key event, including Ctrl-C which raw mode no longer turns
    /// into a signal.
    pub fn handle_key_event(&mut self, event: KeyEvent) {
        if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
            self.should_quit = true;
        } else {
            self.handle_key(event.code);
        }
    }

    /// Numeric readouts of the current frame.
    #[must_use]
    pub const fn readouts(&self) -> Readouts {
        Readouts::from_advance(&self.last)
    }

    /// One-line status: frame, ring cursor, integrator.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!(
            "Frame: {} | Cursor: {}/{} | {}",
            self.frame_count,
            self.sim.ring().cursor(),
            self.sim.ring().capacity(),
            self.sim.integrator().name()
        )
    }
}
