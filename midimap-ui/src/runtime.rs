//! App runtime: the single-threaded poll loop.
//!
//! One pass polls the terminal for key input (short timeout, no data means
//! continue), drains hardware MIDI, fires the demo tick, expires the LED,
//! and re-renders when something changed.

use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use midimap_core::command::Command;
use midimap_core::config::Config;
use midimap_core::session::{CommandOutcome, ResolvedEvent, Session};
use midimap_types::MidiEvent;

use crate::demo::{DemoGenerator, DEMO_PERIOD};
use crate::midi_input::MidiInputManager;
use crate::ui;

/// Indicator stays lit this long after an event.
const LED_DURATION: Duration = Duration::from_millis(150);
const POLL_TIMEOUT: Duration = Duration::from_millis(16);
const LOG_CAP: usize = 64;

pub struct AppRuntime {
    pub(crate) session: Session,
    pub(crate) midi_input: MidiInputManager,
    pub(crate) input: String,
    pub(crate) log: Vec<String>,
    pub(crate) last_resolved: Option<ResolvedEvent>,
    led_on_at: Option<Instant>,
    demo: DemoGenerator,
    last_demo_tick: Instant,
    render_needed: bool,
}

impl AppRuntime {
    pub fn new(config: Config) -> Self {
        let mut session = Session::new(config);
        let mut log = Vec::new();

        // Startup and `loadmap` share one path
        log.extend(session.execute(Command::LoadMap).lines);

        let mut midi_input = MidiInputManager::new();
        midi_input.refresh_ports();
        if !midi_input.list_ports().is_empty() {
            match midi_input.connect(0) {
                Ok(()) => {
                    if let Some(name) = midi_input.connected_port_name() {
                        log.push(format!("midi in: {}", name));
                    }
                }
                Err(e) => log::warn!(target: "midi", "could not connect input: {}", e),
            }
        }
        log.push("type 'help' for commands".to_string());

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
            | 1;

        Self {
            session,
            midi_input,
            input: String::new(),
            log,
            last_resolved: None,
            led_on_at: None,
            demo: DemoGenerator::new(seed),
            last_demo_tick: Instant::now(),
            render_needed: true,
        }
    }

    /// Main event loop. Returns when the user quits (Esc or Ctrl-C).
    pub fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        loop {
            if self.process_events()? {
                break;
            }
            self.drain_midi_events();
            self.demo_tick();
            self.update_led();
            self.maybe_render(terminal)?;
        }
        Ok(())
    }

    pub(crate) fn led_is_on(&self) -> bool {
        self.led_on_at.is_some()
    }

    /// Poll for one key event. Returns true if the app should quit.
    fn process_events(&mut self) -> io::Result<bool> {
        if !event::poll(POLL_TIMEOUT)? {
            return Ok(false);
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(true)
                }
                KeyCode::Esc => return Ok(true),
                KeyCode::Enter => self.submit_line(),
                KeyCode::Backspace => {
                    self.input.pop();
                    self.render_needed = true;
                }
                KeyCode::Char(c) => {
                    self.input.push(c);
                    self.render_needed = true;
                }
                _ => {}
            },
            Event::Resize(_, _) => self.render_needed = true,
            _ => {}
        }
        Ok(false)
    }

    fn submit_line(&mut self) {
        let line = std::mem::take(&mut self.input);
        let line = line.trim().to_string();
        self.render_needed = true;
        if line.is_empty() {
            return;
        }
        self.push_log(format!("> {}", line));
        match Command::parse(&line) {
            Ok(command) => {
                let outcome = self.session.execute(command);
                self.apply_outcome(outcome);
            }
            Err(e) => self.push_log(e.to_string()),
        }
    }

    /// Feed a demo or hardware event through the same path as a typed
    /// command.
    fn inject_event(&mut self, origin: &str, event: MidiEvent) {
        self.push_log(format!("{}: {}", origin, event.label()));
        let outcome = self.session.execute(Command::Send(event));
        self.apply_outcome(outcome);
    }

    fn apply_outcome(&mut self, outcome: CommandOutcome) {
        for line in outcome.lines {
            self.push_log(line);
        }
        if let Some(resolved) = outcome.resolved {
            self.last_resolved = Some(resolved);
            self.led_on_at = Some(Instant::now());
        }
        self.render_needed = true;
    }

    fn drain_midi_events(&mut self) {
        while let Some(event) = self.midi_input.poll_event() {
            self.inject_event("midi", event);
        }
    }

    fn demo_tick(&mut self) {
        if !self.session.mode.demo_enabled {
            return;
        }
        if self.last_demo_tick.elapsed() < DEMO_PERIOD {
            return;
        }
        self.last_demo_tick = Instant::now();
        let event = self.demo.next_event();
        self.inject_event("demo", event);
    }

    fn update_led(&mut self) {
        if let Some(on_at) = self.led_on_at {
            if on_at.elapsed() >= LED_DURATION {
                self.led_on_at = None;
                self.render_needed = true;
            }
        }
    }

    fn maybe_render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        if !self.render_needed {
            return Ok(());
        }
        self.render_needed = false;
        terminal.draw(|frame| ui::draw(frame, self))?;
        Ok(())
    }

    fn push_log(&mut self, line: String) {
        self.log.push(line);
        if self.log.len() > LOG_CAP {
            self.log.remove(0);
        }
    }
}
