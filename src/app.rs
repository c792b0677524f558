use std::{path::PathBuf, time::Duration};

use crate::{
    config::{ConfigManager, CoremonConfig, MAX_INTERVAL_SECS, MIN_INTERVAL_SECS},
    event::{AppEvent, Event, EventHandler},
    metrics::{MetricsSource, Sampler, SysinfoSource},
    ui::{DashboardWidget, UiState},
};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::*;
use ratatui::{DefaultTerminal, prelude::*};

pub struct App {
    pub running: bool,
    pub events: EventHandler,
    pub config: ConfigManager,
    pub sampler: Sampler,
    source: SysinfoSource,
    pub ui_state: UiState,
}

impl App {
    pub fn new(config_path: PathBuf) -> Result<Self> {
        let events = EventHandler::new(Duration::from_secs(1));
        let config = ConfigManager::new(config_path, events.clone_sender())?;
        let current = config.current();
        events.set_sample_interval(current.interval());
        let source = SysinfoSource::new();
        let sampler = Sampler::new(source.info(), current.capacity);
        Ok(Self {
            running: true,
            events,
            config,
            sampler,
            source,
            ui_state: UiState::default(),
        })
    }

    /// Run the application's main loop.
    ///
    /// A draw failure propagates: a broken display has no recovery path.
    pub async fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let info = self.sampler.info();
        info!(
            target: "App",
            "Monitoring {} ({} cores) every {:.1}s, {} samples of history",
            info.brand,
            info.core_count,
            self.events.sample_interval().as_secs_f64(),
            self.sampler.cpu().capacity()
        );
        // First sample up front so the charts aren't blank for a whole interval.
        self.events.send(AppEvent::SampleRefresh);
        while self.running {
            let interval = self.events.sample_interval();
            terminal.draw(|frame| {
                let mut dashboard = DashboardWidget {
                    ui: &self.ui_state,
                    sampler: &self.sampler,
                    interval,
                };
                dashboard.render(frame.area(), frame.buffer_mut());
            })?;
            match self.events.next().await? {
                Event::Tick => self.tick(),
                Event::Crossterm(event) => match event {
                    crossterm::event::Event::Key(key_event)
                        if key_event.kind == KeyEventKind::Press =>
                    {
                        self.handle_key_events(key_event)?
                    }
                    _ => {}
                },
                Event::App(app_event) => match app_event {
                    AppEvent::Quit => self.quit(),
                    AppEvent::Reload => self.reload_config(),
                    AppEvent::TogglePause => self.toggle_pause(),
                    AppEvent::AdjustInterval(delta) => self.adjust_interval(delta),
                    AppEvent::SampleRefresh => self.sampler.poll(&mut self.source),
                },
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn handle_key_events(&mut self, key_event: KeyEvent) -> Result<()> {
        match key_event.code {
            KeyCode::Esc | KeyCode::Char('q') => self.events.send(AppEvent::Quit),
            KeyCode::Char('c' | 'C') if key_event.modifiers == KeyModifiers::CONTROL => {
                self.events.send(AppEvent::Quit)
            }
            KeyCode::Char(' ' | 'p') => self.events.send(AppEvent::TogglePause),
            KeyCode::Char('+' | '=') => self.events.send(AppEvent::AdjustInterval(0.5)),
            KeyCode::Char('-' | '_') => self.events.send(AppEvent::AdjustInterval(-0.5)),
            KeyCode::Char('r') => self.events.send(AppEvent::Reload),
            KeyCode::Char('d') => self.ui_state.toggle_debug(),
            _ => {}
        }
        Ok(())
    }

    /// Handles the tick event of the terminal: animation only, samples run on
    /// their own cadence.
    fn tick(&mut self) {
        self.ui_state.tick();
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }

    fn toggle_pause(&mut self) {
        self.sampler.toggle_pause();
        if self.sampler.is_paused() {
            info!(target: "App", "Monitoring paused");
        } else {
            info!(target: "App", "Monitoring resumed");
        }
    }

    fn adjust_interval(&mut self, delta: f64) {
        let current = self.events.sample_interval().as_secs_f64();
        let next = (current + delta).clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS);
        self.events
            .set_sample_interval(Duration::from_secs_f64(next));
        info!(target: "App", "Refresh interval set to {:.1}s", next);
    }

    fn reload_config(&mut self) {
        debug!(target: "App", "Reload!");
        match self.config.reload() {
            Ok(config) => self.apply(config),
            Err(e) => error!(target: "App", "{}", e),
        }
    }

    /// Apply a freshly loaded configuration to the running session. History
    /// capacity is fixed per session and only picked up on restart.
    fn apply(&mut self, config: CoremonConfig) {
        let interval = config.interval();
        self.events.set_sample_interval(interval);
        info!(target: "App", "Refresh interval set to {:.1}s", interval.as_secs_f64());
        if config.capacity != self.sampler.cpu().capacity() {
            warn!(target: "App", "History capacity changes take effect on restart");
        }
    }
}
