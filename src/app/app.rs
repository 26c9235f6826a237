use std::{
    io,
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};

use crate::{
    api::MarketClient,
    app::{
        config::Config,
        cycle::{CycleBundle, run_cycle},
        fallback::FallbackQuoteGenerator,
        ui,
    },
};

const INPUT_POLL: Duration = Duration::from_millis(200);

pub struct App {
    config: Config,
    client: MarketClient,
    generator: FallbackQuoteGenerator,
    bundle: Option<CycleBundle>,
    last_refresh: Option<Instant>,
    paused: bool,
    popup_message: Option<String>,
    error_popup: Option<String>,
}

impl App {
    pub fn new(config: Config, client: MarketClient) -> Self {
        let generator = FallbackQuoteGenerator::new(config.fallback_seed);
        Self {
            config,
            client,
            generator,
            bundle: None,
            last_refresh: None,
            paused: false,
            popup_message: None,
            error_popup: None,
        }
    }

    fn show_popup(&mut self, message: &str) {
        self.popup_message = Some(message.to_string());
    }

    fn clear_popup(&mut self) {
        self.popup_message = None;
    }

    fn show_error_popup(&mut self, message: &str) {
        self.error_popup = Some(message.to_string());
    }

    fn clear_error_popup(&mut self) {
        self.error_popup = None;
    }

    fn refresh_due(&self) -> bool {
        if self.paused {
            return false;
        }
        self.last_refresh
            .is_none_or(|at| at.elapsed() >= self.config.refresh_interval)
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_app(&mut terminal).await;

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|frame| {
            ui::render(
                frame,
                self.bundle.as_ref(),
                &self.config,
                self.paused,
                &self.popup_message,
                &self.error_popup,
            )
        })?;
        Ok(())
    }

    async fn refresh<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.show_popup("Fetching market data...");
        self.draw(terminal)?;

        let result = run_cycle(&self.config, &self.client, &mut self.generator).await;
        self.last_refresh = Some(Instant::now());
        self.clear_popup();

        match result {
            Ok(bundle) => self.bundle = Some(bundle),
            Err(e) => self.show_error_popup(&format!("Cannot refresh: {}", e)),
        }
        Ok(())
    }

    async fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            if self.refresh_due() {
                self.refresh(terminal).await?;
            }
            self.draw(terminal)?;

            if !event::poll(INPUT_POLL)? {
                continue;
            }

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Enter | KeyCode::Esc => self.clear_error_popup(),
                    KeyCode::Char('r') => {
                        self.clear_error_popup();
                        self.refresh(terminal).await?;
                    }
                    KeyCode::Char('p') => {
                        self.paused = !self.paused;
                        log::info!(
                            "Auto-refresh {}",
                            if self.paused { "paused" } else { "resumed" }
                        );
                    }
                    _ => {}
                }
            }
        }
    }
}
