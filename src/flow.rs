//! Screens around the gameplay
//!
//! `Game` owns the level session and decides which screen receives input,
//! updates and draw calls. Clicks advance every screen that is not gameplay.

use glam::Vec2;

use crate::error::LevelError;
use crate::input::Key;
use crate::level::LevelSource;
use crate::render::{Anchor, SceneSink, TextItem};
use crate::sim::session::{LevelSession, SessionEvent};
use crate::tuning::Tuning;

const TITLE_FONT_SIZE: f32 = 50.0;
const TEXT_FONT_SIZE: f32 = 20.0;

pub const COMMUNICATOR_MESSAGE: &str = "Found a communicator, attempting to contact base...";
pub const SIGNAL_MESSAGE: &str = "Got a signal! Looks like they're on their way";

/// Draws a custom instruction page
pub type PageRenderer = Box<dyn Fn(&mut dyn SceneSink)>;

/// Body of an instruction page
pub enum PageContent {
    StaticText(String),
    Custom(PageRenderer),
}

impl std::fmt::Debug for PageContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageContent::StaticText(text) => f.debug_tuple("StaticText").field(text).finish(),
            PageContent::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

pub fn default_instruction_pages() -> Vec<PageContent> {
    vec![PageContent::StaticText(
        "The aim is to collect as many batteries as possible".to_string(),
    )]
}

/// End screen whose message changes as time passes
#[derive(Debug, Clone, PartialEq)]
pub struct VictoryScreen {
    clock: f32,
    time_scale: f32,
    message: &'static str,
}

impl VictoryScreen {
    pub fn new(time_scale: f32) -> Self {
        Self {
            clock: 0.0,
            time_scale,
            message: "",
        }
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn update(&mut self, delta_time: f32) {
        self.clock += delta_time * self.time_scale;
        if self.clock > 0.5 && self.clock < 2.0 {
            self.message = COMMUNICATOR_MESSAGE;
        } else if self.clock > 2.0 {
            self.message = SIGNAL_MESSAGE;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Instructions { page: usize },
    Playing,
    /// Remembers the level so a retry resumes it
    GameOver { level: u32 },
    Victory(VictoryScreen),
    /// A level could not be loaded; clicking tries it again
    LoadError { level: u32, message: String },
}

pub struct Game {
    session: LevelSession,
    screen: Screen,
    pages: Vec<PageContent>,
    width: f32,
    height: f32,
}

impl Game {
    pub fn new(tuning: &Tuning, source: Box<dyn LevelSource>) -> Self {
        Self {
            session: LevelSession::new(tuning, source),
            screen: Screen::Instructions { page: 0 },
            pages: default_instruction_pages(),
            width: tuning.world.width,
            height: tuning.world.height,
        }
    }

    pub fn with_pages(mut self, pages: Vec<PageContent>) -> Self {
        self.pages = pages;
        self
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn session(&self) -> &LevelSession {
        &self.session
    }

    /// Pointer click: advance whatever non-gameplay screen is showing
    pub fn click(&mut self) -> Result<(), LevelError> {
        match self.screen.clone() {
            Screen::Instructions { page } if page + 1 < self.pages.len() => {
                self.screen = Screen::Instructions { page: page + 1 };
            }
            Screen::Instructions { .. } => {
                let start = self.session.tuning().levels.start_level;
                self.session.set_level(start);
                self.play()?;
            }
            Screen::Playing => {}
            Screen::GameOver { level } | Screen::LoadError { level, .. } => {
                self.session.set_level(level);
                self.play()?;
            }
            // The session already reset its level counter when the game was won
            Screen::Victory(_) => self.play()?,
        }
        Ok(())
    }

    fn play(&mut self) -> Result<(), LevelError> {
        match self.session.setup() {
            Ok(()) => {
                self.screen = Screen::Playing;
                Ok(())
            }
            Err(err) => {
                // Stay on the instructions; any later screen shows the message instead
                if !matches!(self.screen, Screen::Instructions { .. }) {
                    self.screen = Screen::LoadError {
                        level: self.session.level(),
                        message: err.to_string(),
                    };
                }
                Err(err)
            }
        }
    }

    pub fn key_press(&mut self, key: Key) {
        if self.screen == Screen::Playing {
            self.session.key_press(key);
        }
    }

    pub fn key_release(&mut self, key: Key) {
        if self.screen == Screen::Playing {
            self.session.key_release(key);
        }
    }

    /// Advance the active screen; returns the session events of this frame
    pub fn update(&mut self, delta_time: f32) -> Vec<SessionEvent> {
        match &mut self.screen {
            Screen::Playing => {}
            Screen::Victory(victory) => {
                victory.update(delta_time);
                return Vec::new();
            }
            Screen::Instructions { .. } | Screen::GameOver { .. } | Screen::LoadError { .. } => {
                return Vec::new();
            }
        }

        self.session.update(delta_time);
        let events = self.session.drain_events();
        for event in &events {
            match event {
                SessionEvent::Died { level } => {
                    self.screen = Screen::GameOver { level: *level };
                }
                SessionEvent::GameWon => {
                    let time_scale = self.session.tuning().time_scale;
                    self.screen = Screen::Victory(VictoryScreen::new(time_scale));
                }
                SessionEvent::LoadFailed { level, message } => {
                    self.screen = Screen::LoadError {
                        level: *level,
                        message: message.clone(),
                    };
                }
                _ => {}
            }
        }
        events
    }

    pub fn draw(&self, sink: &mut dyn SceneSink) {
        if self.screen == Screen::Playing {
            self.session.render(sink);
            return;
        }

        sink.begin_frame(0, 0);
        let center = Vec2::new(self.width / 2.0, self.height / 2.0);

        match &self.screen {
            Screen::Instructions { page } => {
                text(sink, "Instructions Screen", center, TITLE_FONT_SIZE);
                match self.pages.get(*page) {
                    Some(PageContent::StaticText(body)) => {
                        text(sink, body, center - Vec2::new(0.0, 40.0), TEXT_FONT_SIZE);
                    }
                    Some(PageContent::Custom(draw)) => draw(sink),
                    None => {}
                }
                text(sink, "Click to advance", center - Vec2::new(0.0, 75.0), TEXT_FONT_SIZE);
            }
            Screen::GameOver { .. } => {
                text(sink, "Game Over", center, TITLE_FONT_SIZE);
                let bottom = Vec2::new(center.x, self.height - 75.0);
                text(sink, "Click to restart", bottom, TEXT_FONT_SIZE);
            }
            Screen::Victory(victory) => {
                text(sink, "You won!", center, TITLE_FONT_SIZE);
                text(sink, victory.message(), center - Vec2::new(0.0, 100.0), TEXT_FONT_SIZE);
                let bottom = Vec2::new(center.x, self.height - 75.0);
                text(sink, "Click to play again", bottom, TEXT_FONT_SIZE);
            }
            Screen::LoadError { level, message } => {
                text(sink, &format!("Level {level} failed to load"), center, TITLE_FONT_SIZE);
                text(sink, message, center - Vec2::new(0.0, 40.0), TEXT_FONT_SIZE);
                let bottom = Vec2::new(center.x, self.height - 75.0);
                text(sink, "Click to retry", bottom, TEXT_FONT_SIZE);
            }
            Screen::Playing => {}
        }
        sink.end_frame();
    }
}

fn text(sink: &mut dyn SceneSink, text: &str, position: Vec2, size: f32) {
    sink.draw_text(&TextItem::new(text, position, size, Anchor::Center));
}
