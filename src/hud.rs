//! Text drawn over the level
//!
//! Offsets are relative to the camera's lower-left corner so labels stay put
//! on screen while the level scrolls.

use glam::Vec2;

use crate::render::{Anchor, TextItem};
use crate::tuning::Tuning;

const LABEL_FONT_SIZE: f32 = 16.0;
const LABEL_FLASH_FONT_SIZE: f32 = 20.0;
const MESSAGE_FONT_SIZE: f32 = 20.0;

/// How long the power label stays enlarged after a pickup
pub const PICKUP_FLASH_SECONDS: f32 = 0.5;

pub const POWER_LABEL_FORMAT: &str = "Power Expiry: {value}";
pub const NOT_ENOUGH_POWER_FORMAT: &str =
    "You do not have any power. Power is required to pass this level!{value}";

fn format_value(format: &str, value: &str) -> String {
    format.replace("{value}", value)
}

/// Right-anchored label that can briefly grow to draw attention
#[derive(Debug, Clone)]
pub struct Label {
    format: String,
    text: String,
    offset: Vec2,
    font_size: f32,
    flash_duration_left: f32,
}

impl Label {
    pub fn new(format: &str, initial_value: &str, offset: Vec2) -> Self {
        Self {
            format: format.to_string(),
            text: format_value(format, initial_value),
            offset,
            font_size: LABEL_FONT_SIZE,
            flash_duration_left: 0.0,
        }
    }

    pub fn set_value(&mut self, value: &str) {
        self.text = format_value(&self.format, value);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Enlarge the label; it shrinks back over `duration` seconds
    pub fn flash(&mut self, duration: f32) {
        self.flash_duration_left = duration;
        self.font_size = LABEL_FLASH_FONT_SIZE;
    }

    pub fn update(&mut self, delta_time: f32) {
        if self.flash_duration_left <= 0.0 {
            return;
        }
        let ratio_left = delta_time / self.flash_duration_left;
        let to_change = ((self.font_size - LABEL_FONT_SIZE) * ratio_left).abs();
        if ratio_left >= 1.0 || self.font_size - to_change <= LABEL_FONT_SIZE {
            self.font_size = LABEL_FONT_SIZE;
            self.flash_duration_left = 0.0;
            return;
        }
        self.flash_duration_left -= delta_time;
        self.font_size -= to_change;
    }

    pub fn text_item(&self, view_left: i32, view_bottom: i32) -> TextItem {
        let origin = Vec2::new(view_left as f32, view_bottom as f32);
        TextItem::new(self.text.clone(), origin + self.offset, self.font_size, Anchor::Right)
    }
}

/// Message shown for a fixed time after `show`
#[derive(Debug, Clone)]
pub struct EphemeralLabel {
    format: String,
    text: String,
    offset: Vec2,
    duration: f32,
    remaining: f32,
}

impl EphemeralLabel {
    pub fn new(format: &str, offset: Vec2, duration: f32) -> Self {
        Self {
            format: format.to_string(),
            text: format_value(format, ""),
            offset,
            duration,
            remaining: 0.0,
        }
    }

    pub fn show(&mut self, value: &str) {
        self.text = format_value(&self.format, value);
        self.remaining = self.duration;
    }

    pub fn hide(&mut self) {
        self.remaining = 0.0;
    }

    pub fn is_visible(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn update(&mut self, delta_time: f32) {
        self.remaining = (self.remaining - delta_time).max(0.0);
    }

    pub fn text_item(&self, view_left: i32, view_bottom: i32) -> Option<TextItem> {
        if !self.is_visible() {
            return None;
        }
        let origin = Vec2::new(view_left as f32, view_bottom as f32);
        Some(TextItem::new(
            self.text.clone(),
            origin + self.offset,
            MESSAGE_FONT_SIZE,
            Anchor::Center,
        ))
    }
}

/// Labels of a level session
#[derive(Debug, Clone)]
pub struct Hud {
    pub power: Label,
    pub not_enough_power: EphemeralLabel,
}

impl Hud {
    pub fn new(tuning: &Tuning, initial_power: &str) -> Self {
        let world = &tuning.world;
        Self {
            power: Label::new(
                POWER_LABEL_FORMAT,
                initial_power,
                Vec2::new(world.width - 50.0, world.height - 35.0),
            ),
            not_enough_power: EphemeralLabel::new(
                NOT_ENOUGH_POWER_FORMAT,
                Vec2::new((world.width / 2.0).floor(), (world.height / 2.0).floor()),
                tuning.not_enough_power_seconds,
            ),
        }
    }

    pub fn update(&mut self, delta_time: f32) {
        self.power.update(delta_time);
        self.not_enough_power.update(delta_time);
    }

    /// Text for this frame, power label first
    pub fn items(&self, view_left: i32, view_bottom: i32) -> Vec<TextItem> {
        let mut items = vec![self.power.text_item(view_left, view_bottom)];
        items.extend(self.not_enough_power.text_item(view_left, view_bottom));
        items
    }
}
