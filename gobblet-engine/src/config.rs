//! Engine settings.

use serde::{Deserialize, Serialize};

use crate::Color;

/// Settings fixed for the lifetime of an engine, reapplied on every reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Color that moves first after a reset.
    pub starting_color: Color,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_color: Color::A,
        }
    }
}

impl EngineConfig {
    /// Use a different first player.
    pub fn with_starting_color(mut self, color: Color) -> Self {
        self.starting_color = color;
        self
    }
}
