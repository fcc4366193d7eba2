//! Default identity generation for newly joined participants.

use rand::Rng;

use super::value_object::{Color, DisplayName};

/// Prefix of generated default names (`Player1234`).
pub const DEFAULT_NAME_PREFIX: &str = "Player";

/// Source of default names and colours.
///
/// Collisions are allowed: two participants may draw the same default name.
pub trait IdentityGenerator: Send + Sync {
    fn display_name(&self) -> DisplayName;
    fn color(&self) -> Color;
}

/// Random defaults: `Player` + 1000..=9999, pastel colours (each channel 128..=255).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdentityGenerator;

impl IdentityGenerator for RandomIdentityGenerator {
    fn display_name(&self) -> DisplayName {
        let suffix: u16 = rand::rng().random_range(1000..=9999);
        DisplayName::generated(format!("{DEFAULT_NAME_PREFIX}{suffix}"))
    }

    fn color(&self) -> Color {
        let mut rng = rand::rng();
        Color::rgb(
            rng.random_range(128..=255),
            rng.random_range(128..=255),
            rng.random_range(128..=255),
        )
    }
}

/// Always hands out the same identity. Used in tests.
#[derive(Debug, Clone)]
pub struct FixedIdentityGenerator {
    name: DisplayName,
    color: Color,
}

impl FixedIdentityGenerator {
    pub fn new(name: DisplayName, color: Color) -> Self {
        Self { name, color }
    }
}

impl IdentityGenerator for FixedIdentityGenerator {
    fn display_name(&self) -> DisplayName {
        self.name.clone()
    }

    fn color(&self) -> Color {
        self.color
    }
}
