use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Released variants of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Revision {
    /// Arrow keys at 200 px/s; tapping anywhere makes both bodies jump.
    Classic,
    /// Faster run, up key jumps, tapping anywhere still jumps.
    Jump,
    /// On-screen left/right buttons; no tap-anywhere jump.
    #[default]
    Touch,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown revision `{0}` (expected classic, jump or touch)")]
pub struct UnknownRevision(pub String);

impl FromStr for Revision {
    type Err = UnknownRevision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Revision::Classic),
            "jump" => Ok(Revision::Jump),
            "touch" => Ok(Revision::Touch),
            _ => Err(UnknownRevision(s.to_string())),
        }
    }
}

/// Gameplay constants. Missing JSON fields fall back to the `Touch` values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Horizontal speed in px/s while moving left or right.
    pub run_speed: f32,
    /// Vertical velocity applied by a jump. Negative is up.
    pub jump_velocity: f32,
    pub logo_bounce: f32,
    pub text_bounce: f32,
    /// Up arrow jumps.
    pub keyboard_jump: bool,
    /// Any pointer press makes the logo and the text jump.
    pub tap_to_jump: bool,
    /// Show the on-screen left/right buttons.
    pub touch_buttons: bool,
}

impl Tuning {
    pub fn for_revision(revision: Revision) -> Self {
        match revision {
            Revision::Classic => Self {
                run_speed: 200.0,
                jump_velocity: -400.0,
                logo_bounce: 0.8,
                text_bounce: 0.8,
                keyboard_jump: false,
                tap_to_jump: true,
                touch_buttons: false,
            },
            Revision::Jump => Self {
                run_speed: 300.0,
                keyboard_jump: true,
                ..Self::for_revision(Revision::Classic)
            },
            Revision::Touch => Self {
                run_speed: 300.0,
                jump_velocity: -400.0,
                logo_bounce: 0.6,
                text_bounce: 0.9,
                keyboard_jump: true,
                tap_to_jump: false,
                touch_buttons: true,
            },
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::for_revision(Revision::default())
    }
}
