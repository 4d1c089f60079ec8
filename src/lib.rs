//! Orbit Crucible - 2D N-body gravity sandbox
//!
//! A library crate providing the gravity core (force resolution, stability
//! governor, trajectory prediction) and the Bevy plugins built on it.

pub mod camera;
pub mod config;
pub mod diagnostics;
pub mod input;
pub mod launch;
pub mod physics;
pub mod prediction;
pub mod registry;
pub mod render;
pub mod scenarios;
pub mod types;

#[cfg(test)]
pub mod test_utils;
