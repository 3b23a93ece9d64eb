//! CLI command implementations.

pub mod common;
pub mod config;
pub mod dynamics;
pub mod envelope;
pub mod generate;
pub mod info;
pub mod metrics;
pub mod pitch;
pub mod spectrogram;
pub mod spectrum;
