//! Discord translation bot: per-guild target languages, source detection with
//! a CJK heuristic, and fail-open translation dispatch.

pub mod commands;
pub mod config;
pub mod detection;
pub mod discord;
pub mod embed;
pub mod google;
pub mod languages;
pub mod provider;
pub mod settings;
pub mod state;
pub mod strings;
pub mod translation;
