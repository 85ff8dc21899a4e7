//! Saved-search alerts and engagement tracking for a room-rental marketplace.

pub mod config;
pub mod engine;
pub mod models;
pub mod sources;
pub mod storage;

pub use config::Config;
pub use engine::NotificationEngine;
