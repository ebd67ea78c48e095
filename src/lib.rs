pub mod client;
pub mod commands;
pub mod config;
pub mod events;
pub mod export;
pub mod i18n;
pub mod monitor;
pub mod state;
pub mod ui;
