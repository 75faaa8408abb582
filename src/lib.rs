pub mod api;
pub mod calendar;
pub mod config;
pub mod controllers;
pub mod events;
pub mod notify;
pub mod state;
pub mod types;
pub mod ui;
pub mod views;
