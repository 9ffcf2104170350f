mod app;
mod cli;
mod config;
mod logging;
mod terminal;

pub use app::run_app;
