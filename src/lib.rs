pub mod catalog;
pub mod config;
pub mod history;
pub mod output;
pub mod scoring;
pub mod selection;
pub mod telemetry;
