pub mod config;
pub mod queue;
pub mod review;
pub mod ui;
