pub mod cli;
pub mod config;
pub mod life;
pub mod report;
