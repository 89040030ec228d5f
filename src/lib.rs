pub mod agent;
pub mod cli;
pub mod config;
pub mod crew;
pub mod error;
pub mod planner;
pub mod run_log;
pub mod tools;
pub mod web;
