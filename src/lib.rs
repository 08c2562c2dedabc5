#![forbid(unsafe_code)]

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod date;
pub mod detail;
pub mod error;
pub mod field;
pub mod listing;
pub mod logging;
pub mod model;
pub mod pages;
pub mod site;
pub mod source;
