//! Command handlers

pub mod auth;
pub mod config;
pub mod driver;
pub mod pod;
pub mod status;
