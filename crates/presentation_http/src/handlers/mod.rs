//! HTTP request handlers

pub mod commute;
pub mod health;
