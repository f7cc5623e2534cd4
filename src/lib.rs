//! Cleaning pipeline and view logic behind the jobscope dashboard.

pub mod config;
pub mod data;
pub mod error;
