//! sonic-forge library - batch passes over a music folder and the shell that drives them.

pub mod config;
pub mod context;
pub mod error;
pub mod metadata;
pub mod models;
pub mod passes;
pub mod pipeline;
pub mod progress;
pub mod safety;
pub mod sanitize;
pub mod services;
pub mod shell;
pub mod tools;

#[cfg(test)]
mod testing;
