//! Freehand sketch capture, rasterization and intent analysis

pub mod api;
pub mod capture;
pub mod config;
pub mod domain;
pub mod drawing;
pub mod render;
pub mod results;
pub mod session;
