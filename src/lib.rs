pub mod agent;
pub mod catalog;
pub mod config;
pub mod content;
pub mod pipeline;
pub mod services;
