pub mod annotator;
pub mod autofix;
pub mod comment;
pub mod config;
pub mod context;
pub mod github;
pub mod inputs;
pub mod labels;
pub mod models;
pub mod outputs;
pub mod package_manager;
pub mod platform;
