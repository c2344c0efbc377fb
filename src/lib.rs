pub mod agent;
pub mod config;
pub mod inventory;
pub mod markdown;
pub mod ollama;
pub mod present;
pub mod prompt;
pub mod title;
