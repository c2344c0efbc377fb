//! Endpoint and model configuration plus the fixed inventory limits.

use std::env;

// Endpoint and model are overridable through the environment (a local .env
// is loaded by main before these are first read).
lazy_static::lazy_static! {
    pub static ref OLLAMA_URL: String =
        env::var("OLLAMA_URL").unwrap_or_else(|_| "http://127.0.0.1:11434".to_string());
    pub static ref CHAT_MODEL: String =
        env::var("DIRSAGE_MODEL").unwrap_or_else(|_| "qwen2.5".to_string());
}

/// Files larger than this are listed but never opened.
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// How many characters of a text file get inlined into the inventory.
pub const EXCERPT_LIMIT: usize = 1000;

/// Length cap for the deterministic fallback title.
pub const TITLE_LIMIT: usize = 30;

/// Extensions treated as text without consulting the MIME guess.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "py", "js", "rs", "toml", "html", "css", "json", "yaml", "yml", "ini", "conf",
];

/// Used when the CLI is invoked without a question.
pub const DEFAULT_QUERY: &str =
    "Give me a one line summary of the current directory, with relevant file contents";
