pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{load_seeds_from_file, load_seeds_from_source, parse_url_line};
