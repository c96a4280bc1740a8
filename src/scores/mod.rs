// Public API - what other modules can use
pub use handlers::record_score;
pub use recorder::ScoreRecorder;

// Internal modules
mod handlers;
pub mod models;
pub mod recorder;
pub mod repository;
pub mod types;
