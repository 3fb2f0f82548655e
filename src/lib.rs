pub mod config;
pub mod contracts;
pub mod error;
pub mod harness;
pub mod pipelines;
pub mod prompts;
pub mod scenario;
pub mod service;

pub use error::{HarnessError, Result, Stage};

// Load env from a simple, standardized location resolution.
// This uses dotenvy::dotenv().ok() which loads .env if present and silently ignores if missing.
pub fn load_env() {
    let _ = dotenvy::dotenv();
}
