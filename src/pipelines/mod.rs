pub mod contract;
pub mod vibe;

pub use contract::ContractRun;
pub use vibe::VibeRun;
