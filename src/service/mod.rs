pub mod gemini;
pub mod stub;
pub mod traits;

pub use gemini::GeminiService;
pub use stub::StubService;
pub use traits::{Conversation, InferenceService, Role, ServiceError, Turn};
