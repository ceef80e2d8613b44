pub mod gemini;
pub mod question;
pub mod relay;

pub use gemini::{GeminiCandidate, GeminiContent, GeminiPart, GeminiRequest, GeminiResponse, InlineData};
pub use question::{AnswerOption, Question};
pub use relay::RelayResponse;
