pub mod extractor;
pub mod prompt;
pub mod response_parser;

pub use extractor::{extractor_from_config, GeminiExtractor, QuestionExtractor, RelayExtractor};
pub use response_parser::{first_candidate_text, parse_questions, strip_code_fences};
