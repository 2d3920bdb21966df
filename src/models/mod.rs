pub mod loaders;
pub mod question;
pub mod schema;

pub use loaders::{discover_sources, load_jsonl_source, save_jsonl_atomic, LoadOutcome};
pub use question::{Answer, Choices, CodeBlock, Meta, QuestionRecord};
