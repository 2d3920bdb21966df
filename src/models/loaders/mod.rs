pub mod jsonl_loader;
pub mod jsonl_writer;

pub use jsonl_loader::{discover_sources, load_jsonl_source, parse_jsonl, LoadOutcome};
pub use jsonl_writer::{save_jsonl_atomic, to_jsonl};
