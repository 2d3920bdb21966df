pub mod id_integrity;
pub mod predicates;
pub mod record_validator;
pub mod report_writer;
pub mod warn_writer;

pub use id_integrity::{check_integrity, IntegrityReport};
pub use predicates::{Predicate, PredicateRules};
pub use record_validator::{PredicateStat, RecordValidator, SourceStats};
pub use report_writer::ReportWriter;
pub use warn_writer::WarnWriter;
