pub mod bulk_transform;
pub mod renumber;

pub use bulk_transform::{BulkTransform, DropMatching, Edit, TransformRule, TransformSummary};
pub use renumber::{renumber, IdScheme};
