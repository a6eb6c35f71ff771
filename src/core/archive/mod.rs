pub mod merge;

pub use merge::{merge_into_jar, MergeReport, SourceIssue, SourceWarning};
