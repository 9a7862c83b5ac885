pub mod aggregation;
pub mod extraction;
pub mod handlers;
pub mod insights;
pub mod json_recovery;
pub mod normalize;
pub mod prompts;
pub mod recommendation;
pub mod redaction;
pub mod taxonomy;
