// Session state for the interactive pipeline.
// Each session is an explicit context object; the store only hands them out.

pub mod handlers;
pub mod pipeline;
pub mod store;
