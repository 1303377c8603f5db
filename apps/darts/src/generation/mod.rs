// Content generation: per-segment rewrites of the source content and
// follow-up revisions. All LLM calls go through llm_client.

pub mod personalizer;
pub mod prompts;
