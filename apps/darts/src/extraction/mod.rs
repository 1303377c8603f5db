// Brand and audience-segment extraction.
// Model answers are free text; sections.rs is the only place that knows how
// labelled sections are cut out of them.

pub mod brand;
pub mod prompts;
pub mod sections;
pub mod segments;
