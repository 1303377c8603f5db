// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Personalization prompt.
/// Replace: {characteristics}, {voice}, {positioning}, {value_propositions},
///          {plain_text_instruction}, {content}
pub const PERSONALIZE_PROMPT_TEMPLATE: &str = r#"Rewrite the following content to appeal to an audience with these characteristics:

{characteristics}

Apply the following brand guidelines:

Brand Voice: {voice}
Brand Positioning: {positioning}
Unique Value Propositions: {value_propositions}

Keep the purpose, structure and calls to action of the original. Return only the rewritten content.

{plain_text_instruction}

Here is the original content:

{content}"#;
