// All LLM prompt constants for the extraction module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Brand profile prompt. Replace `{plain_text_instruction}` and `{document}`.
pub const BRAND_PROMPT_TEMPLATE: &str = r#"Extract the brand and style guidelines from the following document.

Respond with EXACTLY these three sections, in this order, each starting with its label:

1. Brand Voice: (how the brand sounds: tone, personality, words it uses and avoids)
2. Brand Positioning: (who the brand serves and how it stands apart in its market)
3. Unique Value Propositions: (the concrete benefits only this brand offers)

{plain_text_instruction}

Document content:

{document}"#;

/// Segment-name prompt. Replace `{document}`.
pub const SEGMENT_NAMES_PROMPT_TEMPLATE: &str = r#"List only the names of each Dart (audience segment) mentioned in the following document. Do not include any descriptions, characteristics, or psychographic drivers, just list the Dart names as a numbered list, one per line.

Document content:

{document}"#;

/// Per-segment detail prompt. Replace `{segment}`, `{plain_text_instruction}` and `{document}`.
pub const SEGMENT_DETAILS_PROMPT_TEMPLATE: &str = r#"Provide only the characteristics and psychographic drivers for the Dart '{segment}' based on the following document content. Describe this Dart only. Use this format:

Characteristics: (list characteristics here)
Psychographic Drivers: (list psychographic drivers here)

{plain_text_instruction}

Document content:

{document}"#;
