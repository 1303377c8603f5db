// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to prompts whose answer is parsed line by line or shown verbatim.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
    Respond in plain text only. \
    Do NOT use markdown headings, bold or italics. \
    Do NOT add introductions, explanations or closing remarks.";

/// Fills `{name}` placeholders in one pass over `template`.
///
/// Substituted values are copied verbatim and never re-scanned, so text that
/// itself contains `{...}` tokens comes through unchanged. Unknown
/// placeholders are left as written.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let value = tail.find('}').and_then(|close| {
            let name = &tail[1..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
