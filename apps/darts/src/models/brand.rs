use serde::Serialize;

/// Placeholder used wherever an extraction yields no content.
pub const SENTINEL: &str = "No information available.";

/// Replaces an empty (after trimming) value with the sentinel.
pub fn or_sentinel(value: String) -> String {
    if value.trim().is_empty() {
        SENTINEL.to_string()
    } else {
        value
    }
}

/// The three-attribute summary of a brand guide.
///
/// Built once per upload or manual-entry event and never edited afterwards.
/// Every attribute is non-empty: missing values hold `SENTINEL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandProfile {
    voice: String,
    positioning: String,
    unique_value_propositions: String,
}

impl BrandProfile {
    pub fn new(voice: String, positioning: String, unique_value_propositions: String) -> Self {
        Self {
            voice: or_sentinel(voice),
            positioning: or_sentinel(positioning),
            unique_value_propositions: or_sentinel(unique_value_propositions),
        }
    }

    /// A profile with every attribute set to the sentinel.
    pub fn unavailable() -> Self {
        Self::new(String::new(), String::new(), String::new())
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    pub fn positioning(&self) -> &str {
        &self.positioning
    }

    pub fn unique_value_propositions(&self) -> &str {
        &self.unique_value_propositions
    }
}
