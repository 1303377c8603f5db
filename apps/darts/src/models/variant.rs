use chrono::{DateTime, Utc};
use serde::Serialize;

/// Text to personalize. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceContent {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    Generated,
    Revised,
}

/// Personalized text for one segment. A revision replaces the generated
/// variant for the same segment; the earlier text is not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub segment: String,
    pub kind: VariantKind,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Variant {
    pub fn generated(segment: String, text: String) -> Self {
        Self {
            segment,
            kind: VariantKind::Generated,
            text,
            revision_instructions: None,
            created_at: Utc::now(),
        }
    }

    pub fn revised(segment: String, instructions: String, text: String) -> Self {
        Self {
            segment,
            kind: VariantKind::Revised,
            text,
            revision_instructions: Some(instructions),
            created_at: Utc::now(),
        }
    }

    /// Download name: spaces become underscores, suffix follows the kind.
    /// Quotes, backslashes and control characters are dropped so the name is
    /// safe inside a quoted `Content-Disposition` filename.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .segment
            .chars()
            .filter(|c| !matches!(*c, '"' | '\\') && !c.is_control())
            .map(|c| if c == ' ' { '_' } else { c })
            .collect();
        match self.kind {
            VariantKind::Generated => format!("{stem}_content.txt"),
            VariantKind::Revised => format!("{stem}_revised.txt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_for_generated_variant() {
        let v = Variant::generated("Weekend Warrior".to_string(), "text".to_string());
        assert_eq!(v.file_name(), "Weekend_Warrior_content.txt");
    }

    #[test]
    fn test_file_name_for_revised_variant() {
        let v = Variant::revised(
            "Weekend Warrior".to_string(),
            "shorter".to_string(),
            "text".to_string(),
        );
        assert_eq!(v.file_name(), "Weekend_Warrior_revised.txt");
        assert_eq!(v.revision_instructions.as_deref(), Some("shorter"));
    }

    #[test]
    fn test_file_name_drops_header_breaking_characters() {
        let v = Variant::generated("The \"Bold\" One\\\r\n".to_string(), "text".to_string());
        assert_eq!(v.file_name(), "The_Bold_One_content.txt");
    }

    #[test]
    fn test_generated_variant_omits_instructions_in_json() {
        let v = Variant::generated("A".to_string(), "text".to_string());
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["kind"], "generated");
        assert!(json.get("revision_instructions").is_none());
    }
}
