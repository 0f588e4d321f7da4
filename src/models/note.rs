use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the caseworker interacted with the client for a given note.
/// Wire names match the server's choice list exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionType {
    Phone,
    InPerson,
    Email,
    Video,
    Other,
}

impl InteractionType {
    pub const ALL: [InteractionType; 5] = [
        InteractionType::Phone,
        InteractionType::InPerson,
        InteractionType::Email,
        InteractionType::Video,
        InteractionType::Other,
    ];

    /// Wire value, e.g. "in-person"
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Phone => "phone",
            InteractionType::InPerson => "in-person",
            InteractionType::Email => "email",
            InteractionType::Video => "video",
            InteractionType::Other => "other",
        }
    }

    /// Display label, e.g. "In-Person Meeting"
    pub fn label(&self) -> &'static str {
        match self {
            InteractionType::Phone => "Phone Call",
            InteractionType::InPerson => "In-Person Meeting",
            InteractionType::Email => "Email",
            InteractionType::Video => "Video Call",
            InteractionType::Other => "Other",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InteractionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InteractionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = InteractionType::ALL.iter().map(|t| t.as_str()).collect();
                format!(
                    "Unknown interaction type '{}'. Must be one of: {}",
                    s,
                    valid.join(", ")
                )
            })
    }
}

/// Who authored a case note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteAuthor {
    pub id: String,
    pub name: String,
}

/// A case note as returned by the notes listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseNote {
    pub id: String,
    pub content: String,
    pub interaction_type: InteractionType,
    /// ISO 8601 timestamp, server-formatted
    pub created_at: String,
    pub created_by: NoteAuthor,
}

/// Payload for creating a new case note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseNoteCreateRequest {
    pub client_id: String,
    pub content: String,
    pub interaction_type: InteractionType,
}

/// Server acknowledgement for a created note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseNoteCreated {
    pub id: String,
    pub created_at: String,
    pub success: bool,
}

/// Wrapper shape for the notes listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseNotesListResponse {
    pub case_notes: Vec<CaseNote>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&InteractionType::InPerson).expect("serialize"),
            "\"in-person\""
        );
        assert_eq!(
            serde_json::from_str::<InteractionType>("\"phone\"").expect("deserialize"),
            InteractionType::Phone
        );
    }

    #[test]
    fn test_interaction_type_from_str() {
        assert_eq!(
            "in-person".parse::<InteractionType>(),
            Ok(InteractionType::InPerson)
        );
        assert!("fax".parse::<InteractionType>().is_err());
    }

    #[test]
    fn test_parse_case_notes_list() {
        let json = r#"{
            "case_notes": [
                {
                    "id": "n1",
                    "content": "Discussed housing application status.",
                    "interaction_type": "phone",
                    "created_at": "2025-03-14T10:22:00+00:00",
                    "created_by": {"id": "u1", "name": "Alice Smith"}
                }
            ]
        }"#;
        let parsed: CaseNotesListResponse =
            serde_json::from_str(json).expect("Failed to parse notes list");
        assert_eq!(parsed.case_notes.len(), 1);
        let note = &parsed.case_notes[0];
        assert_eq!(note.interaction_type, InteractionType::Phone);
        assert_eq!(note.created_by.name, "Alice Smith");
    }
}
