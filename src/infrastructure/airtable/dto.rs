// src/infrastructure/airtable/dto.rs
//
// Airtable's JSON envelopes and the mapping between them and the domain
// models. Column names in the Books and Notes tables are PascalCase.
use crate::domain::{Book, Note};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct Record<T> {
    pub id: String,
    pub fields: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<Record<T>>,
    /// Present while more pages remain
    pub offset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateRequest<T> {
    pub records: Vec<CreateRecord<T>>,
}

#[derive(Debug, Serialize)]
pub struct CreateRecord<T> {
    pub fields: T,
}

#[derive(Debug, Serialize)]
pub struct UpdateRequest<T> {
    pub fields: T,
}

impl<T> CreateRequest<T> {
    pub fn single(fields: T) -> Self {
        Self {
            records: vec![CreateRecord { fields }],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookFields {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NoteFields {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub book_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The application id wins; records created outside notex only have a record id.
fn model_id(fields_id: String, record_id: &str) -> String {
    if fields_id.trim().is_empty() {
        record_id.to_string()
    } else {
        fields_id
    }
}

impl From<Record<BookFields>> for Book {
    fn from(record: Record<BookFields>) -> Self {
        let fields = record.fields.unwrap_or_default();
        Self {
            id: model_id(fields.id, &record.id),
            record_id: Some(record.id),
            name: fields.name,
            created_at: fields.created_at.unwrap_or_default(),
            updated_at: fields.updated_at.unwrap_or_default(),
        }
    }
}

impl From<&Book> for BookFields {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            created_at: Some(book.created_at),
            updated_at: Some(book.updated_at),
        }
    }
}

impl From<Record<NoteFields>> for Note {
    fn from(record: Record<NoteFields>) -> Self {
        let fields = record.fields.unwrap_or_default();
        Self {
            id: model_id(fields.id, &record.id),
            record_id: Some(record.id),
            book_id: fields.book_id,
            title: fields.title,
            content: fields.content,
            created_at: fields.created_at.unwrap_or_default(),
            updated_at: fields.updated_at.unwrap_or_default(),
        }
    }
}

impl From<&Note> for NoteFields {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            book_id: note.book_id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
            created_at: Some(note.created_at),
            updated_at: Some(note.updated_at),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Typed {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        message: Option<String>,
    },
    Code(String),
}

/// Pull a readable message out of an Airtable error body, e.g.
/// `{"error":{"type":"INVALID_PERMISSIONS","message":"..."}}` or `{"error":"NOT_FOUND"}`.
pub fn error_message(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    Some(match envelope.error {
        ErrorDetail::Typed {
            kind,
            message: Some(message),
        } => format!("{kind}: {message}"),
        ErrorDetail::Typed { kind, message: None } => kind,
        ErrorDetail::Code(code) => code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn given_record_with_id_field_when_mapping_book_then_prefers_field_id() {
        let json = r#"{
            "id": "recA1",
            "fields": {
                "Id": "6f0e1b52-book",
                "Name": "Journal",
                "CreatedAt": "2024-05-01T12:00:00.000Z",
                "UpdatedAt": "2024-05-02T08:30:00.000Z"
            }
        }"#;
        let record: Record<BookFields> = serde_json::from_str(json).unwrap();

        let book = Book::from(record);

        assert_eq!(book.id, "6f0e1b52-book");
        assert_eq!(book.record_id.as_deref(), Some("recA1"));
        assert_eq!(book.name, "Journal");
        assert_eq!(book.created_at, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        assert_eq!(book.updated_at, Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap());
    }

    #[test]
    fn given_record_without_id_field_when_mapping_note_then_falls_back_to_record_id() {
        let json = r#"{"id": "recN9", "fields": {"BookId": "b1", "Title": "Loose"}}"#;
        let record: Record<NoteFields> = serde_json::from_str(json).unwrap();

        let note = Note::from(record);

        assert_eq!(note.id, "recN9");
        assert_eq!(note.book_id, "b1");
        assert_eq!(note.title, "Loose");
        assert_eq!(note.content, "");
        assert_eq!(note.updated_at, DateTime::<Utc>::default());
    }

    #[test]
    fn given_record_without_fields_when_mapping_then_yields_empty_model() {
        let record: Record<BookFields> = serde_json::from_str(r#"{"id": "recEmpty"}"#).unwrap();

        let book = Book::from(record);

        assert_eq!(book.id, "recEmpty");
        assert_eq!(book.name, "");
    }

    #[test]
    fn given_note_when_building_fields_then_uses_airtable_column_names() {
        let mut note = Note::new("book-7", "Title");
        note.content = "Body".to_string();

        let json = serde_json::to_value(UpdateRequest {
            fields: NoteFields::from(&note),
        })
        .unwrap();

        let fields = &json["fields"];
        assert_eq!(fields["Id"], note.id.as_str());
        assert_eq!(fields["BookId"], "book-7");
        assert_eq!(fields["Title"], "Title");
        assert_eq!(fields["Content"], "Body");
        assert!(fields["CreatedAt"].is_string());
        assert!(fields["UpdatedAt"].is_string());
    }

    #[test]
    fn given_single_book_when_building_create_request_then_wraps_in_records() {
        let book = Book::new("Recipes");

        let json = serde_json::to_value(CreateRequest::single(BookFields::from(&book))).unwrap();

        assert_eq!(json["records"].as_array().unwrap().len(), 1);
        assert_eq!(json["records"][0]["fields"]["Name"], "Recipes");
    }

    #[test]
    fn given_list_page_when_parsing_then_reads_offset() {
        let json = r#"{"records": [{"id": "rec1", "fields": {}}], "offset": "itr2/rec1"}"#;

        let page: ListResponse<NoteFields> = serde_json::from_str(json).unwrap();

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.offset.as_deref(), Some("itr2/rec1"));
    }

    #[test]
    fn given_typed_error_body_when_extracting_message_then_combines_type_and_message() {
        let body = r#"{"error":{"type":"INVALID_PERMISSIONS","message":"You are not permitted"}}"#;

        assert_eq!(
            error_message(body).as_deref(),
            Some("INVALID_PERMISSIONS: You are not permitted")
        );
    }

    #[test]
    fn given_code_error_body_when_extracting_message_then_returns_code() {
        assert_eq!(error_message(r#"{"error":"NOT_FOUND"}"#).as_deref(), Some("NOT_FOUND"));
    }

    #[test]
    fn given_non_json_body_when_extracting_message_then_returns_none() {
        assert_eq!(error_message("<html>Bad Gateway</html>"), None);
    }
}
