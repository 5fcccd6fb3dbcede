use serde::{Deserialize, Serialize};
use serde_json::json;

/// Persistent book entity.
///
/// `id` is `None` until the repository assigns one on first save and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub read: bool,
}

/// Transport representation used for both input and output.
///
/// Any `id` on input is ignored; callers pass the identifier separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDto {
    /// Identifier assigned by storage, present on output only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Publication year
    pub year: i32,
    /// Whether the book has been read
    #[serde(default)]
    pub read: bool,
}

impl BookDto {
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i32, read: bool) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: author.into(),
            year,
            read,
        }
    }

    /// Field-level violations for request payloads; empty when valid.
    pub fn validate(&self) -> Vec<serde_json::Value> {
        let mut details = Vec::new();
        if self.title.trim().is_empty() {
            details.push(json!({"field": "title", "error": "must not be blank"}));
        }
        if self.author.trim().is_empty() {
            details.push(json!({"field": "author", "error": "must not be blank"}));
        }
        details
    }
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            year: book.year,
            read: book.read,
        }
    }
}

impl From<BookDto> for Book {
    fn from(dto: BookDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            author: dto.author,
            year: dto.year,
            read: dto.read,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_defaults_to_false_and_id_is_optional() {
        let dto: BookDto =
            serde_json::from_str(r#"{"title":"Dune","author":"Herbert","year":1965}"#).unwrap();
        assert_eq!(dto, BookDto::new("Dune", "Herbert", 1965, false));
    }

    #[test]
    fn missing_id_is_not_serialized() {
        let value = serde_json::to_value(BookDto::new("Dune", "Herbert", 1965, true)).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["read"], true);
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let result = serde_json::from_str::<BookDto>(r#"{"title":"Dune","year":1965}"#);
        assert!(result.is_err());
    }

    #[test]
    fn conversion_is_field_for_field() {
        let book = Book {
            id: Some(4),
            title: "Title".to_string(),
            author: "Author".to_string(),
            year: 2023,
            read: false,
        };
        let dto = BookDto::from(book.clone());
        assert_eq!(dto.id, Some(4));
        assert_eq!(Book::from(dto), book);
    }

    #[test]
    fn validate_flags_blank_fields() {
        let dto = BookDto::new("  ", "", 2000, false);
        let fields: Vec<_> = dto.validate().iter().map(|d| d["field"].clone()).collect();
        assert_eq!(fields, vec![json!("title"), json!("author")]);
        assert!(BookDto::new("Title", "Author", 2000, false).validate().is_empty());
    }
}
