// src/infrastructure/airtable/client.rs
use crate::application::{AirtableConnector, BookRepository, NoteRepository};
use crate::constants::{AIRTABLE_API_URL, BOOKS_TABLE, HTTP_TIMEOUT_SECS, NOTES_TABLE};
use crate::domain::{AppSettings, Book, DomainError, Note};
use crate::infrastructure::airtable::discovery;
use crate::infrastructure::airtable::dto::{
    self, BookFields, CreateRequest, ListResponse, NoteFields, Record, UpdateRequest,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Blocking client for the Books and Notes tables of one Airtable base
pub struct AirtableClient {
    agent: ureq::Agent,
    endpoint: String,
    api_token: Option<String>,
    base_id: Option<String>,
}

impl AirtableClient {
    pub fn new() -> Self {
        Self::with_endpoint(AIRTABLE_API_URL)
    }

    /// Client talking to a different API root, e.g. a proxy
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build();
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        debug!(%endpoint, "Creating Airtable client");
        Self {
            agent,
            endpoint,
            api_token: None,
            base_id: None,
        }
    }

    /// Unconfigured client honouring the endpoint override in `settings`
    pub fn from_settings(settings: &AppSettings) -> Self {
        match settings.airtable_endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => Self::with_endpoint(endpoint),
            _ => Self::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    fn table_url(&self, table: &str) -> Result<String, DomainError> {
        let base_id = self
            .base_id
            .as_deref()
            .ok_or_else(|| DomainError::NotConfigured("no base selected".to_string()))?;
        Ok(format!("{}/{}/{}", self.endpoint, base_id, table))
    }

    fn record_url(&self, table: &str, record_id: &str) -> Result<String, DomainError> {
        Ok(format!("{}/{}", self.table_url(table)?, record_id))
    }

    fn authorized(&self, request: ureq::Request) -> Result<ureq::Request, DomainError> {
        let token = self
            .api_token
            .as_deref()
            .ok_or_else(|| DomainError::NotConfigured("no API token".to_string()))?;
        Ok(request.set("Authorization", &format!("Bearer {token}")))
    }

    /// Fetch every record of `table`, following Airtable's paging offsets
    fn list_records<T: DeserializeOwned>(
        &self,
        table: &str,
        formula: Option<&str>,
    ) -> Result<Vec<Record<T>>, DomainError> {
        let url = self.table_url(table)?;
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut request = self.authorized(self.agent.get(&url))?;
            if let Some(formula) = formula {
                request = request.query("filterByFormula", formula);
            }
            if let Some(offset) = &offset {
                request = request.query("offset", offset);
            }

            let page: ListResponse<T> = decode(call(request)?)?;
            debug!(table, page_size = page.records.len(), "Fetched page");
            records.extend(page.records);

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(records)
    }

    /// Resolve a record by either its record id or its `Id` column
    fn find_record<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> Result<Option<Record<T>>, DomainError> {
        let literal = formula_string(id);
        let formula = format!("OR(RECORD_ID()={literal},{{Id}}={literal})");
        Ok(self.list_records(table, Some(&formula))?.into_iter().next())
    }

    fn create_record<T: Serialize + DeserializeOwned>(
        &self,
        table: &str,
        fields: T,
    ) -> Result<Record<T>, DomainError> {
        let request = self.authorized(self.agent.post(&self.table_url(table)?))?;
        let response: ListResponse<T> = decode(send(request, &CreateRequest::single(fields))?)?;
        response
            .records
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::Decode("create returned no records".to_string()))
    }

    fn update_record<T: Serialize + DeserializeOwned>(
        &self,
        table: &str,
        record_id: &str,
        fields: T,
    ) -> Result<Record<T>, DomainError> {
        let request = self.authorized(self.agent.patch(&self.record_url(table, record_id)?))?;
        decode(send(request, &UpdateRequest { fields })?)
    }

    fn delete_record(&self, table: &str, record_id: &str) -> Result<(), DomainError> {
        let request = self.authorized(self.agent.delete(&self.record_url(table, record_id)?))?;
        call(request)?;
        Ok(())
    }

    fn book_record_id(&mut self, book: &Book) -> Result<String, DomainError> {
        match &book.record_id {
            Some(record_id) => Ok(record_id.clone()),
            None => self
                .find_book(&book.id)?
                .record_id
                .ok_or_else(|| DomainError::BookNotFound(book.id.clone())),
        }
    }

    fn note_record_id(&mut self, note: &Note) -> Result<String, DomainError> {
        match &note.record_id {
            Some(record_id) => Ok(record_id.clone()),
            None => self
                .find_note(&note.id)?
                .record_id
                .ok_or_else(|| DomainError::NoteNotFound(note.id.clone())),
        }
    }

    /// Ask the metadata API for a base. Any failure keeps the current base.
    fn discover_base(&self) -> Option<String> {
        let url = format!("{}/meta/bases", self.endpoint);
        let request = self.authorized(self.agent.get(&url)).ok()?;
        let discovered = match request.call() {
            Ok(response) => match response.into_string() {
                Ok(body) => discovery::pick_base(&body),
                Err(e) => {
                    debug!(error = %e, "Could not read metadata response");
                    None
                }
            },
            Err(e) => {
                debug!(error = %e, "Metadata API unavailable");
                None
            }
        };
        if let Some(base_id) = &discovered {
            info!(%base_id, "Discovered Airtable base");
        }
        discovered.or_else(|| self.base_id.clone())
    }
}

impl Default for AirtableClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Quote a value as an Airtable formula string literal
fn formula_string(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn call(request: ureq::Request) -> Result<ureq::Response, DomainError> {
    request.call().map_err(request_error)
}

fn send<B: Serialize>(request: ureq::Request, body: &B) -> Result<ureq::Response, DomainError> {
    request.send_json(body).map_err(request_error)
}

fn decode<T: DeserializeOwned>(response: ureq::Response) -> Result<T, DomainError> {
    response
        .into_json()
        .map_err(|e| DomainError::Decode(e.to_string()))
}

fn request_error(err: ureq::Error) -> DomainError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            let message = dto::error_message(&body).unwrap_or(body);
            DomainError::Api { status, message }
        }
        ureq::Error::Transport(transport) => DomainError::Transport(transport.to_string()),
    }
}

impl AirtableConnector for AirtableClient {
    #[instrument(level = "debug", skip(self, api_token))]
    fn configure(&mut self, api_token: &str, base_id: Option<&str>) -> Result<bool, DomainError> {
        self.api_token = Some(api_token.to_string());
        self.base_id = base_id
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string);

        if self.base_id.is_none() {
            self.base_id = self.discover_base();
        }
        Ok(self.base_id.is_some())
    }

    fn ensure_base_and_tables(&mut self) -> Result<(), DomainError> {
        if self.base_id.is_none() {
            self.base_id = self.discover_base();
        }
        Ok(())
    }

    fn base_id(&self) -> Option<&str> {
        self.base_id.as_deref()
    }
}

impl BookRepository for AirtableClient {
    #[instrument(level = "debug", skip(self))]
    fn list_books(&mut self) -> Result<Vec<Book>, DomainError> {
        let records = self.list_records::<BookFields>(BOOKS_TABLE, None)?;
        Ok(records.into_iter().map(Book::from).collect())
    }

    #[instrument(level = "debug", skip(self))]
    fn find_book(&mut self, id: &str) -> Result<Book, DomainError> {
        self.find_record::<BookFields>(BOOKS_TABLE, id)?
            .map(Book::from)
            .ok_or_else(|| DomainError::BookNotFound(id.to_string()))
    }

    #[instrument(level = "debug", skip(self, book), fields(book_id = %book.id))]
    fn create_book(&mut self, book: Book) -> Result<Book, DomainError> {
        let record = self.create_record(BOOKS_TABLE, BookFields::from(&book))?;
        info!(record_id = %record.id, "Created book");
        Ok(Book::from(record))
    }

    #[instrument(level = "debug", skip(self, book), fields(book_id = %book.id))]
    fn update_book(&mut self, book: &Book) -> Result<Book, DomainError> {
        let record_id = self.book_record_id(book)?;
        let record = self.update_record(BOOKS_TABLE, &record_id, BookFields::from(book))?;
        Ok(Book::from(record))
    }

    #[instrument(level = "debug", skip(self, book), fields(book_id = %book.id))]
    fn delete_book(&mut self, book: &Book) -> Result<(), DomainError> {
        let record_id = self.book_record_id(book)?;
        self.delete_record(BOOKS_TABLE, &record_id)?;
        info!(%record_id, "Deleted book");
        Ok(())
    }
}

impl NoteRepository for AirtableClient {
    #[instrument(level = "debug", skip(self))]
    fn list_notes(&mut self, book_id: Option<&str>) -> Result<Vec<Note>, DomainError> {
        let formula = book_id.map(|id| format!("{{BookId}}={}", formula_string(id)));
        let records = self.list_records::<NoteFields>(NOTES_TABLE, formula.as_deref())?;
        Ok(records.into_iter().map(Note::from).collect())
    }

    #[instrument(level = "debug", skip(self))]
    fn find_note(&mut self, id: &str) -> Result<Note, DomainError> {
        self.find_record::<NoteFields>(NOTES_TABLE, id)?
            .map(Note::from)
            .ok_or_else(|| DomainError::NoteNotFound(id.to_string()))
    }

    #[instrument(level = "debug", skip(self, note), fields(note_id = %note.id))]
    fn create_note(&mut self, note: Note) -> Result<Note, DomainError> {
        let record = self.create_record(NOTES_TABLE, NoteFields::from(&note))?;
        info!(record_id = %record.id, "Created note");
        Ok(Note::from(record))
    }

    #[instrument(level = "debug", skip(self, note), fields(note_id = %note.id))]
    fn update_note(&mut self, note: &Note) -> Result<Note, DomainError> {
        let record_id = self.note_record_id(note)?;
        let record = self.update_record(NOTES_TABLE, &record_id, NoteFields::from(note))?;
        Ok(Note::from(record))
    }

    #[instrument(level = "debug", skip(self, note), fields(note_id = %note.id))]
    fn delete_note(&mut self, note: &Note) -> Result<(), DomainError> {
        let record_id = self.note_record_id(note)?;
        self.delete_record(NOTES_TABLE, &record_id)?;
        info!(%record_id, "Deleted note");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_plain_id_when_quoting_then_wraps_in_single_quotes() {
        assert_eq!(formula_string("abc-123"), "'abc-123'");
    }

    #[test]
    fn given_quote_in_id_when_quoting_then_escapes_it() {
        assert_eq!(formula_string(r"it's\"), r"'it\'s\\'");
    }

    #[test]
    fn given_trailing_slash_when_creating_client_then_trims_endpoint() {
        let client = AirtableClient::with_endpoint("http://localhost:8080/v0/");

        assert_eq!(client.endpoint(), "http://localhost:8080/v0");
    }

    #[test]
    fn given_endpoint_override_when_building_from_settings_then_uses_it() {
        let settings = AppSettings {
            airtable_endpoint: Some("http://proxy.local/v0".to_string()),
            ..Default::default()
        };

        assert_eq!(AirtableClient::from_settings(&settings).endpoint(), "http://proxy.local/v0");
        assert_eq!(AirtableClient::from_settings(&AppSettings::default()).endpoint(), AIRTABLE_API_URL);
    }

    #[test]
    fn given_no_base_when_listing_books_then_not_configured() {
        let mut client = AirtableClient::new();

        let result = client.list_books();

        assert!(matches!(result, Err(DomainError::NotConfigured(_))));
    }

    #[test]
    fn given_base_but_no_token_when_building_request_then_not_configured() {
        let mut client = AirtableClient::new();
        client.base_id = Some("appX".to_string());

        let result = client.list_notes(Some("b1"));

        assert!(matches!(result, Err(DomainError::NotConfigured(_))));
    }

    #[test]
    fn given_explicit_base_when_configuring_then_skips_discovery() {
        // Unroutable endpoint: discovery would fail, an explicit base must not need it
        let mut client = AirtableClient::with_endpoint("http://127.0.0.1:9/v0");

        let configured = client.configure("pat", Some(" appGiven ")).unwrap();

        assert!(configured);
        assert_eq!(client.base_id(), Some("appGiven"));
        assert_eq!(client.api_token(), Some("pat"));
    }
}
