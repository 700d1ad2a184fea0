// src/constants.rs
//
// Application-wide constants extracted from magic values throughout the codebase.
// Each constant is documented with its purpose and usage context.

/// Root of the Airtable REST API. Table URLs are `{root}/{base_id}/{table}`.
///
/// Can be overridden per installation through the `airtableEndpoint` setting.
///
/// Used in: `infrastructure/airtable/client.rs`
pub const AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";

/// Table holding one record per book.
pub const BOOKS_TABLE: &str = "Books";

/// Table holding one record per note.
pub const NOTES_TABLE: &str = "Notes";

/// Base name preferred by discovery when the metadata API lists several bases.
///
/// Matching is case-insensitive. If no base carries this name the first listed
/// base is used.
///
/// Used in: `infrastructure/airtable/discovery.rs`
pub const PREFERRED_BASE_NAME: &str = "Notex";

/// Timeout applied to every Airtable request, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Name given to a book created without an explicit name.
///
/// Used in: `application/workspace.rs`, `lib.rs`
pub const DEFAULT_BOOK_NAME: &str = "New Book";

/// Title given to a note created without an explicit title.
///
/// Used in: `application/workspace.rs`, `lib.rs`
pub const DEFAULT_NOTE_TITLE: &str = "Untitled Note";

/// Directory below the platform config dir that holds the settings file.
///
/// Used in: `infrastructure/settings.rs`
pub const SETTINGS_DIR: &str = "Notex";

/// Settings file name.
pub const SETTINGS_FILE: &str = "settings.json";

/// Width of the books column in the two-pane view.
///
/// Used in: `ports/text.rs`
pub const BOOK_COLUMN_WIDTH: usize = 32;

/// Maximum characters of note content shown as a preview in note listings.
///
/// Used in: `ports/text.rs`
pub const NOTE_PREVIEW_CHARS: usize = 40;
