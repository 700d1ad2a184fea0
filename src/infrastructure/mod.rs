// src/infrastructure/mod.rs
pub mod airtable;
pub mod editor;
pub mod settings;

pub use airtable::AirtableClient;
pub use editor::{ContentEditor, ExternalEditor};
pub use settings::SettingsStore;
