// src/application/connection.rs
use crate::domain::{AppSettings, DomainError};
use std::fmt;
use tracing::{debug, info, instrument};

pub trait SettingsRepository {
    /// Load settings; a store that has never been written yields defaults
    fn load(&self) -> Result<AppSettings, DomainError>;

    fn save(&self, settings: &AppSettings) -> Result<(), DomainError>;
}

/// The part of the Airtable client that deals with credentials
pub trait AirtableConnector {
    /// Store the credentials, discovering a base when none is given.
    /// Returns whether a base is known afterwards.
    fn configure(&mut self, api_token: &str, base_id: Option<&str>) -> Result<bool, DomainError>;

    /// Make a last attempt at resolving the base. Tables cannot be provisioned
    /// through the public API, so missing tables only show up on CRUD calls.
    fn ensure_base_and_tables(&mut self) -> Result<(), DomainError>;

    fn base_id(&self) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => write!(f, "Connected"),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// Ties the settings store to the connector: restores a saved connection on
/// startup and validates and persists new credentials.
pub struct Connection<S: SettingsRepository, C: AirtableConnector> {
    settings: S,
    connector: C,
}

impl<S: SettingsRepository, C: AirtableConnector> Connection<S, C> {
    pub fn new(settings: S, connector: C) -> Self {
        Self {
            settings,
            connector,
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn restore(&mut self) -> Result<ConnectionStatus, DomainError> {
        let settings = self.settings.load()?;
        let Some(api_key) = settings.api_key() else {
            debug!("No API token stored");
            return Ok(ConnectionStatus::Disconnected);
        };

        self.connector.configure(api_key, settings.base_id())?;
        self.connector.ensure_base_and_tables()?;

        Ok(match self.connector.base_id() {
            Some(base_id) => {
                info!(base_id, "Connected to Airtable");
                ConnectionStatus::Connected
            }
            None => ConnectionStatus::Disconnected,
        })
    }

    /// Validate and persist new credentials, returning what was saved
    #[instrument(level = "debug", skip(self, api_token))]
    pub fn configure(
        &mut self,
        api_token: &str,
        base_id: Option<&str>,
    ) -> Result<AppSettings, DomainError> {
        let api_token = api_token.trim();
        if api_token.is_empty() {
            return Err(DomainError::InvalidInput("API token is required.".to_string()));
        }

        let base_id = base_id.map(str::trim).filter(|b| !b.is_empty());
        if !self.connector.configure(api_token, base_id)? {
            return Err(DomainError::Connection(
                "Unable to configure Airtable service.".to_string(),
            ));
        }
        self.connector.ensure_base_and_tables()?;

        let mut settings = self.settings.load().unwrap_or_else(|e| {
            debug!(error = %e, "Replacing unreadable settings");
            AppSettings::default()
        });
        settings.airtable_api_key = Some(api_token.to_string());
        settings.airtable_base_id = self.connector.base_id().map(str::to_string);
        self.settings.save(&settings)?;

        info!(base_id = ?settings.airtable_base_id, "Saved Airtable settings");
        Ok(settings)
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn into_connector(self) -> C {
        self.connector
    }
}
