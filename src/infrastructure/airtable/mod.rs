// src/infrastructure/airtable/mod.rs
mod client;
pub mod discovery;
pub mod dto;

pub use client::AirtableClient;
