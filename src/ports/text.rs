// src/ports/text.rs
use crate::constants::{BOOK_COLUMN_WIDTH, NOTE_PREVIEW_CHARS};
use crate::domain::{Book, Note};
use crate::util::text::{first_line, fit, truncate};
use chrono::{DateTime, Utc};
use std::fmt::Write;

const SEPARATOR: &str = " │ ";

/// Renders books and notes as plain text for the terminal
#[derive(Debug, Default)]
pub struct TextPresenter;

impl TextPresenter {
    pub fn new() -> Self {
        Self
    }

    /// One line per book: selection marker, 1-based index, name, last update
    pub fn book_lines(&self, books: &[Book], selected: Option<&str>) -> Vec<String> {
        books
            .iter()
            .enumerate()
            .map(|(i, book)| {
                format!(
                    "{} {:>2}. {} ({})",
                    marker(selected == Some(book.id.as_str())),
                    i + 1,
                    display_name(&book.name, "(unnamed)"),
                    short_date(&book.updated_at)
                )
            })
            .collect()
    }

    /// One line per note: selection marker, 1-based index, title, content preview
    pub fn note_lines(&self, notes: &[Note], selected: Option<&str>) -> Vec<String> {
        notes
            .iter()
            .enumerate()
            .map(|(i, note)| {
                let mut line = format!(
                    "{} {:>2}. {}",
                    marker(selected == Some(note.id.as_str())),
                    i + 1,
                    display_name(&note.title, "(untitled)")
                );
                let preview = first_line(&note.content);
                if !preview.is_empty() {
                    let _ = write!(line, " - {}", truncate(preview, NOTE_PREVIEW_CHARS));
                }
                line
            })
            .collect()
    }

    pub fn render_books(&self, books: &[Book], selected: Option<&str>) -> String {
        if books.is_empty() {
            return "No books yet.\n".to_string();
        }
        join_lines(self.book_lines(books, selected))
    }

    pub fn render_notes(&self, notes: &[Note], selected: Option<&str>) -> String {
        if notes.is_empty() {
            return "No notes in this book.\n".to_string();
        }
        join_lines(self.note_lines(notes, selected))
    }

    /// Tab-separated `id, updated, name` rows for scripting
    pub fn book_rows(&self, books: &[Book]) -> String {
        books
            .iter()
            .map(|b| format!("{}\t{}\t{}\n", b.id, short_date(&b.updated_at), b.name))
            .collect()
    }

    /// Tab-separated `id, updated, title` rows for scripting
    pub fn note_rows(&self, notes: &[Note]) -> String {
        notes
            .iter()
            .map(|n| format!("{}\t{}\t{}\n", n.id, short_date(&n.updated_at), n.title))
            .collect()
    }

    /// Books on the left, notes of the selected book on the right
    pub fn render_panes(
        &self,
        books: &[Book],
        selected_book: Option<&str>,
        notes: &[Note],
        selected_note: Option<&str>,
    ) -> String {
        let mut left = vec!["BOOKS".to_string()];
        left.extend(self.book_lines(books, selected_book));
        let mut right = vec!["NOTES".to_string()];
        right.extend(self.note_lines(notes, selected_note));

        let rows = left.len().max(right.len());
        let mut out = String::new();
        for row in 0..rows {
            let l = left.get(row).map(String::as_str).unwrap_or("");
            let r = right.get(row).map(String::as_str).unwrap_or("");
            let line = format!("{}{}{}", fit(l, BOOK_COLUMN_WIDTH), SEPARATOR, r);
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }

    pub fn render_note(&self, note: &Note) -> String {
        let mut out = String::new();
        let title = display_name(&note.title, "(untitled)");
        let _ = writeln!(out, "{title}");
        let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
        let _ = writeln!(out, "id:      {}", note.id);
        let _ = writeln!(out, "book:    {}", note.book_id);
        let _ = writeln!(out, "created: {}", long_date(&note.created_at));
        let _ = writeln!(out, "updated: {}", long_date(&note.updated_at));
        out.push('\n');
        out.push_str(&note.content);
        if !note.content.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

fn marker(selected: bool) -> char {
    if selected {
        '>'
    } else {
        ' '
    }
}

fn display_name<'a>(name: &'a str, fallback: &'a str) -> &'a str {
    if name.trim().is_empty() {
        fallback
    } else {
        name
    }
}

fn short_date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

fn long_date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
