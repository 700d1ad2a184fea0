// src/cli/args.rs
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to the settings file (defaults to the user config directory)
    #[arg(short, long, value_name = "SETTINGS", env = "NOTEX_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Store an Airtable token and resolve the base to use
    Configure {
        /// Personal access token
        #[arg(long, value_name = "TOKEN")]
        token: String,

        /// Base id (discovered through the metadata API when omitted)
        #[arg(long, value_name = "BASE_ID")]
        base: Option<String>,
    },

    /// Show whether notex can reach Airtable with the saved settings
    Status,

    /// Manage books
    #[command(subcommand)]
    Book(BookCommand),

    /// Manage notes
    #[command(subcommand)]
    Note(NoteCommand),

    /// Browse and edit books and notes interactively
    Shell,
}

#[derive(Subcommand, Debug, Clone)]
pub enum BookCommand {
    /// List books, most recently updated first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a book
    Create {
        /// Name of the new book
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },

    /// Rename a book
    Rename {
        /// Book id or record id
        #[arg(value_name = "BOOK")]
        book: String,

        #[arg(value_name = "NEW_NAME")]
        name: String,
    },

    /// Delete a book (its notes are kept)
    Delete {
        /// Book id or record id
        #[arg(value_name = "BOOK")]
        book: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum NoteCommand {
    /// List the notes of a book, most recently updated first
    List {
        /// Book id or record id
        #[arg(value_name = "BOOK")]
        book: String,

        /// Only notes whose title or content contains this term
        #[arg(value_name = "SEARCH")]
        search: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an empty note in a book
    Create {
        /// Book id or record id
        #[arg(value_name = "BOOK")]
        book: String,

        #[arg(short, long, value_name = "TITLE")]
        title: Option<String>,
    },

    /// Print a note
    Show {
        /// Note id or record id
        #[arg(value_name = "NOTE")]
        note: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a note's title or content
    Edit(EditArgs),

    /// Delete a note
    Delete {
        /// Note id or record id
        #[arg(value_name = "NOTE")]
        note: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(ClapArgs, Debug, Clone)]
#[command(group = clap::ArgGroup::new("body").multiple(false))]
pub struct EditArgs {
    /// Note id or record id
    #[arg(value_name = "NOTE")]
    pub note: String,

    /// New title
    #[arg(short, long, value_name = "TITLE")]
    pub title: Option<String>,

    /// New content
    #[arg(short, long, value_name = "TEXT", group = "body")]
    pub content: Option<String>,

    /// Read new content from a file ("-" for stdin)
    #[arg(short, long, value_name = "PATH", group = "body")]
    pub file: Option<PathBuf>,

    /// Open the content in $VISUAL / $EDITOR
    #[arg(short, long, group = "body")]
    pub editor: bool,
}
