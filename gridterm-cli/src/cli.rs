//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use gridterm_core::LayoutId;

/// gridterm command-line interface for managing terminal grids
#[derive(Parser)]
#[command(name = "gridterm")]
#[command(author, version, about = "gridterm multi-pane terminal host")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the layout catalogue
    #[command(about = "List the available grid layouts")]
    Layouts {
        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Change the layout of a project
    #[command(about = "Switch a project to another grid layout")]
    Layout {
        /// Project name or UUID
        project: String,

        /// Target layout id (see `gridterm layouts`)
        #[arg(value_parser = parse_layout)]
        layout: LayoutId,

        /// Panes to close when the grid shrinks, comma separated
        #[arg(long, value_delimiter = ',')]
        close: Vec<usize>,

        /// Confirm closing panes; without it a shrink is only previewed
        #[arg(short, long)]
        yes: bool,
    },

    /// Close or reopen panes
    #[command(subcommand)]
    Pane(PaneCommands),

    /// Show projects with their grids
    #[command(about = "Show the grid and closed panes of projects")]
    Status {
        /// Project name or UUID; all projects when omitted
        project: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Run the shell of one pane headlessly
    #[command(about = "Start a pane's shell session and print its output")]
    Run {
        /// Project name or UUID
        project: String,

        /// Pane index
        #[arg(short, long, default_value_t = 0)]
        pane: usize,

        /// Terminal columns
        #[arg(long, default_value_t = 80)]
        cols: u16,

        /// Terminal rows
        #[arg(long, default_value_t = 24)]
        rows: u16,

        /// Command to run instead of an interactive shell
        #[arg(long)]
        command: Option<String>,

        /// Text sent to the shell once it is ready
        #[arg(long)]
        send: Option<String>,

        /// Stop the session after this many seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },
}

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects
    List {
        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Add a project rooted at a directory
    Add {
        /// Root directory of the project
        path: PathBuf,

        /// Project name; defaults to the last path component
        #[arg(short, long)]
        name: Option<String>,

        /// Initial layout; defaults to `grid.default_layout` from the settings
        #[arg(short, long, value_parser = parse_layout)]
        layout: Option<LayoutId>,
    },

    /// Remove a project and its panes
    Remove {
        /// Project name or UUID
        project: String,
    },

    /// Make a project the visible one
    Activate {
        /// Project name or UUID
        project: String,
    },
}

/// Pane subcommands
#[derive(Subcommand)]
pub enum PaneCommands {
    /// Close a pane, ending its session
    Close {
        /// Project name or UUID
        project: String,
        /// Pane index
        index: usize,
    },

    /// Reopen a closed pane
    Reopen {
        /// Project name or UUID
        project: String,
        /// Pane index
        index: usize,
    },
}

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table
    Table,
    /// JSON document
    Json,
}

fn parse_layout(s: &str) -> Result<LayoutId, String> {
    s.parse::<LayoutId>().map_err(|e| {
        let known: Vec<&str> = LayoutId::ALL.iter().map(|id| id.as_str()).collect();
        format!("{e} (expected one of: {})", known.join(", "))
    })
}
