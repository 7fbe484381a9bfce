//! Command-line interface for tdo
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod init;
mod task;

/// tdo - text based, human and VCS friendly task tracker
///
/// Tasks are plain files under the nearest `TASKS/` directory, one file per
/// task, moved between `todo/` and `done/` as they are checked off.
#[derive(Parser, Debug)]
#[command(name = "tdo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory to start looking for TASKS/ from (defaults to current directory)
    #[arg(long, global = true, env = "TDO_DIR")]
    pub dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create TASKS/ (todo/, done/ and .config) in the current directory
    Init {
        /// Name written on the `by:` line of new tasks
        #[arg(long)]
        username: Option<String>,

        /// Email appended to the author name
        #[arg(long)]
        email: Option<String>,

        /// Project display name
        #[arg(long)]
        projectname: Option<String>,
    },

    /// Add a task
    Add {
        /// Task text; the first line is the title
        #[arg(required = true)]
        text: Vec<String>,

        /// Comma separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// List tasks
    Lst {
        /// Show at most N tasks per group (0 or less: no limit)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        limit: i64,

        /// Sort field: created, modified, title, author, filename; suffix `-` for descending
        #[arg(long)]
        orderby: Option<String>,

        /// Only tasks with at least one of these comma separated tags
        #[arg(long)]
        withtags: Option<String>,

        /// Status to show: todo, done or all
        #[arg(long, default_value = "todo")]
        status: String,
    },

    /// Mark a task as done
    Check {
        /// Ordinal from `tdo lst`, or the task file name
        task: String,
    },

    /// Mark a done task as todo again
    Uncheck {
        /// Ordinal from `tdo lst`, or the task file name
        task: String,
    },

    /// Show a task with its full text
    Show {
        /// Ordinal from `tdo lst`, or the task file name
        task: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init {
                username,
                email,
                projectname,
            } => init::run(init::InitOptions {
                username,
                email,
                projectname,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Add { text, tags } => task::run_add(task::AddOptions {
                text,
                tags,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Lst {
                limit,
                orderby,
                withtags,
                status,
            } => task::run_list(task::ListOptions {
                limit,
                orderby,
                withtags,
                status,
                verbose: self.verbose,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Check { task } => task::run_set_status(task::SetStatusOptions {
                task,
                status: crate::task::Status::Done,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Uncheck { task } => task::run_set_status(task::SetStatusOptions {
                task,
                status: crate::task::Status::Todo,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Show { task } => task::run_show(task::ShowOptions {
                task,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
        }
    }
}
