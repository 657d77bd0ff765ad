use clap::{Parser, Subcommand};

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "taskflow",
    version = VERSION,
    about = "Command-line client for the TaskFlow task API",
    after_help = "\
NOTE:
  Sign in first with `taskflow login <email> <password>`. Credentials and the
  selected workspace live under ~/.taskflow (override: TASKFLOW_STATE_DIR).
  The backend defaults to http://localhost:8000 (override: TASKFLOW_API_URL).

SCOPING:
  With a workspace selected, task commands operate on that workspace's
  collection; otherwise they fall back to your personal (legacy) collection.
  Board moves always require a workspace.

EXIT CODES:
  0  Success
  1  Error (not signed in, validation, network, server rejection)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the access token
    Login {
        email: String,
        password: String,
    },

    /// Create an account, then sign in separately
    Signup {
        email: String,
        password: String,
    },

    /// Forget the stored access token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Kanban board
    Board {
        #[command(subcommand)]
        command: Option<BoardCommands>,
    },

    /// Workspace management
    #[command(subcommand)]
    Workspace(WorkspaceCommands),

    /// Workspace analytics summary
    Stats,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    Add {
        /// Task title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Initial status (TO_DO, IN_PROGRESS, REVIEW, DONE)
        #[arg(long)]
        status: Option<String>,
    },
    /// List tasks
    List,
    /// Show task details
    Show {
        /// Task ID or prefix
        id: String,
    },
    /// Edit a task's title, description, or status
    Edit {
        /// Task ID or prefix
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Toggle a task's completion
    Done {
        /// Task ID or prefix
        id: String,
    },
    /// Delete a task
    Rm {
        /// Task ID or prefix
        id: String,
    },
}

#[derive(Subcommand)]
pub enum BoardCommands {
    /// Show the board (default)
    Show,
    /// Move a task to a column (TO_DO, IN_PROGRESS, REVIEW, DONE)
    Move {
        /// Task ID or prefix
        id: String,
        status: String,
    },
}

#[derive(Subcommand)]
pub enum WorkspaceCommands {
    /// List workspaces you belong to
    List,
    /// Create a workspace and select it
    Create { name: String },
    /// Select the workspace task commands operate on
    Switch { id: String },
    /// Show the selected workspace
    Current,
    /// Rename a workspace
    Rename { id: String, name: String },
    /// Delete a workspace
    Delete { id: String },
}
