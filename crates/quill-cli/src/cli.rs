//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::comments::CommentsCommand;
use crate::commands::login::LoginArgs;
use crate::commands::logout::LogoutArgs;
use crate::commands::notifications::NotificationsCommand;
use crate::commands::posts::PostsCommand;
use crate::commands::refresh_token::RefreshTokenArgs;
use crate::commands::register::RegisterArgs;
use crate::commands::whoami::WhoamiArgs;

/// Command-line client for the quill blog backend.
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(author, version = env!("QUILL_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Backend base URL
    #[arg(
        long,
        env = "QUILL_API_BASE",
        default_value = "http://127.0.0.1:8000",
        global = true
    )]
    pub api_base: String,

    /// Credential file (defaults to the user data directory)
    #[arg(long, env = "QUILL_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "QUILL_TIMEOUT", value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the issued tokens
    Login(LoginArgs),

    /// Create a new account
    Register(RegisterArgs),

    /// Forget the stored tokens
    Logout(LogoutArgs),

    /// Show the logged-in user
    Whoami(WhoamiArgs),

    /// Exchange the refresh token for a new access token
    RefreshToken(RefreshTokenArgs),

    /// Read and write posts
    Posts(PostsCommand),

    /// Read and write comments
    Comments(CommentsCommand),

    /// Unread notifications
    Notifications(NotificationsCommand),
}
