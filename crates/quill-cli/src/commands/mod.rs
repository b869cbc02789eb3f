//! Subcommand implementations.

pub mod comments;
pub mod login;
pub mod logout;
pub mod notifications;
pub mod posts;
pub mod refresh_token;
pub mod register;
pub mod whoami;

use anyhow::Result;

use crate::cli::Commands;
use crate::session::Session;

pub async fn handle(command: Commands, session: &Session) -> Result<()> {
    match command {
        Commands::Login(args) => login::run(args, session).await,
        Commands::Register(args) => register::run(args, session).await,
        Commands::Logout(args) => logout::run(args, session),
        Commands::Whoami(args) => whoami::run(args, session),
        Commands::RefreshToken(args) => refresh_token::run(args, session).await,
        Commands::Posts(cmd) => posts::handle(cmd, session).await,
        Commands::Comments(cmd) => comments::handle(cmd, session).await,
        Commands::Notifications(cmd) => notifications::handle(cmd, session).await,
    }
}
