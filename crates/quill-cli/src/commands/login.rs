//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;

use quill_core::Credentials;

use crate::output;
use crate::session::Session;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long, env = "QUILL_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: LoginArgs, session: &Session) -> Result<()> {
    let api = session.api()?;
    let credentials = Credentials::new(&args.username, &args.password);

    output::note("Logging in...");

    api.login(&credentials).await.context("Failed to login")?;

    output::success("Logged in successfully");
    output::field("User", &args.username);
    output::field("Server", api.client().base());

    Ok(())
}
