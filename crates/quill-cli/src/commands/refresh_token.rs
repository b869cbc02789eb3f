//! Refresh token command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::Session;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(_args: RefreshTokenArgs, session: &Session) -> Result<()> {
    let api = session.api()?;

    output::note("Refreshing access token...");

    api.refresh()
        .await
        .context("Failed to refresh access token")?;

    output::success("Access token refreshed");
    if let Some(username) = api.whoami() {
        output::field("User", username);
    }

    Ok(())
}
