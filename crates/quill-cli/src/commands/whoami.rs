//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::Session;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub fn run(_args: WhoamiArgs, session: &Session) -> Result<()> {
    let api = session.api()?;
    let username = api
        .whoami()
        .context("Not logged in. Run 'quill login' first.")?;

    println!("{}", username);
    output::field("Server", api.client().base());
    output::field("Store", session.store_path()?.display());
    if api.client().store().refresh_token().is_none() {
        output::note("No refresh token stored; expired sessions need a new login.");
    }

    Ok(())
}
