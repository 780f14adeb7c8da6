//! Login command - check credentials against the auth endpoint.

use std::sync::Arc;

use ridemap::session::{HttpLoginClient, LoginRequest, MemoryStore, SessionStore};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the login command.
pub fn run(email: String, password: String, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("login");

    let base_url = runner.config().api.base_url.clone();
    let client = HttpLoginClient::new(&base_url)?;
    let store = SessionStore::new(Arc::new(MemoryStore::new()));

    println!("Logging in to {} as {}", base_url, email);
    let (session, response) = runner
        .runtime()
        .block_on(store.login(&client, LoginRequest::new(email, password)))?;

    println!("  User id:   {}", response.user_id);
    if let Some(name) = &response.username {
        println!("  Username:  {}", name);
    }
    println!("  Onboarded: {}", response.is_onboarded);
    println!("  Token:     {}", redact(&session.token));
    Ok(())
}

/// First and last four characters only.
fn redact(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}
