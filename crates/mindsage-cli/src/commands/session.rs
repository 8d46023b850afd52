use super::{GlobalOptions, format_time, session_manager};
use anyhow::{Context, Result};
use mindsage_core::identity::{Credential, Principal};
use mindsage_infrastructure::{FileIdentityClient, MindsagePaths};

pub async fn status(options: &GlobalOptions) -> Result<()> {
    let manager = session_manager(options)?;
    let phase = manager.initialize().await;

    let state = manager.snapshot().await;

    println!("Phase: {:?}", phase);
    if let Some(warning) = state.degradation() {
        println!("Warning: {}", warning);
    }
    if state.authenticated && !manager.has_actor().await {
        println!("Warning: no service connection, sign in again to retry");
    }
    let expires_at = state.credential.as_ref().and_then(|c| c.expires_at());
    if expires_at.is_some() {
        println!("Credential expires: {}", format_time(expires_at));
    }
    if let Some(profile) = &state.user_profile {
        println!("Member since:       {}", format_time(profile.created_at_utc()));
        println!("Last active:        {}", format_time(profile.last_active_at_utc()));
    }
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

/// Stores a credential obtained elsewhere and signs in with it.
pub async fn login(options: &GlobalOptions, principal: String, token: String) -> Result<()> {
    let config = options.load_config()?;
    let credential = Credential::new(Principal::new(principal), token, None);
    FileIdentityClient::new(MindsagePaths::identity_file()?, config.client_options())
        .store(&credential)
        .await
        .context("Failed to store credential")?;

    let manager = session_manager(options)?;
    if !manager.login().await {
        anyhow::bail!("Login failed");
    }

    println!("Signed in as {}", credential.principal());
    match manager.user_profile().await {
        Some(profile) => println!("Welcome back, {}", profile.username),
        None => println!("No profile yet. Run `mindsage register <username>`."),
    }
    Ok(())
}

pub async fn logout(options: &GlobalOptions) -> Result<()> {
    let manager = session_manager(options)?;
    manager.initialize().await;
    manager.logout().await;
    println!("Signed out");
    Ok(())
}
