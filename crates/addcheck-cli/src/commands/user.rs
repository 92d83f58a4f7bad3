//! The `addcheck user` commands.

use anyhow::{Context, Result};

use addcheck_core::traits::UserStore;

use super::Settings;

pub fn add(settings: &Settings, email: String, password_hash: String) -> Result<()> {
    let store = settings.load()?.open_store()?;
    let user = store
        .create_user(&email, &password_hash)
        .context("failed to create user")?;
    println!("Created user {} ({})", user.id, user.email);
    Ok(())
}

pub fn show(settings: &Settings, email: String) -> Result<()> {
    let store = settings.load()?.open_store()?;
    let user = store
        .find_user_by_email(&email)?
        .with_context(|| format!("user not found: {email}"))?;
    println!("User {}", user.id);
    println!("  email: {}", user.email);
    println!("  created: {}", user.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    Ok(())
}
