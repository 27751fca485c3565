//! One-shot commands that print JSON to stdout.

use anyhow::{Context as _, Result};
use stronger_core::NewUser;

use crate::open_services;

pub(crate) async fn stats() -> Result<()> {
    let stats = open_services()?.accounts.site_stats().await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

pub(crate) async fn users() -> Result<()> {
    let users = open_services()?.accounts.list_users().await?;
    println!("{}", serde_json::to_string_pretty(&users)?);
    Ok(())
}

pub(crate) async fn popular(limit: usize) -> Result<()> {
    let popular = open_services()?.exercises.most_popular(limit).await?;
    println!("{}", serde_json::to_string_pretty(&popular)?);
    Ok(())
}

pub(crate) async fn create_user(username: &str, email: &str, password: &str) -> Result<()> {
    let new_user = NewUser::from_fields(username, email, password)
        .map_err(|errors| anyhow::anyhow!("invalid user: {errors}"))?;
    let user = open_services()?
        .accounts
        .create_user(new_user)
        .await
        .with_context(|| format!("failed to create user '{username}'"))?;
    tracing::info!(user_id = user.id, "Created user");
    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}
