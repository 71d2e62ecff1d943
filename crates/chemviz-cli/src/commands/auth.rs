//! Auth commands - register, login, logout, whoami

use anyhow::Result;
use chemviz_session::{DashboardSession, RegistrationRequest};

use crate::output::OutputContext;

pub async fn register(
    session: &DashboardSession,
    ctx: &OutputContext,
    request: &RegistrationRequest,
) -> Result<()> {
    let user = session.register(request).await?;
    ctx.success(&format!("Registered and logged in as {}", user.username));
    Ok(())
}

pub async fn login(
    session: &DashboardSession,
    ctx: &OutputContext,
    username: &str,
    password: &str,
) -> Result<()> {
    let user = session.login(username, password).await?;
    ctx.success(&format!("Logged in as {}", user.username));
    Ok(())
}

/// Logout always succeeds locally, even when the server is unreachable.
pub async fn logout(session: &DashboardSession, ctx: &OutputContext) -> Result<()> {
    session.logout().await;
    ctx.success("Logged out.");
    Ok(())
}

pub async fn whoami(session: &DashboardSession, ctx: &OutputContext) -> Result<()> {
    let user = session.current_user().await?;
    ctx.print_kv(&[
        ("Username", user.username),
        ("Email", user.email.unwrap_or_default()),
        (
            "Name",
            format!(
                "{} {}",
                user.first_name.unwrap_or_default(),
                user.last_name.unwrap_or_default()
            )
            .trim()
            .to_string(),
        ),
    ]);
    Ok(())
}
