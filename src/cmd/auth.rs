//! Session commands: `trellis signup|login|logout|whoami`.

use anyhow::{Context as _, Result};
use trellis::session::SessionState;
use trellis::ui::render::render_user;
use trellis::ui::with_spinner;
use trellis_common::SignupRequest;

use super::Context;

fn password(given: Option<String>) -> Result<String> {
    match given {
        Some(password) => Ok(password),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .context("Failed to read password"),
    }
}

pub async fn cmd_signup(
    ctx: &Context,
    email: String,
    username: String,
    full_name: Option<String>,
    given_password: Option<String>,
) -> Result<()> {
    let mut session = ctx.session().await?;
    let request = SignupRequest {
        email,
        username,
        password: password(given_password)?,
        full_name,
    };
    let user = with_spinner("Creating account...", session.signup(&request)).await?;
    ctx.cookies.save_from(session.client())?;
    println!("Welcome, {}!", user.display_name());
    Ok(())
}

pub async fn cmd_login(ctx: &Context, email: String, given_password: Option<String>) -> Result<()> {
    let mut session = ctx.session().await?;
    if let SessionState::Authenticated(user) = session.state() {
        println!(
            "Already signed in as {}. Run `trellis logout` first to switch accounts.",
            user.email
        );
        return Ok(());
    }
    let password = password(given_password)?;
    let user = with_spinner("Signing in...", session.login(&email, &password)).await?;
    ctx.cookies.save_from(session.client())?;
    println!("Signed in as {}", user.display_name());
    Ok(())
}

pub async fn cmd_logout(ctx: &Context) -> Result<()> {
    let mut session = ctx.session().await?;
    if session.state() == SessionState::Anonymous {
        ctx.cookies.clear()?;
        println!("Not signed in.");
        return Ok(());
    }
    session.logout().await?;
    ctx.cookies.clear()?;
    session.shutdown();
    println!("Signed out.");
    Ok(())
}

pub async fn cmd_whoami(ctx: &Context) -> Result<()> {
    let session = ctx.session().await?;
    match session.current_user() {
        Some(user) => println!("{}", render_user(&user)),
        None => println!("Not signed in. Run `trellis login` first."),
    }
    Ok(())
}
