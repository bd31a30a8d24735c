//! Step-by-step trace of the sign-in handshake, for when login checks fail
//! and it is not obvious which round trip went wrong.

use colored::*;
use lostfound_conformance::transport::HttpTransport;
use lostfound_conformance::{AuthHandshake, HarnessConfig};
use std::env;
use tracing_subscriber::FmtSubscriber;

const PREVIEW_CHARS: usize = 200;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = HarnessConfig::from_env()?;
    if let Some(base_url) = env::args().nth(1) {
        config = config.with_base_url(&base_url)?;
    }
    let credentials = &config.regular;

    println!("{}", "=== Debugging sign-in flow ===".bold());
    println!("Target: {}", config.base_url.cyan());
    println!("Account: {}", credentials.email);

    let transport = HttpTransport::new(&config.base_url)?;
    let trace = AuthHandshake::new(&config.base_url)
        .trace(&transport, &credentials.email, &credentials.password)
        .await;

    for (index, step) in trace.steps.iter().enumerate() {
        println!();
        println!("{}. {}", index + 1, step.label.bold());
        match &step.outcome {
            Ok(response) => {
                println!("   Status: {}", response.status);
                println!("   Response: {}", response.preview(PREVIEW_CHARS));
                if !response.cookies.is_empty() {
                    println!("   Cookies set: {}", response.cookies.join(", "));
                }
            }
            Err(err) => println!("   {}: {}", "Error".red(), err),
        }
    }

    println!();
    match &trace.csrf_token {
        Some(token) => {
            let shown: String = token.chars().take(50).collect();
            println!("CSRF token: {shown}...");
        }
        None => println!("{}", "No CSRF token obtained".yellow()),
    }
    println!("Session cookies: {:?}", trace.auth_cookies);

    match &trace.user {
        Some(user) => println!(
            "{} role={} name={}",
            "✅ Session established successfully!".green(),
            user.role_label(),
            user.name.as_deref().unwrap_or("<unnamed>")
        ),
        None => println!("{}", "❌ No user in session".red()),
    }

    Ok(())
}
