//! Prints what the server knows about an account
//!
//! Credentials come from `SAMURAI__USERNAME` and `SAMURAI__PASSWORD` (or a
//! `.env` file). Pass a telephone number as the first argument to place a
//! call from the first voice-capable URI.

use tracing::{error, info};

use samurai::{Account, SamuraiResult, Tos};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(std::env::args().nth(1)).await {
        error!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(number: Option<String>) -> SamuraiResult<()> {
    let mut account = Account::from_env()?;

    let info = account.server_info().await?;
    info!(
        "Connected to {} {} ({})",
        info.server_name, info.server_version, info.server_vendor
    );

    account.update_managed_uris().await?;
    for uri in account.uris() {
        info!("URI {} [{}] out={}", uri.sip_uri(), uri.tos().join(","), uri.e164_out());
    }

    account.update_phonebook().await?;
    for card in account.phonebook().list() {
        info!(
            "Contact {}: {}",
            card.formatted_name().unwrap_or("<unnamed>"),
            card.telephones().join(", ")
        );
    }

    let balance = account.update_balance().await?;
    info!("Balance: {} {}", balance.amount, balance.currency);

    if let Some(number) = number {
        let remote = account.sip_uri_for(&number)?;
        let Some(uri) = account.uris_mut().iter_mut().find(|uri| uri.supports(Tos::Voice)) else {
            info!("No voice-capable URI, not calling {}", remote);
            return Ok(());
        };

        let session_id = uri.call(&remote).await?;
        if let Some(session) = uri.session(&session_id) {
            let status = session.status().await?;
            info!("Session {}: {} ({})", session_id, status.status, status.code);
        }
    }

    Ok(())
}
