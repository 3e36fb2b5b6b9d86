//! Load and print the contributors of an organization.
//!
//! ```text
//! CONTRIBUTORS_ORG=tokio-rs CONTRIBUTORS_VARIANT=channels \
//!     cargo run --example load_contributors
//! ```
//!
//! Set `GITHUB_BASE_URL` to point at another API host. Press Ctrl-C to
//! cancel a running load.

use contributors::{CancellationToken, Config, Error, FnSink, Loader, User};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_ranking(users: &[User], completed: bool) {
    let state = if completed { "final" } else { "partial" };
    println!("--- {} users ({state}) ---", users.len());
    for user in users.iter().take(10) {
        println!("{:>8}  {}", user.contributions, user.login);
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contributors=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        org = %config.org,
        variant = %config.variant,
        base_url = %config.base_url,
        "Starting contributors load"
    );

    let loader = Loader::from_config(&config)?;
    let sink = FnSink::new(|users: Vec<User>, completed| print_ranking(&users, completed));

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Cancelling load");
            ctrl_c.cancel();
        }
    });

    let start = tokio::time::Instant::now();
    match loader
        .load(config.variant, config.request_data(), &sink, &cancel)
        .await
    {
        Ok(()) => {
            info!(elapsed_ms = start.elapsed().as_millis() as u64, "Load finished");
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            info!("Load cancelled");
            Ok(())
        }
        Err(e) => {
            error!("Load failed: {}", e);
            Err(e)
        }
    }
}
