//! Splash simulator - drives the launch handoff without a UI toolkit.

mod config;

use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use splash_gate::{
    DestinationRoutes, GateOutcome, NavigationStack, Screen, SplashCollaborators, SplashScreen,
};
use splash_session::{FilePhoneLoginStore, IdentitySession, InMemorySessionSource, SessionProbe};

use crate::config::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("splash={},info", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = args.splash_config()?;

    let sessions = InMemorySessionSource::new();
    if let Some(user_id) = &args.user_id {
        sessions.sign_in(IdentitySession::new(user_id)).await;
    }

    let store = FilePhoneLoginStore::new(&args.phone_store);
    if let Some(flag) = args.set_phone_login {
        store.set_phone_logged_in(flag).await?;
    }

    info!(
        min_display_ms = config.readiness.min_display_ms,
        animation_ms = config.animation.total_duration().as_millis() as u64,
        late_readiness = ?config.gate.late_readiness,
        phone_store = %store.path().display(),
        "Launching splash"
    );

    let probe = SessionProbe::new(Arc::new(sessions), Arc::new(store));
    let stack = Arc::new(NavigationStack::new(Screen::new("/splash")));
    let collaborators = SplashCollaborators::new(Arc::new(probe), stack.clone())
        .with_routes(DestinationRoutes::default());

    let mut screen = SplashScreen::mount(&config, collaborators)?;
    let outcome = screen.run().await?;

    match outcome {
        GateOutcome::Navigated(destination) => {
            let route = stack
                .current()
                .map(|s| s.route().to_string())
                .unwrap_or_default();
            info!(%destination, %route, "Handoff complete");
            println!("navigated: {} ({})", destination, route);
        }
        GateOutcome::NotReady => {
            warn!("Animation finished before the minimum display time; splash stays up");
            println!("stuck: animation finished before readiness");
        }
        GateOutcome::AlreadyTriggered => {
            println!("already navigated");
        }
    }

    Ok(())
}
