//! HTTP front ends for the SMTP relay: `mail-api` and `contact-api`.

use axum::Router;
use axum_helpers::server::{RouterOptions, create_app, create_router, health_router};
use core_config::AppInfo;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_relay::{ContactApiDoc, LettreDialer, MailApiDoc, RelayService, handlers};
use std::io;
use std::sync::Arc;
use tracing::info;

pub mod config;

use config::Config;

pub const MAIL_API_PORT: u16 = 20001;
pub const CONTACT_API_PORT: u16 = 3002;

/// Which of the two services a binary runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Service {
    /// `/send` and `/contact`
    Mail,
    /// `/api/v1/contact/{site}`
    Contact,
}

impl Service {
    pub fn label(self) -> &'static str {
        match self {
            Service::Mail => "Mail API",
            Service::Contact => "Contact API",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Service::Mail => MAIL_API_PORT,
            Service::Contact => CONTACT_API_PORT,
        }
    }
}

/// Full router for `service`: its routes, `/health`, docs and shared layers.
pub fn build_router(
    service: Service,
    relay: RelayService,
    options: &RouterOptions,
    app: AppInfo,
) -> io::Result<Router> {
    let health = health_router(service.label(), app);
    match service {
        Service::Mail => {
            create_router::<MailApiDoc>(handlers::mail_router(relay).merge(health), options)
        }
        Service::Contact => {
            create_router::<ContactApiDoc>(handlers::contact_router(relay).merge(health), options)
        }
    }
}

pub async fn run(service: Service) -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env(service.default_port())?;
    init_tracing(&config.environment);

    let relay_config = Arc::new(config.relay);
    let dialer = Arc::new(LettreDialer::from_config(&relay_config));
    let relay = RelayService::new(dialer, Arc::clone(&relay_config))?;

    info!(
        service = service.label(),
        smtp_host = %relay_config.smtp_host,
        smtp_port = relay_config.smtp_port,
        sites = relay_config.site_recipients.len(),
        "Starting {}",
        service.label()
    );

    let router = build_router(service, relay, &config.router, config.app)?;

    create_app(router, &config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("{} shutdown complete", service.label());
    Ok(())
}
