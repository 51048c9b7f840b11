use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use formrelay::captcha::{RecaptchaVerifier, TokenVerifier};
use formrelay::config::Config;
use formrelay::email::{MailTransport, SmtpMailer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Load config
    let config = Config::from_env().expect("Failed to load configuration");

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::info!("Starting Formrelay");

    let verifier: Option<Arc<dyn TokenVerifier>> = config
        .captcha
        .as_ref()
        .map(|captcha| Arc::new(RecaptchaVerifier::new(captcha)) as Arc<dyn TokenVerifier>);

    let mailer: Arc<dyn MailTransport> = Arc::new(
        SmtpMailer::new(&config.smtp).expect("Failed to build SMTP transport"),
    );

    let addr = SocketAddr::new(config.host, config.port);
    let (app, state) = formrelay::build_app(config, verifier, mailer);

    // Sweep stale rate-limiter entries so the map stays bounded.
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            state.limiter.cleanup(Duration::from_secs(600));
        }
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
