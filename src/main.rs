use std::sync::Arc;

use tower_http::trace::TraceLayer;

use weight_signup::api::{HttpSignupClient, SignupApi};
use weight_signup::config::AppConfig;
use weight_signup::error::Result;
use weight_signup::signup::{SessionStore, SignupRouteState, signup_routes, spawn_expiry_task};
use weight_signup::templates::PageTemplates;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;

    eprintln!("⚖️  weight-signup v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Page: http://0.0.0.0:{}/", config.port);
    eprintln!("   Signup API: {}/auth/signup", config.api_base_url);
    eprintln!("   Request timeout: {}s", config.request_timeout.as_secs());
    eprintln!("   Session TTL: {}s\n", config.session_ttl.as_secs());

    let api: Arc<dyn SignupApi> = Arc::new(HttpSignupClient::from_config(&config)?);
    let sessions = SessionStore::with_ttl(config.session_ttl);
    spawn_expiry_task(Arc::clone(&sessions));

    let state = SignupRouteState {
        sessions,
        api,
        templates: Arc::new(PageTemplates::new()?),
    };
    let app = signup_routes(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Signup page server started");
    axum::serve(listener, app).await?;

    Ok(())
}
