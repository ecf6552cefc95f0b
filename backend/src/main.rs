//! Backend entry-point: configuration, pool construction, and the HTTP
//! server.

use actix_web::{App, HttpServer};
use color_eyre::eyre::{self, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use nutrifix_backend::doc::ApiDoc;
use nutrifix_backend::RequestIdentity;
use nutrifix_backend::outbound::persistence::DbPool;
use nutrifix_backend::server::{AppServices, AppSettings, configure_api};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load configuration")?;
    let database_url = settings
        .database_url
        .clone()
        .ok_or_else(|| eyre::eyre!("NUTRIFIX_DATABASE_URL is required"))?;
    let jwt_secret = settings
        .jwt_secret
        .clone()
        .ok_or_else(|| eyre::eyre!("NUTRIFIX_JWT_SECRET is required"))?;
    if settings.completion_api_key.is_none() {
        warn!("no completion API key configured; advisory endpoints will fail");
    }

    let pool = DbPool::new(settings.pool_config(database_url))
        .await
        .wrap_err("failed to build database pool")?;
    let services = AppServices::from_pool(&pool, &settings, &jwt_secret)
        .wrap_err("failed to wire services")?;

    let bind_addr = (settings.host().to_owned(), settings.port());
    info!(host = %bind_addr.0, port = bind_addr.1, "starting server");

    HttpServer::new(move || {
        let services = services.clone();
        let app = App::new()
            .wrap(RequestIdentity)
            .configure(|cfg| configure_api(cfg, &services));

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)
    .wrap_err("failed to bind listener")?
    .run()
    .await
    .wrap_err("server terminated abnormally")
}
