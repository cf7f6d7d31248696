use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codegen_api::{config::Config, handlers, openai::OpenAiClient, Handler};

/* ---------- main ---------- */
#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codegen_api=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let client = OpenAiClient::new(&config)?;
    let bind_addr = config.bind_addr.clone();

    let handler = web::Data::new(Handler::new(config, client));
    if handler.config().api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; generation requests will answer 500");
    }
    info!(config = ?handler.config(), "server starting at http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(handler.clone())
            .configure(handlers::configure::<OpenAiClient>)
    })
    .bind(bind_addr)?
    .run()
    .await?;
    Ok(())
}
