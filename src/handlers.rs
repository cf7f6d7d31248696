// src/handlers.rs

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use tracing::warn;

use super::api::{GenerateRequest, GeneratedCode, InboundEvent, OutboundResponse};
use super::config::Config;
use super::error::ServiceError;
use super::openai::CompletionClient;
use super::services;

/// The request handler: one event in, one response out.
pub struct Handler<C> {
    config: Config,
    client: C,
}

impl<C: CompletionClient> Handler<C> {
    pub fn new(config: Config, client: C) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Never fails: every error is folded into an `OutboundResponse`.
    pub async fn handle(&self, event: InboundEvent) -> OutboundResponse {
        match event.method() {
            "OPTIONS" => OutboundResponse::preflight(),
            "POST" => match self.generate(event.body.as_deref()).await {
                Ok(generated) => OutboundResponse::success(&generated),
                Err(e) => OutboundResponse::from_error(&e),
            },
            other => {
                warn!(method = other, "rejecting unsupported method");
                OutboundResponse::from_error(&ServiceError::MethodNotAllowed)
            }
        }
    }

    async fn generate(&self, body: Option<&str>) -> Result<GeneratedCode, ServiceError> {
        let request = GenerateRequest::parse(body).unwrap_or_else(|e| {
            warn!("malformed request body, treating as empty: {}", e);
            GenerateRequest::default()
        });
        let task = request.validate().inspect_err(|e| warn!("{}", e))?;
        services::generate_code(&self.config, &self.client, task).await
    }
}

impl OutboundResponse {
    pub fn into_http_response(self) -> HttpResponse {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut builder = HttpResponse::build(status);
        for (name, value) in &self.headers {
            builder.insert_header((name.as_str(), value.as_str()));
        }
        builder.body(self.body)
    }
}

/* ---------- POST /invoke (platform event) ---------- */
pub async fn invoke<C: CompletionClient + 'static>(
    handler: web::Data<Handler<C>>,
    payload: web::Bytes,
) -> Result<HttpResponse, ServiceError> {
    let event: InboundEvent = serde_json::from_slice(&payload)
        .map_err(|e| ServiceError::InvalidEvent(e.to_string()))?;
    let response = handler.handle(event).await;
    Ok(HttpResponse::Ok().json(response))
}

/* ---------- any method on / and /generate-code ---------- */
pub async fn http_entry<C: CompletionClient + 'static>(
    handler: web::Data<Handler<C>>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let body = (!body.is_empty()).then(|| String::from_utf8_lossy(&body).into_owned());
    let event = InboundEvent::new(req.method().as_str(), body);
    handler.handle(event).await.into_http_response()
}

/// Registers the routes; the app must carry a `web::Data<Handler<C>>`.
pub fn configure<C: CompletionClient + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/invoke", web::post().to(invoke::<C>))
        .route("/", web::route().to(http_entry::<C>))
        .route("/generate-code", web::route().to(http_entry::<C>));
}
