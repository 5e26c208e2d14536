use anyhow::Result;
use axum::{
    body::{Body, Bytes},
    extract::{Extension, Query},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::SkinsError;
use crate::event::{RequestEvent, ResponseEnvelope};
use crate::handler::SkinsHandler;
use crate::messages::Message;

pub(crate) struct State {
    pub(crate) handler: SkinsHandler,
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let mut builder = Response::builder().status(self.status_code);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        match builder.body(Body::from(self.body)) {
            Ok(res) => res,
            Err(e) => {
                tracing::error!("Failed to build response: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Handler for any method on `/` and `/skins`
async fn skins(
    method: Method,
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<State>>,
    body: Bytes,
) -> ResponseEnvelope {
    let body = match String::from_utf8(body.to_vec()) {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("Rejected non UTF-8 body: {}", e);
            return SkinsError::Validation(Message::InvalidBody)
                .into_envelope(state.handler.locale());
        }
    };
    let event = params.iter().fold(
        RequestEvent::new(method.as_str()).with_body(body),
        |event, (key, value)| event.with_query(key, value),
    );
    state.handler.handle(event).await
}

pub(crate) fn router(state: Arc<State>) -> Router {
    Router::new()
        .route("/", any(skins))
        .route("/skins", any(skins))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}

/// Run the server.
pub(crate) async fn run(config: Config) -> Result<()> {
    if config.database_url.is_none() {
        tracing::warn!("DATABASE_URL is not set, requests touching storage will fail");
    }

    let state = Arc::new(State {
        handler: SkinsHandler::new(&config),
    });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
