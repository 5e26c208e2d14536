//! The skins request handler: one request event in, one response envelope out.

use axum::async_trait;
use axum::http::StatusCode;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use serde_json::json;

use crate::config::Config;
use crate::error::SkinsError;
use crate::event::{RequestEvent, ResponseEnvelope};
use crate::handlers::{self, NewSkin, NewSkinInput, SkinChanges, UpdateSkinInput, ValidatedJson};
use crate::messages::{Locale, Message};

/// Opens and releases the database connection used by a single invocation.
#[async_trait]
pub(crate) trait Connector: Send + Sync {
    async fn connect(&self, database_url: &str) -> Result<DatabaseConnection, DbErr>;

    /// Called exactly once for every connection `connect` handed out.
    async fn release(&self, db: DatabaseConnection) {
        if let Err(e) = db.close().await {
            tracing::warn!("Failed to close database connection: {:?}", e);
        }
    }
}

/// Connects to Postgres with a single-connection pool.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PostgresConnector;

#[async_trait]
impl Connector for PostgresConnector {
    async fn connect(&self, database_url: &str) -> Result<DatabaseConnection, DbErr> {
        let mut options = ConnectOptions::new(database_url.to_owned());
        options.max_connections(1).min_connections(0);
        Database::connect(options).await
    }
}

/// What a request asks for, decided before any storage is touched.
#[derive(Debug)]
enum Operation {
    List,
    Get(i32),
    Create(NewSkin),
    Update(i32, SkinChanges),
    Delete(i32),
}

fn parse_id(raw: &str) -> Result<i32, SkinsError> {
    raw.trim()
        .parse()
        .map_err(|_| SkinsError::Validation(Message::InvalidId))
}

impl Operation {
    fn from_event(method: &str, event: &RequestEvent) -> Result<Self, SkinsError> {
        match method {
            "GET" => match event.query("id") {
                Some(id) => Ok(Operation::Get(parse_id(id)?)),
                None => Ok(Operation::List),
            },
            "POST" => {
                let ValidatedJson(input) =
                    ValidatedJson::<NewSkinInput>::from_body(event.body.as_deref())?;
                Ok(Operation::Create(NewSkin::try_from(input)?))
            }
            "PUT" => {
                let ValidatedJson(input) =
                    ValidatedJson::<UpdateSkinInput>::from_body(event.body.as_deref())?;
                let (id, changes) = input.into_parts()?;
                Ok(Operation::Update(id, changes))
            }
            "DELETE" => {
                let id = event
                    .query("id")
                    .ok_or(SkinsError::Validation(Message::IdParamRequired))?;
                Ok(Operation::Delete(parse_id(id)?))
            }
            _ => Err(SkinsError::MethodNotAllowed(method.to_owned())),
        }
    }

    async fn run(
        self,
        db: &DatabaseConnection,
        locale: Locale,
    ) -> Result<ResponseEnvelope, SkinsError> {
        match self {
            Operation::List => {
                let skins = handlers::list_skins(db).await?;
                ResponseEnvelope::json(StatusCode::OK, &skins)
            }
            Operation::Get(id) => {
                let skin = handlers::get_skin(db, id).await?;
                ResponseEnvelope::json(StatusCode::OK, &skin)
            }
            Operation::Create(new_skin) => {
                let skin = handlers::create_skin(db, new_skin).await?;
                tracing::info!("Created skin {}", skin.id);
                ResponseEnvelope::json(StatusCode::CREATED, &skin)
            }
            Operation::Update(id, changes) => {
                let skin = handlers::update_skin(db, id, changes).await?;
                tracing::info!("Updated skin {}", id);
                ResponseEnvelope::json(StatusCode::OK, &skin)
            }
            Operation::Delete(id) => {
                let id = handlers::delete_skin(db, id).await?;
                tracing::info!("Deleted skin {}", id);
                ResponseEnvelope::json(
                    StatusCode::OK,
                    &json!({ "message": locale.text(Message::Deleted), "id": id }),
                )
            }
        }
    }
}

/// Serves CRUD requests against the `skins` table. Holds no state between invocations.
pub(crate) struct SkinsHandler {
    database_url: Option<String>,
    locale: Locale,
    connector: Box<dyn Connector>,
}

impl SkinsHandler {
    pub(crate) fn new(config: &Config) -> Self {
        Self::with_connector(config, PostgresConnector)
    }

    pub(crate) fn with_connector(config: &Config, connector: impl Connector + 'static) -> Self {
        SkinsHandler {
            database_url: config.database_url.clone(),
            locale: config.locale,
            connector: Box::new(connector),
        }
    }

    pub(crate) fn locale(&self) -> Locale {
        self.locale
    }

    /// Handle one request. Never fails: every error becomes an error envelope.
    pub(crate) async fn handle(&self, event: RequestEvent) -> ResponseEnvelope {
        let method = event.method.trim().to_ascii_uppercase();
        if method == "OPTIONS" {
            return ResponseEnvelope::preflight();
        }

        let result = match Operation::from_event(&method, &event) {
            Ok(operation) => self.execute(operation).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(envelope) => {
                tracing::debug!("{} -> {}", method, envelope.status_code);
                envelope
            }
            Err(err) => {
                let envelope = err.into_envelope(self.locale);
                tracing::debug!("{} -> {}", method, envelope.status_code);
                envelope
            }
        }
    }

    /// Run `operation` on a connection that lives exactly as long as this call.
    async fn execute(&self, operation: Operation) -> Result<ResponseEnvelope, SkinsError> {
        let database_url = self
            .database_url
            .as_deref()
            .ok_or(SkinsError::Configuration)?;
        let db = self.connector.connect(database_url).await?;

        let result = operation.run(&db, self.locale).await;

        self.connector.release(db).await;
        result
    }
}
