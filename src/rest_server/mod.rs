mod messages;
mod options;

use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use serde_json::json;
use thiserror::Error;

pub use messages::*;
pub use options::RestServerOptions;

use crate::jetan::prelude::Square;
use crate::service::{GameService, MoveRequest, ServiceError};

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Boundary-level error wrapper: service errors pass through, plus the two
/// rejections only the HTTP layer can see.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("missing If-Match header")]
    MissingIfMatch,

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Service(err) => err.kind(),
            ApiError::MissingIfMatch | ApiError::BadRequest(_) => "BadAction",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Service(ServiceError::BadAction(_)) => StatusCode::BAD_REQUEST,
            ApiError::Service(ServiceError::Conflict { .. }) => StatusCode::CONFLICT,
            ApiError::Service(ServiceError::Seat(_)) => StatusCode::FORBIDDEN,
            ApiError::Service(ServiceError::Finished) => StatusCode::GONE,
            ApiError::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::MissingIfMatch => StatusCode::PRECONDITION_REQUIRED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut error = json!({"kind": self.kind(), "message": self.to_string()});
        if let ApiError::Service(ServiceError::Conflict { current, need_snapshot, .. }) = self {
            error["version"] = json!(current);
            if *need_snapshot {
                error["need"] = json!("snapshot");
            }
        }
        log::warn!("request refused: {self}");
        HttpResponse::build(self.status_code()).json(json!({"error": error}))
    }
}

/// Mounts the versioned game API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/games")
            .route("", web::post().to(create_game))
            .route("/{id}", web::get().to(get_game))
            .route("/{id}/join", web::post().to(join_game))
            .route("/{id}/controls", web::post().to(apply_control))
            .route("/{id}/legal", web::get().to(legal_moves))
            .route("/{id}/moves", web::post().to(apply_move))
            .route("/{id}/diffs", web::get().to(get_diffs)),
    );
}

/// Shapes body deserialization failures into the standard error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({"error": {"kind": "BadAction", "message": message}})),
        )
        .into()
    })
}

/// Shapes query-string failures into the standard error envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({"error": {"kind": "BadAction", "message": message}})),
        )
        .into()
    })
}

/// Catch-all for routes outside the API surface.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({"error": {"kind": "NotFound", "message": "no such resource"}}))
}

async fn create_game(
    service: web::Data<GameService>,
    body: web::Json<CreateGameRequest>,
) -> ApiResult<HttpResponse> {
    let request = body.into_inner();
    let time = request.time.unwrap_or_default();
    let created = service.create_game(&request.variant, &time);

    Ok(HttpResponse::Created()
        .insert_header((header::ETAG, created.version.to_string()))
        .json(GameResponse {
            game_id: created.game_id,
            version: created.version,
            state: created.state,
        }))
}

async fn get_game(service: web::Data<GameService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    let (version, state) = service.get_snapshot(&id)?;
    Ok(HttpResponse::Ok()
        .insert_header((header::ETAG, version.to_string()))
        .json(GameResponse { game_id: id.into_inner(), version, state }))
}

async fn join_game(
    service: web::Data<GameService>,
    id: web::Path<String>,
    body: web::Json<JoinRequest>,
) -> ApiResult<HttpResponse> {
    let seat = service.join_game(&id, body.seat.as_deref())?;
    Ok(HttpResponse::Ok().json(JoinResponse { seat: seat.map(|color| color.name()) }))
}

async fn apply_control(
    service: web::Data<GameService>,
    id: web::Path<String>,
    body: web::Json<ControlRequest>,
) -> ApiResult<HttpResponse> {
    let outcome = service.apply_control(&id, body.action)?;
    Ok(HttpResponse::Ok().json(outcome))
}

async fn legal_moves(
    service: web::Data<GameService>,
    id: web::Path<String>,
    query: web::Query<SquareQuery>,
) -> ApiResult<HttpResponse> {
    let from = Square::new(query.row, query.col).map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let legal = service.legal_destinations(&id, from)?;
    Ok(HttpResponse::Ok()
        .insert_header((header::ETAG, legal.version.to_string()))
        .json(legal))
}

async fn apply_move(
    service: web::Data<GameService>,
    id: web::Path<String>,
    request: HttpRequest,
    body: web::Json<MoveRequest>,
) -> ApiResult<HttpResponse> {
    let expected_version = require_if_match(&request)?;
    let idem_key = request
        .headers()
        .get("Idempotency-Key")
        .and_then(|value| value.to_str().ok());

    let outcome = service.apply_move(&id, expected_version, &body, idem_key)?;
    Ok(HttpResponse::Ok()
        .insert_header((header::ETAG, outcome.version.to_string()))
        .json(outcome))
}

async fn get_diffs(
    service: web::Data<GameService>,
    id: web::Path<String>,
    query: web::Query<SinceQuery>,
) -> ApiResult<HttpResponse> {
    let page = service.get_diffs(&id, query.since)?;
    Ok(HttpResponse::Ok().json(page))
}

/// Moves demand an explicit optimistic version: absent means 428, anything
/// that is not a plain integer version means 400.
fn require_if_match(request: &HttpRequest) -> ApiResult<u64> {
    let Some(value) = request.headers().get(header::IF_MATCH) else {
        return Err(ApiError::MissingIfMatch);
    };
    value
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().trim_matches('"').parse::<u64>().ok())
        .ok_or_else(|| ApiError::BadRequest("bad If-Match".into()))
}
