/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use decisionlog_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = decisionlog_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{auth::jwt_auth_layer, security::SecurityHeadersLayer},
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Secret used to sign and verify tokens
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete router with all routes and middleware
///
/// ```text
/// /
/// ├── GET  /health                          public
/// ├── /auth
/// │   ├── POST /register, /login, /refresh  public
/// │   └── GET|PUT|DELETE /me
/// ├── /decisions                            GET, POST, GET|PUT|DELETE /:id
/// ├── /tags                                 GET, POST, DELETE /:id, /decision/...
/// ├── /comments                             POST, PUT|DELETE /:id, GET /decision/:id
/// ├── /votes                                POST, GET|DELETE /decision/:id
/// ├── /teams                                GET, POST, /join, /:id, /:id/members, /:id/decisions
/// ├── /chat                                 POST, GET /:team_id
/// ├── /whiteboards                          GET, POST, GET|PUT|DELETE /:id
/// └── /bot/query                            POST
/// ```
///
/// Everything except `/health` and the public `/auth` routes sits behind the
/// JWT layer. Tracing, CORS and security headers wrap the whole router.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let public_auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let decision_routes = Router::new()
        .route(
            "/",
            get(routes::decisions::list_decisions).post(routes::decisions::create_decision),
        )
        .route(
            "/:id",
            get(routes::decisions::get_decision)
                .put(routes::decisions::update_decision)
                .delete(routes::decisions::delete_decision),
        );

    let tag_routes = Router::new()
        .route("/", get(routes::tags::list_tags).post(routes::tags::create_tag))
        .route("/:id", delete(routes::tags::delete_tag))
        .route("/decision", post(routes::tags::attach_tag))
        .route("/decision/:decision_id", get(routes::tags::list_decision_tags))
        .route(
            "/decision/:decision_id/:tag_id",
            delete(routes::tags::detach_tag),
        );

    let comment_routes = Router::new()
        .route("/", post(routes::comments::create_comment))
        .route(
            "/:id",
            put(routes::comments::update_comment).delete(routes::comments::delete_comment),
        )
        .route("/decision/:decision_id", get(routes::comments::list_comments));

    let vote_routes = Router::new()
        .route("/", post(routes::votes::cast_vote))
        .route(
            "/decision/:decision_id",
            get(routes::votes::vote_summary).delete(routes::votes::retract_vote),
        );

    let team_routes = Router::new()
        .route("/", get(routes::teams::list_teams).post(routes::teams::create_team))
        .route("/join", post(routes::teams::join_team))
        .route(
            "/:id",
            put(routes::teams::update_team).delete(routes::teams::delete_team),
        )
        .route("/:id/members", get(routes::teams::list_members))
        .route(
            "/:id/members/:user_id",
            put(routes::teams::update_member_role).delete(routes::teams::remove_member),
        )
        .route("/:id/decisions", get(routes::teams::list_team_decisions));

    let chat_routes = Router::new()
        .route("/", post(routes::chat::send_message))
        .route("/:team_id", get(routes::chat::list_messages));

    let whiteboard_routes = Router::new()
        .route(
            "/",
            get(routes::whiteboards::list_whiteboards).post(routes::whiteboards::create_whiteboard),
        )
        .route(
            "/:id",
            get(routes::whiteboards::get_whiteboard)
                .put(routes::whiteboards::update_whiteboard)
                .delete(routes::whiteboards::delete_whiteboard),
        );

    let bot_routes = Router::new().route("/query", post(routes::bot::query));

    // route_layer so unknown paths still answer 404 rather than 401
    let protected_routes = Router::new()
        .route(
            "/auth/me",
            get(routes::auth::me)
                .put(routes::auth::update_me)
                .delete(routes::auth::delete_me),
        )
        .nest("/decisions", decision_routes)
        .nest("/tags", tag_routes)
        .nest("/comments", comment_routes)
        .nest("/votes", vote_routes)
        .nest("/teams", team_routes)
        .nest("/chat", chat_routes)
        .nest("/whiteboards", whiteboard_routes)
        .nest("/bot", bot_routes)
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let cors = if state.config.allows_any_origin() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", public_auth_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
