use std::sync::Arc;

use axum::extract::FromRef;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use sqlx::PgPool;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{MemoryAuthenticator, PgAuthenticator, TokenSigner};
use crate::config::{apply_security_headers, create_cors_layer, AuthConfig, Config};
use crate::handlers::{self, auth, events, reviews, tickets};
use crate::managers::{AuthManager, EventManager, ReviewManager, TicketManager};
use crate::store::{MemoryStore, PgStore};
use crate::utils::error::panic_response;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthManager,
    pub events: EventManager,
    pub tickets: TicketManager,
    pub reviews: ReviewManager,
    pub signer: TokenSigner,
}

impl AppState {
    /// Wires every manager and the authenticator to one Postgres pool.
    pub fn postgres(pool: PgPool, config: &AuthConfig) -> Self {
        let signer = config.token_signer();
        let authenticator = PgAuthenticator::new(pool.clone(), signer.clone());
        let store = Arc::new(PgStore::new(pool));

        Self {
            auth: AuthManager::new(Arc::new(authenticator), config.enhancers()),
            events: EventManager::new(store.clone()),
            tickets: TicketManager::new(store.clone()),
            reviews: ReviewManager::new(store),
            signer,
        }
    }

    /// Wires every manager to a fresh process-local store. Used by tests.
    pub fn in_memory(config: &AuthConfig) -> Self {
        let store = MemoryStore::new();
        let signer = config.token_signer();
        let authenticator = MemoryAuthenticator::new(store.users(), signer.clone());
        let store = Arc::new(store);

        Self {
            auth: AuthManager::new(Arc::new(authenticator), config.enhancers()),
            events: EventManager::new(store.clone()),
            tickets: TicketManager::new(store.clone()),
            reviews: ReviewManager::new(store),
            signer,
        }
    }
}

impl FromRef<AppState> for TokenSigner {
    fn from_ref(state: &AppState) -> Self {
        state.signer.clone()
    }
}

fn authentication_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/login", post(auth::login))
        .route("/user", get(auth::current_user))
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/by-id/:id", get(events::get_by_id))
        .route("/events", get(events::list))
        .route("/organizer-events/:organizer_id", get(events::by_organizer))
        .route("/create-event", post(events::create))
        .route("/update-event", patch(events::update))
        .route("/delete/:id", delete(events::delete))
}

fn ticket_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/by-id/:user_id/:event_id/:auxiliary_id",
            get(tickets::get_by_id),
        )
        .route("/tickets", get(tickets::list))
        .route("/buyer-tickets/:user_id", get(tickets::by_buyer))
        .route(
            "/buyer-tickets-for-event/:user_id/:event_id",
            get(tickets::by_buyer_and_event),
        )
        .route(
            "/tickets-sold-by-organizer/:organizer_id",
            get(tickets::sold_by_organizer),
        )
        .route("/event-tickets/:event_id", get(tickets::by_event))
        .route("/create-ticket", post(tickets::create))
        .route("/update-ticket", patch(tickets::update))
        .route(
            "/delete-ticket/:user_id/:event_id/:auxiliary_id",
            delete(tickets::delete),
        )
}

fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/by-id/:user_id/:event_id", get(reviews::get_by_id))
        .route("/reviews", get(reviews::list))
        .route("/user-reviews/:user_id", get(reviews::by_author))
        .route("/organizer-reviews/:organizer_id", get(reviews::by_organizer))
        .route("/event-reviews/:event_id", get(reviews::by_event))
        .route("/create-review", post(reviews::create))
        .route("/update-review", patch(reviews::update))
        .route("/delete-review/:user_id/:event_id", delete(reviews::delete))
}

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/authentication", authentication_routes())
        .nest("/api/event", event_routes())
        .nest("/api/ticket", ticket_routes())
        .nest("/api/review", review_routes())
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response));

    apply_security_headers(router, config.production)
        .layer(create_cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    fn config(production: bool) -> Config {
        Config::from_lookup(|key: &str| match key {
            "PASS_BEFORE" => Some("b".to_string()),
            "PASS_AFTER" => Some("a".to_string()),
            "JWT_SECRET_KEY" => Some("0123456789abcdef0123456789abcdef".to_string()),
            "DATABASE_URL" => Some("postgres://localhost/tickets".to_string()),
            "RUST_ENV" if production => Some("production".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn app(production: bool) -> Router {
        let config = config(production);
        create_routes(AppState::in_memory(&config.auth), &config)
    }

    #[tokio::test]
    async fn test_preflight_from_allowed_origin() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/event/events")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();

        let response = app(false).oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn test_hsts_only_in_production() {
        for production in [false, true] {
            let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
            let response = app(production).oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response
                    .headers()
                    .contains_key(header::STRICT_TRANSPORT_SECURITY),
                production
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let request = Request::builder()
            .uri("/api/nothing-here")
            .body(Body::empty())
            .unwrap();
        let response = app(false).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
