pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    extract::Request,
    middleware::{from_fn, from_fn_with_state, Next},
    routing::{get, patch, post},
    Router,
};
use mongodb::{options::ClientOptions, Client};
use secrecy::ExposeSecret;
use service_core::middleware::rate_limit::{create_rate_limiter, rate_limit_middleware};
use service_core::middleware::tracing::request_id_middleware;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::Config;
use services::{BankDataClient, JwtService, PaymentRepository, RolePolicy, UserRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub config: Config,
    pub jwt: JwtService,
    pub policy: RolePolicy,
    pub users: UserRepository,
    pub payments: PaymentRepository,
    pub bank_data: BankDataClient,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    db: mongodb::Database,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        let mut client_options = ClientOptions::parse(config.database.url.expose_secret()).await?;
        client_options.app_name = Some(config.service_name.clone());

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database.db_name);

        let users = UserRepository::new(&db);
        let payments = PaymentRepository::new(&db);

        users.init_indexes().await?;
        payments.init_indexes().await?;

        services::bootstrap::initialize_roles(&users, &config).await?;
        tracing::info!("roles initialized");

        let state = AppState {
            db: db.clone(),
            jwt: JwtService::new(&config.jwt),
            policy: RolePolicy::builtin(),
            bank_data: BankDataClient::new(&config.bank_data),
            users,
            payments,
            config: config.clone(),
        };

        let router = build_router(state);

        // Port 0 binds a random free port (used by the test harness)
        let addr: SocketAddr =
            format!("{}:{}", config.server.host, config.server.port).parse()?;
        let listener = TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        tracing::info!("banking service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
            db,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &mongodb::Database {
        &self.db
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}

fn build_router(state: AppState) -> Router {
    let limiter = create_rate_limiter(
        state.config.rate_limit.attempts,
        state.config.rate_limit.window_seconds,
    );

    // Brute-force protection wraps only the credential entry points
    let public_routes = Router::new()
        .route("/user/signup", post(handlers::auth::signup))
        .route("/user/login", post(handlers::auth::login))
        .layer(from_fn(move |req: Request, next: Next| {
            rate_limit_middleware(limiter.clone(), req, next)
        }));

    let account_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/dashboard/deposit", patch(handlers::dashboard::deposit))
        .route("/payments", patch(handlers::payments::submit_payment))
        .route(
            "/payments/payconfirm",
            post(handlers::payments::confirm_password),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let admin_routes = Router::new()
        .route(
            "/employeeDashboard",
            get(handlers::verification::list_transactions),
        )
        .route(
            "/employeeDashboard/verify/:id",
            patch(handlers::verification::mark_verified),
        )
        .route(
            "/transactions/swiftCode/:id",
            patch(handlers::verification::verify_swift_code),
        )
        .route(
            "/transactions/recipientAccountNo/:id",
            patch(handlers::verification::verify_recipient_account),
        )
        .route(
            "/transactions/recipientName/:id",
            patch(handlers::verification::verify_recipient_name),
        )
        .route(
            "/transactions/recipientBank/:id",
            patch(handlers::verification::verify_recipient_bank),
        )
        .route(
            "/transactions/amountTransfer/:id",
            patch(handlers::verification::verify_amount),
        )
        .route(
            "/transactions/submit/:id",
            post(handlers::verification::submit_transaction),
        )
        .route(
            "/transactions/reject/:id",
            patch(handlers::verification::reject_transaction),
        )
        // Auth runs first, then the role gate
        .layer(from_fn(middleware::require_admin))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(public_routes)
        .merge(account_routes)
        .merge(admin_routes)
        .layer(CorsLayer::permissive())
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}
