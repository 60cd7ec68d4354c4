use std::{fs::OpenOptions, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use salesboard_rs::{
    AppState, DEFAULT_FEED_URL, FilterComposition, PaginationConfig, build_router,
    graceful_shutdown, logging_middleware,
};

/// The REST API server for salesboard_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The URL of the product feed pulled by the /init endpoint.
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    feed_url: String,

    /// Drop the month window from the record listing whenever a search term
    /// is present, matching the behavior of the service this one replaced.
    #[arg(long)]
    legacy_search_filter: bool,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let filter_composition = if args.legacy_search_filter {
        FilterComposition::SearchOnly
    } else {
        FilterComposition::MonthAndSearch
    };

    let conn = Connection::open(&args.db_path).expect("Could not open the database");
    let state = AppState::new(
        conn,
        &args.feed_url,
        PaginationConfig::default(),
        filter_composition,
    )
    .expect("Could not initialize the application state");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state))
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive());

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
