// File: services/buslink_backend/src/main.rs
use axum::{routing::get, Router};
use buslink_config::load_config;
#[cfg(feature = "stripe")]
use buslink_stripe::routes as stripe_routes;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    buslink_common::logging::init();
    let config = Arc::new(load_config().expect("Failed to load config"));

    #[allow(unused_mut)] // mutated behind the feature gates below
    let mut api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Buslink API!" }))
        .with_state(config.clone());

    #[cfg(feature = "stripe")]
    if config.use_stripe {
        api_router = api_router.merge(stripe_routes::routes(config.clone()));
    }

    // The refund orchestrator needs both collaborators wired up.
    #[cfg(all(feature = "stripe", feature = "firestore"))]
    if config.use_stripe && config.use_firestore {
        let firestore_config = config
            .firestore
            .as_ref()
            .expect("use_firestore is set but [firestore] config is missing");
        let stripe_config = config
            .stripe
            .as_ref()
            .expect("use_stripe is set but [stripe] config is missing");

        let client = buslink_firestore::FirestoreClient::from_config(firestore_config)
            .expect("Failed to build Firestore client");
        let store = Arc::new(buslink_firestore::FirestoreStore::new(Arc::new(client)));
        let gateway = Arc::new(
            buslink_stripe::StripeGateway::from_config(stripe_config)
                .expect("Failed to build Stripe gateway"),
        );
        api_router = api_router.merge(buslink_refunds::routes::routes(store, gateway));
    }

    let app = Router::new().nest("/api", api_router);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.unwrap();
    println!("Starting server at http://{}", addr);
    println!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}
