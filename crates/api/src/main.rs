use std::sync::Arc;

#[tokio::main]
async fn main() {
    scribe_observability::init();

    let services = Arc::new(scribe_api::app::AppServices::from_env().await);

    let workers = services.spawn_consumers();

    let app = scribe_api::app::build_app(Arc::clone(&services));

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();

    for worker in workers {
        worker.shutdown();
    }
}
