use std::sync::Arc;

use restkit::prelude::*;

use demo_tasks::module::log_created_tasks;
use demo_tasks::{AppState, TasksModule};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let profile = std::env::var("APP_PROFILE").unwrap_or_else(|_| "dev".to_string());
    let config = RestConfig::load(&profile).unwrap_or_else(|_| RestConfig::empty());
    let port: u16 = config.get_or("app.server.port", 3000);

    // Demo credentials only; swap in a real verifier for anything serious.
    let verifier: Arc<dyn TokenVerifier> = Arc::new(
        StaticTokenVerifier::new()
            .with_token("demo-token", "demo-user", &["user"])
            .with_token("admin-token", "admin", &["user", "admin"]),
    );
    tracing::info!("demo bearer tokens: demo-token, admin-token");

    let app = AppAssembly::<AppState>::new()
        .provide(config)
        .provide(verifier)
        .install(&TasksModule)
        .assemble()
        .await?;

    log_created_tasks(&app.state.events).await;

    let spec = build_openapi_spec(
        &OpenApiConfig::new("Tasks API", env!("CARGO_PKG_VERSION"))
            .with_description("Task tracker demo built on restkit"),
        app.meta.get_or_empty::<RouteInfo>(),
    );

    let router = app.router.merge(openapi_router(spec));
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}
