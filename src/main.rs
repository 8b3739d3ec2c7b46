use anyhow::Context;
use scii_oracle::api::{self, app_state::AppState};
use scii_oracle::config::loader::ConfigLoader;
use scii_oracle::external::{GeminiModel, HttpChartEngine};
use scii_oracle::observability::{
    AppMetrics, HealthCheckResult, ObservabilityState, create_observability_router, init_tracing,
};
use scii_oracle::services::session::create_closing_hook;
use scii_oracle::services::{
    DiagnosisService, GematriaService, GnosisService, OracleService, create_session_service,
};
use scii_oracle::storage::{
    ActiveMemoryLog, InMemorySessionStore, JsonlMemoryLog, create_archetype_store,
};
use scii_oracle::symbols::SymbolTable;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load().context("failed to load configuration")?;
    ConfigLoader::validate(&config)?;

    let _log_guard = init_tracing(&config.logging);
    info!(
        app = %config.app_name,
        environment = %config.environment,
        "Starting SCII Oracle..."
    );

    let symbols = Arc::new(
        SymbolTable::load(config.symbols.database_path.as_deref())
            .context("failed to load symbol table")?,
    );
    info!(letters = symbols.len(), rules = symbols.rules().len(), "Symbol table loaded");

    let memory_log: Arc<dyn ActiveMemoryLog> =
        Arc::new(JsonlMemoryLog::new(config.symbols.memory_log_path.clone()));

    let gematria = GematriaService::new(symbols.clone(), config.gematria.segment_digraphs)?;
    let diagnosis = DiagnosisService::new(symbols.clone(), memory_log.clone());

    let closing_hook = create_closing_hook(config.session.on_close, symbols.clone(), memory_log);
    let session_service = create_session_service(
        Arc::new(InMemorySessionStore::new()),
        symbols.clone(),
        closing_hook,
    );
    info!(on_close = ?config.session.on_close, "Session service initialized");

    let chart_engine = Arc::new(HttpChartEngine::from_config(&config.chart_engine)?);
    let archetypes = create_archetype_store(&config.archetype_store, symbols.clone())?;
    let gnosis = Arc::new(GnosisService::new(
        chart_engine,
        archetypes,
        &config.chart_engine,
    ));
    info!(
        chart_engine = %config.chart_engine.url,
        archetype_backend = ?config.archetype_store.backend,
        "Gnosis service initialized"
    );

    let oracle = if config.oracle.enabled {
        let model = Arc::new(GeminiModel::from_config(&config.oracle)?);
        info!(model = %config.oracle.model, "Oracle enabled");
        Some(OracleService::new(
            model,
            gnosis.clone(),
            config.oracle.max_tool_rounds,
        ))
    } else {
        info!("Oracle disabled");
        None
    };

    let metrics = Arc::new(AppMetrics::default());
    let app_state = AppState::new(
        symbols.clone(),
        gematria,
        diagnosis,
        session_service,
        gnosis,
        oracle,
        metrics.clone(),
    );

    let observability_state = Arc::new(ObservabilityState::with_metrics(
        env!("CARGO_PKG_VERSION").to_string(),
        metrics,
    ));
    observability_state
        .add_health_check(HealthCheckResult {
            name: "symbol_table".to_string(),
            healthy: !symbols.is_empty(),
            message: format!("{} letters loaded", symbols.len()),
        })
        .await;

    let api_router = api::initialize_api(app_state).await?;
    let router = create_observability_router(observability_state)
        .merge(api_router)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout,
        )));
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
