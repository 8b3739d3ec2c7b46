//! 可观测性模块
//!
//! 提供 Prometheus 格式指标、结构化日志初始化和健康检查。

use axum::{
    Json, Router,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::config::LoggingConfig;

// ===== Metrics =====

/// 应用指标
#[derive(Clone, Default)]
pub struct AppMetrics {
    pub http_requests_total: Arc<AtomicU64>,
    pub http_request_duration_sum: Arc<AtomicU64>,
    pub in_flight_requests: Arc<AtomicUsize>,
    pub sessions_opened: Arc<AtomicU64>,
    pub sessions_closed: Arc<AtomicU64>,
    pub gematria_requests_total: Arc<AtomicU64>,
    pub diagnoses_total: Arc<AtomicU64>,
    pub oracle_calls_total: Arc<AtomicU64>,
    pub upstream_errors_total: Arc<AtomicU64>,
    pub errors_total: Arc<AtomicU64>,
}

impl AppMetrics {
    /// 记录 HTTP 请求
    pub fn record_http_request(&self, duration_ms: u64, failed: bool) {
        self.http_requests_total.fetch_add(1, Ordering::SeqCst);
        self.http_request_duration_sum
            .fetch_add(duration_ms, Ordering::SeqCst);
        if failed {
            self.errors_total.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn record_session_opened(&self) {
        self.sessions_opened.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_session_closed(&self) {
        self.sessions_closed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_gematria(&self) {
        self.gematria_requests_total.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_diagnosis(&self) {
        self.diagnoses_total.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_oracle_call(&self) {
        self.oracle_calls_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录外部协作服务失败
    pub fn record_upstream_error(&self) {
        self.upstream_errors_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 生成 Prometheus 格式指标
    pub fn gather(&self) -> String {
        format!(
            r#"# HELP http_requests_total Total HTTP requests
# TYPE http_requests_total counter
http_requests_total {}
# HELP http_request_duration_seconds HTTP request duration in seconds
# TYPE http_request_duration_seconds summary
http_request_duration_seconds_sum {}
http_request_duration_seconds_count {}
# HELP http_requests_in_flight HTTP requests being served
# TYPE http_requests_in_flight gauge
http_requests_in_flight {}
# HELP therapy_sessions_opened_total Therapy sessions opened
# TYPE therapy_sessions_opened_total counter
therapy_sessions_opened_total {}
# HELP therapy_sessions_closed_total Therapy sessions that reached the terminal state
# TYPE therapy_sessions_closed_total counter
therapy_sessions_closed_total {}
# HELP gematria_requests_total Gematria computations
# TYPE gematria_requests_total counter
gematria_requests_total {}
# HELP diagnoses_total Complaint diagnoses
# TYPE diagnoses_total counter
diagnoses_total {}
# HELP oracle_calls_total Oracle chat requests
# TYPE oracle_calls_total counter
oracle_calls_total {}
# HELP upstream_errors_total Failed collaborator calls
# TYPE upstream_errors_total counter
upstream_errors_total {}
# HELP errors_total Requests answered with an error status
# TYPE errors_total counter
errors_total {}
"#,
            self.http_requests_total.load(Ordering::SeqCst),
            self.http_request_duration_sum.load(Ordering::SeqCst) as f64 / 1000.0,
            self.http_requests_total.load(Ordering::SeqCst),
            self.in_flight_requests.load(Ordering::SeqCst),
            self.sessions_opened.load(Ordering::SeqCst),
            self.sessions_closed.load(Ordering::SeqCst),
            self.gematria_requests_total.load(Ordering::SeqCst),
            self.diagnoses_total.load(Ordering::SeqCst),
            self.oracle_calls_total.load(Ordering::SeqCst),
            self.upstream_errors_total.load(Ordering::SeqCst),
            self.errors_total.load(Ordering::SeqCst),
        )
    }
}

// ===== Health Check =====

/// 健康检查状态
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
    pub checks: Vec<HealthCheck>,
}

/// 单个健康检查项
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    pub message: Option<String>,
}

/// 健康检查结果
#[derive(Clone)]
pub struct HealthCheckResult {
    pub name: String,
    pub healthy: bool,
    pub message: String,
}

/// 可观测性状态
#[derive(Clone)]
pub struct ObservabilityState {
    pub metrics: Arc<AppMetrics>,
    pub health_checks: Arc<Mutex<Vec<HealthCheckResult>>>,
    pub start_time: DateTime<Utc>,
    pub version: String,
}

impl ObservabilityState {
    pub fn new(version: String) -> Self {
        Self::with_metrics(version, Arc::new(AppMetrics::default()))
    }

    /// 与 API 层共享同一组指标
    pub fn with_metrics(version: String, metrics: Arc<AppMetrics>) -> Self {
        Self {
            metrics,
            health_checks: Arc::new(Mutex::new(Vec::new())),
            start_time: Utc::now(),
            version,
        }
    }

    /// 添加或替换同名健康检查结果
    pub async fn add_health_check(&self, result: HealthCheckResult) {
        let mut checks = self.health_checks.lock().await;
        checks.retain(|c| c.name != result.name);
        checks.push(result);
    }

    /// 获取应用正常运行时间
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_seconds() as f64
    }
}

// ===== Health Check Handlers =====

/// 获取完整健康状态
pub async fn health_check(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let checks = state.health_checks.lock().await;
    let all_healthy = checks.iter().all(|c| c.healthy);
    let label = |healthy: bool| if healthy { "healthy" } else { "unhealthy" }.to_string();

    let health_status = HealthStatus {
        status: label(all_healthy),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
        checks: checks
            .iter()
            .map(|c| HealthCheck {
                name: c.name.clone(),
                status: label(c.healthy),
                message: Some(c.message.clone()),
            })
            .collect(),
    };

    let status_code = if all_healthy {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health_status))
}

/// 简单存活检查
pub async fn liveness() -> impl IntoResponse {
    "OK"
}

/// 就绪检查
pub async fn readiness(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let checks = state.health_checks.lock().await;

    if checks.iter().all(|c| c.healthy) {
        (axum::http::StatusCode::OK, "Ready")
    } else {
        (axum::http::StatusCode::SERVICE_UNAVAILABLE, "Not Ready")
    }
}

/// Prometheus 指标端点
pub async fn metrics(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    (axum::http::StatusCode::OK, state.metrics.gather())
}

/// 版本信息端点
pub async fn version(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": state.version,
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/metrics", get(metrics))
        .route("/version", get(version))
        .with_state(state)
}

// ===== Structured Logging =====

/// 初始化日志
///
/// `RUST_LOG` 优先于配置的级别。配置了 `log_dir` 时额外按天滚动写入文件，
/// 返回的 guard 需要保持到进程退出。
pub fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_writer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, &config.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.structured {
        registry
            .with(fmt::layer().json().with_target(true))
            .with(file_writer.map(|w| fmt::layer().json().with_ansi(false).with_writer(w)))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .with(file_writer.map(|w| fmt::layer().with_ansi(false).with_writer(w)))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already initialized: {}", e);
    }
    guard
}

// ===== Request Metrics Middleware =====

/// 记录请求指标的中间件
pub async fn metrics_middleware(
    State(metrics): State<Arc<AppMetrics>>,
    req: Request,
    next: Next,
) -> Response {
    let start = std::time::Instant::now();
    metrics.in_flight_requests.fetch_add(1, Ordering::SeqCst);

    let response = next.run(req).await;

    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status();
    metrics.record_http_request(duration_ms, status.is_client_error() || status.is_server_error());
    if status == axum::http::StatusCode::BAD_GATEWAY {
        metrics.record_upstream_error();
    }
    metrics.in_flight_requests.fetch_sub(1, Ordering::SeqCst);

    response
}
