#[cfg(test)]
mod router_tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::api::{app_state::AppState, create_router};
    use crate::config::config::ChartEngineConfig;
    use crate::error::AppError;
    use crate::external::chart::MockChartEngine;
    use crate::models::chart::{HousePosition, NatalChart, Placement};
    use crate::models::session::{SessionState, TherapySession};
    use crate::observability::AppMetrics;
    use crate::services::{
        DiagnosisService, GematriaService, GnosisService, create_session_service,
        session::NoClosingHook,
    };
    use crate::storage::{
        InMemoryMemoryLog, InMemorySessionStore, LocalArchetypeStore, SessionStore,
    };
    use crate::symbols::SymbolTable;

    fn app_with(engine: MockChartEngine) -> (Router, Arc<InMemoryMemoryLog>, Arc<AppMetrics>) {
        app_with_store(engine, Arc::new(InMemorySessionStore::new()))
    }

    fn app_with_store(
        engine: MockChartEngine,
        store: Arc<InMemorySessionStore>,
    ) -> (Router, Arc<InMemoryMemoryLog>, Arc<AppMetrics>) {
        let symbols = Arc::new(SymbolTable::bundled().unwrap());
        let memory_log = Arc::new(InMemoryMemoryLog::new());
        let metrics = Arc::new(AppMetrics::default());

        let gnosis = Arc::new(GnosisService::new(
            Arc::new(engine),
            Arc::new(LocalArchetypeStore::new(symbols.clone())),
            &ChartEngineConfig::default(),
        ));
        let state = AppState::new(
            symbols.clone(),
            GematriaService::new(symbols.clone(), true).unwrap(),
            DiagnosisService::new(symbols.clone(), memory_log.clone()),
            create_session_service(
                store,
                symbols,
                Arc::new(NoClosingHook),
            ),
            gnosis,
            None,
            metrics.clone(),
        );
        (create_router(state), memory_log, metrics)
    }

    fn app() -> Router {
        app_with(MockChartEngine::new()).0
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_welcome_reports_letter_count() {
        let (status, body) = send(&app(), "GET", "/api/v1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["letters"], 22);
    }

    #[tokio::test]
    async fn test_letter_personas() {
        let app = app();

        let (status, body) = send(&app, "GET", "/api/v1/letters/aleph", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Aleph");
        assert_eq!(body["value"], 1);

        let (status, body) = send(&app, "GET", "/api/v1/letters/Aleph?persona=poet", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["persona"], "poet");
        assert!(body["reply"].is_string());

        let (status, _) = send(&app, "GET", "/api/v1/letters/Aleph?persona=bard", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "GET", "/api/v1/letters/Omega", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_body_zone_returns_first_match() {
        let (status, body) = send(&app(), "GET", "/api/v1/body/m%C3%A3o", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Chet");
    }

    #[tokio::test]
    async fn test_gematria_endpoint() {
        let (app, _, metrics) = app_with(MockChartEngine::new());
        let (status, body) = send(&app, "POST", "/api/v1/gematria", Some(json!({"text": "bat"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_value"], 12);
        assert_eq!(body["breakdown"].as_array().unwrap().len(), 3);
        assert!(metrics.gather().contains("gematria_requests_total 1"));
    }

    #[tokio::test]
    async fn test_diagnose_and_confirm() {
        let (app, memory_log, _) = app_with(MockChartEngine::new());

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/diagnose",
            Some(json!({"complaint": "eu sinto um bloqueio"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["letters"], json!(["Mem"]));

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/diagnose/confirm",
            Some(json!({
                "complaint": "eu sinto um bloqueio",
                "letters": ["Mem"],
                "diagnosis": "Local: peito; Sensação: peso"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "Aprendizado registrado com sucesso.");
        assert_eq!(memory_log.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_inputs_are_valid_analyses() {
        let app = app();

        let (status, body) = send(&app, "POST", "/api/v1/gematria", Some(json!({"text": ""}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_value"], 0);
        assert_eq!(body["breakdown"], json!([]));
        assert_eq!(body["skipped"], 0);

        for complaint in ["", "   ", "nada a declarar"] {
            let (status, body) = send(
                &app,
                "POST",
                "/api/v1/diagnose",
                Some(json!({"complaint": complaint})),
            )
            .await;
            assert_eq!(status, StatusCode::OK, "complaint: {:?}", complaint);
            assert_eq!(body["letters"], json!([]));
        }
    }

    #[tokio::test]
    async fn test_tarot_spread_and_meditation() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/tarot/spread",
            Some(json!({"cards": ["O Louco", "Carta Inexistente"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["details"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "POST", "/api/v1/meditation", Some(json!({"letter": "Mem"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["letter"], "Mem");
    }

    #[tokio::test]
    async fn test_session_three_turns_reach_terminal_state() {
        let (app, _, metrics) = app_with(MockChartEngine::new());

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/session",
            Some(json!({"user_id": "u1", "message": "olá"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "OPENED");
        let session_id = body["session_id"].as_str().unwrap().to_string();

        let mut states = Vec::new();
        for message in ["eu sinto um bloqueio", "no peito", "um peso"] {
            let (status, body) = send(
                &app,
                "POST",
                "/api/v1/session",
                Some(json!({"user_id": "u1", "session_id": session_id, "message": message})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            states.push(body["state"].clone());
            if body["closed"] == true {
                assert_eq!(body["session_id"], session_id.as_str());
            }
        }
        assert_eq!(states, vec![json!("EXPLORATION_1"), json!("EXPLORATION_2"), Value::Null]);

        let output = metrics.gather();
        assert!(output.contains("therapy_sessions_opened_total 1"));
        assert!(output.contains("therapy_sessions_closed_total 1"));

        // 终止后的 ID 开启新会话
        let (_, body) = send(
            &app,
            "POST",
            "/api/v1/session",
            Some(json!({"user_id": "u1", "session_id": session_id, "message": "de novo"})),
        )
        .await;
        assert_eq!(body["state"], "OPENED");
        assert_ne!(body["session_id"], session_id.as_str());
    }

    #[tokio::test]
    async fn test_corrupted_session_state_is_bad_request() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut session = TherapySession::new("u1");
        session.state = SessionState::Unknown;
        store.put(&session).await.unwrap();
        let (app, _, _) = app_with_store(MockChartEngine::new(), store.clone());

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/session",
            Some(json!({"user_id": "u1", "session_id": session.id, "message": "olá"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_SESSION_STATE");

        let stored = store.get(&session.id).await.unwrap().unwrap();
        assert_eq!(stored.state, SessionState::Unknown);
        assert!(stored.history.is_empty());
    }

    #[tokio::test]
    async fn test_chart_uses_local_archetypes() {
        let mut engine = MockChartEngine::new();
        engine.expect_compute().times(1).returning(|_| {
            let mut chart = NatalChart::new();
            chart.insert(
                "sun".into(),
                Placement {
                    sign: "Aries".into(),
                    house: HousePosition::Number(1),
                },
            );
            Ok(chart)
        });
        let (app, _, _) = app_with(engine);

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/chart",
            Some(json!({
                "name": "Ana",
                "year": 1990, "month": 3, "day": 21,
                "hour": 5, "minute": 30,
                "city": "Vacaria, RS"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["birth"]["time"], "05:30");
        assert_eq!(body["letters"]["sun_letter"]["letter_name"], "He");
    }

    #[tokio::test]
    async fn test_chart_engine_failure_is_bad_gateway() {
        let mut engine = MockChartEngine::new();
        engine
            .expect_compute()
            .returning(|_| Err(AppError::Upstream("ephemeris offline".into())));
        let (app, _, metrics) = app_with(engine);

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/chart",
            Some(json!({"name": "Ana", "date": "1990-03-21", "time": "05:30"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "UPSTREAM_FAILURE");
        assert!(metrics.gather().contains("upstream_errors_total 1"));
    }

    #[tokio::test]
    async fn test_oracle_disabled_is_not_found() {
        let (status, _) = send(
            &app(),
            "POST",
            "/api/v1/oracle/chat",
            Some(json!({"question": "Quem sou eu?"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
