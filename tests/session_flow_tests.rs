// Integration tests for the therapist session flow
//
// Tests cover:
// - Full three-turn session against the bundled symbol table
// - Closing hooks writing to the JSON Lines memory log
// - Gematria and diagnosis through the public service API

use scii_oracle::config::config::ClosingAction;
use scii_oracle::models::memory::ActiveMemoryEntry;
use scii_oracle::models::session::SessionState;
use scii_oracle::services::session::{SESSION_CLOSED, create_closing_hook};
use scii_oracle::services::{
    ConfirmedHit, DiagnosisService, GematriaService, SessionService, create_session_service,
};
use scii_oracle::storage::{ActiveMemoryLog, InMemorySessionStore, JsonlMemoryLog};
use scii_oracle::symbols::SymbolTable;
use std::path::Path;
use std::sync::Arc;

fn symbols() -> Arc<SymbolTable> {
    Arc::new(SymbolTable::bundled().expect("bundled symbol table"))
}

fn read_entries(path: &Path) -> Vec<ActiveMemoryEntry> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn sessions(action: ClosingAction, log: Arc<dyn ActiveMemoryLog>) -> Box<dyn SessionService> {
    let symbols = symbols();
    let hook = create_closing_hook(action, symbols.clone(), log);
    create_session_service(Arc::new(InMemorySessionStore::new()), symbols, hook)
}

#[tokio::test]
async fn test_session_records_memory_on_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memory").join("active_memory.jsonl");
    let log: Arc<dyn ActiveMemoryLog> = Arc::new(JsonlMemoryLog::new(&path));
    let service = sessions(ClosingAction::RecordMemory, log);

    let opened = service.handle_message("ana", None, "olá").await.unwrap();
    assert_eq!(opened.state, Some(SessionState::Opened));
    let id = opened.session_id.clone();

    let first = service
        .handle_message("ana", Some(&id), "sinto muita raiva e conflito")
        .await
        .unwrap();
    assert_eq!(first.state, Some(SessionState::Exploration1));
    assert!(first.reply.contains("'Shin'"));

    let second = service.handle_message("ana", Some(&id), "no estômago").await.unwrap();
    assert_eq!(second.state, Some(SessionState::Exploration2));
    assert!(second.reply.contains("'no estômago'"));

    let last = service.handle_message("ana", Some(&id), "um calor").await.unwrap();
    assert!(last.closed);
    assert_eq!(last.state, None);
    assert_eq!(last.status.as_deref(), Some(SESSION_CLOSED));
    assert_eq!(service.active_sessions().await.unwrap(), 0);

    let entries = read_entries(&path);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].complaint, "sinto muita raiva e conflito");
    assert_eq!(entries[0].letters, vec!["Shin".to_string()]);
    assert_eq!(entries[0].diagnosis, "Local: no estômago; Sensação: um calor");
}

#[tokio::test]
async fn test_meditation_hook_extends_closing_reply() {
    let dir = tempfile::tempdir().unwrap();
    let log: Arc<dyn ActiveMemoryLog> = Arc::new(JsonlMemoryLog::new(dir.path().join("m.jsonl")));
    let service = sessions(ClosingAction::Meditation, log);

    let id = service.handle_message("u", None, "").await.unwrap().session_id;
    service.handle_message("u", Some(&id), "um bloqueio").await.unwrap();
    service.handle_message("u", Some(&id), "na barriga").await.unwrap();
    let last = service.handle_message("u", Some(&id), "um vazio").await.unwrap();

    assert!(last.closed);
    assert!(last.reply.contains("Mem"));
    assert!(!dir.path().join("m.jsonl").exists());
}

#[tokio::test]
async fn test_unknown_session_id_opens_new_session() {
    let log: Arc<dyn ActiveMemoryLog> = Arc::new(JsonlMemoryLog::new("unused.jsonl"));
    let service = sessions(ClosingAction::None, log);

    let reply = service
        .handle_message("u", Some("does-not-exist"), "oi")
        .await
        .unwrap();
    assert_eq!(reply.state, Some(SessionState::Opened));
    assert_ne!(reply.session_id, "does-not-exist");
    assert_eq!(service.active_sessions().await.unwrap(), 1);
}

#[tokio::test]
async fn test_confirm_hit_appends_to_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("active_memory.jsonl");
    let service = DiagnosisService::new(symbols(), Arc::new(JsonlMemoryLog::new(&path)));

    let letters = service.diagnose("eu sinto um bloqueio");
    assert_eq!(letters, vec!["Mem".to_string()]);

    for _ in 0..2 {
        service
            .confirm_hit(ConfirmedHit {
                complaint: "eu sinto um bloqueio".into(),
                letters: letters.clone(),
                diagnosis: "Água parada".into(),
            })
            .await
            .unwrap();
    }
    assert_eq!(read_entries(&path).len(), 2);
}

#[test]
fn test_gematria_totals_match_breakdown() {
    let gematria = GematriaService::new(symbols(), true).unwrap();

    for text in ["bat", "Amor", "shalom", "água viva 123"] {
        let result = gematria.compute(text);
        let sum: u64 = result.breakdown.iter().map(|e| u64::from(e.value)).sum();
        assert_eq!(result.total_value, sum, "text: {}", text);
        assert!(result.breakdown.len() <= text.chars().count());
    }
    assert_eq!(gematria.compute("bat").total_value, 12);
}
