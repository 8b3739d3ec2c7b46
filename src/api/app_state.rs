use crate::observability::AppMetrics;
use crate::services::diagnosis::DiagnosisService;
use crate::services::gematria::GematriaService;
use crate::services::gnosis::GnosisService;
use crate::services::letters::LetterService;
use crate::services::oracle::OracleService;
use crate::services::session::SessionService;
use crate::services::tarot::TarotService;
use crate::symbols::SymbolTable;
use std::sync::Arc;

/// Application state containing all shared services
#[derive(Clone)]
pub struct AppState {
    /// Read-only symbol table shared by every service
    pub symbols: Arc<SymbolTable>,
    /// Letter lookups, personas, text analysis and meditations
    pub letters: Arc<LetterService>,
    /// Gematria computation
    pub gematria: Arc<GematriaService>,
    /// Keyword diagnosis and confirmed hits
    pub diagnosis: Arc<DiagnosisService>,
    /// Tarot spread interpretation
    pub tarot: Arc<TarotService>,
    /// Therapist session state machine
    pub session_service: Arc<dyn SessionService>,
    /// Chart + archetype soul map
    pub gnosis: Arc<GnosisService>,
    /// Oracle chat, absent when disabled in config
    pub oracle: Option<Arc<OracleService>>,
    /// Counters shared with the observability router
    pub metrics: Arc<AppMetrics>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("symbols", &self.symbols.len())
            .field("letters", &"Arc<LetterService>")
            .field("gematria", &"Arc<GematriaService>")
            .field("diagnosis", &"Arc<DiagnosisService>")
            .field("tarot", &"Arc<TarotService>")
            .field("session_service", &"Arc<dyn SessionService>")
            .field("gnosis", &"Arc<GnosisService>")
            .field("oracle", &self.oracle.is_some())
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        symbols: Arc<SymbolTable>,
        gematria: GematriaService,
        diagnosis: DiagnosisService,
        session_service: Box<dyn SessionService>,
        gnosis: Arc<GnosisService>,
        oracle: Option<OracleService>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            letters: Arc::new(LetterService::new(symbols.clone())),
            tarot: Arc::new(TarotService::new(symbols.clone())),
            symbols,
            gematria: Arc::new(gematria),
            diagnosis: Arc::new(diagnosis),
            session_service: Arc::from(session_service),
            gnosis,
            oracle: oracle.map(Arc::new),
            metrics,
        }
    }
}
