//! 服务模块

pub mod diagnosis;
pub mod gematria;
pub mod gnosis;
pub mod letters;
pub mod oracle;
pub mod session;
pub mod tarot;

pub use diagnosis::{ConfirmedHit, DiagnosisService, HIT_RECORDED, diagnose};
pub use gematria::{GematriaEntry, GematriaResult, GematriaService};
pub use gnosis::{BirthRequest, BirthTime, GnosisService, NormalizedBirth};
pub use letters::{LetterService, LetterView, Meditation, Persona, TextAnalysis, guided_meditation};
pub use oracle::{OracleReply, OracleService};
pub use session::{SessionReply, SessionService, create_session_service};
pub use tarot::{CardInsight, SpreadReading, TarotService};
