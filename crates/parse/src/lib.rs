// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static regex::Regex {
            static R: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
            R.get_or_init(|| regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}

pub mod amount;
pub mod balance;
pub mod banks;
pub mod carryover;
pub mod classify;
pub mod config;
pub mod cursor;
pub mod pipeline;
pub mod review;
pub mod session;
pub mod source;
pub mod text;
pub mod totals;

pub use amount::{AmountTokenizer, TokenShape, Tokenized};
pub use balance::resolve_direction;
pub use banks::{BanamexPipeline, BanbajioPipeline, BanortePipeline, BbvaPipeline};
pub use carryover::Carryover;
pub use classify::{LineClassifier, LineKind, RecordStart, Ruleset, SectionRules};
pub use config::{BankOverrides, ConfigError, EngineConfig};
pub use cursor::LineCursor;
pub use pipeline::{
    parse_document, parse_source, parse_statement, BankPipeline, PagePolicy, ParseError,
    ParsedDocument, ParsedStatement, StatementRecords,
};
pub use review::{requires_confirmation, review_export, ConfirmationRequired};
pub use session::{ParseSession, RecordBuilder};
pub use source::{FormFeedText, PageFiles, PageSource, SourceError, StaticPages};
pub use totals::TotalsExtractor;
