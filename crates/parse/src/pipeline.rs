use std::borrow::Cow;

use extracto_core::{
    BanamexRecord, BanbajioRecord, Bank, BankError, BanorteRecord, BbvaRecord, StatementTotals,
    TransactionRecord,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::banks::{BanamexPipeline, BanbajioPipeline, BanortePipeline, BbvaPipeline};
use crate::classify::{LineClassifier, LineKind};
use crate::config::{ConfigError, EngineConfig};
use crate::cursor::LineCursor;
use crate::session::{ParseSession, RecordBuilder};
use crate::source::{PageSource, SourceError};
use crate::totals::TotalsExtractor;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("No page text to parse")]
    EmptyDocument,
    #[error("Invalid statement year {0}")]
    InvalidYear(i32),
    #[error(transparent)]
    UnsupportedBank(#[from] BankError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to read pages: {0}")]
    Source(#[from] SourceError),
}

/// How open records and section state behave at page and section edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    /// Park the open record at page end and resume it on the next page.
    pub carry_across_pages: bool,
    /// Flush the open record when a section starts or ends.
    pub flush_on_section_boundary: bool,
}

/// One bank layout: page text in, records out, plus the totals pass.
pub trait BankPipeline {
    type Builder: RecordBuilder;

    fn bank(&self) -> Bank;

    fn classifier(&self) -> &LineClassifier;

    fn policy(&self) -> PagePolicy;

    /// Normalize raw page text before it is split into lines.
    fn prepare_page<'t>(&self, text: &'t str) -> Cow<'t, str> {
        Cow::Borrowed(text)
    }

    fn begin(&self, year: i32) -> ParseSession<Self::Builder> {
        ParseSession::new(year, self.classifier().initially_in_section())
    }

    fn parse_page(
        &self,
        mut session: ParseSession<Self::Builder>,
        text: &str,
    ) -> ParseSession<Self::Builder> {
        let classifier = self.classifier();
        let policy = self.policy();
        session.begin_page(policy, classifier);

        let text = self.prepare_page(text);
        let mut cursor = LineCursor::new(&text);
        while let Some(line) = cursor.advance() {
            match classifier.classify(line, session.in_section()) {
                LineKind::Noise => {
                    if !line.is_empty() {
                        trace!(line, "noise");
                    }
                }
                LineKind::SectionStart => {
                    if policy.flush_on_section_boundary {
                        session.flush();
                    }
                    if !session.in_section() {
                        debug!(bank = %self.bank(), "detail section started");
                    }
                    session.set_in_section(true);
                }
                LineKind::SectionEnd => {
                    if policy.flush_on_section_boundary {
                        session.flush();
                    }
                    debug!(bank = %self.bank(), "detail section ended");
                    session.set_in_section(false);
                }
                LineKind::RecordStart(start) => {
                    let mut builder = <Self::Builder as RecordBuilder>::open(start, session.year());
                    builder.absorb_following(&mut cursor, classifier);
                    session.open_record(builder);
                }
                LineKind::Continuation => {
                    if !session.append(line) {
                        trace!(line, "continuation without open record");
                    }
                }
            }
        }

        session.end_page(policy);
        session
    }

    fn finish(
        &self,
        session: ParseSession<Self::Builder>,
    ) -> Vec<<Self::Builder as RecordBuilder>::Record> {
        session.finish()
    }

    fn totals(&self, full_text: &str) -> StatementTotals {
        TotalsExtractor::for_bank(self.bank()).extract(full_text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument<R> {
    pub records: Vec<R>,
    pub totals: StatementTotals,
}

fn validate(pages: &[impl AsRef<str>], year: i32) -> Result<(), ParseError> {
    if !(1..=9999).contains(&year) {
        return Err(ParseError::InvalidYear(year));
    }
    if pages.iter().all(|p| p.as_ref().trim().is_empty()) {
        return Err(ParseError::EmptyDocument);
    }
    Ok(())
}

/// Parse a whole document with one pipeline.
///
/// Pages are fed strictly in order; anything still open after the last page
/// is flushed. Totals come from a separate pass over all page text.
pub fn parse_document<P: BankPipeline>(
    pipeline: &P,
    pages: &[impl AsRef<str>],
    year: i32,
) -> Result<ParsedDocument<<P::Builder as RecordBuilder>::Record>, ParseError> {
    validate(pages, year)?;

    let mut session = pipeline.begin(year);
    for (index, page) in pages.iter().enumerate() {
        debug!(bank = %pipeline.bank(), page = index + 1, "parsing page");
        session = pipeline.parse_page(session, page.as_ref());
    }
    let records = pipeline.finish(session);

    let full_text = pages
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<&str>>()
        .join("\n");
    let totals = pipeline.totals(&full_text);

    info!(
        bank = %pipeline.bank(),
        pages = pages.len(),
        records = records.len(),
        deposits = %totals.deposits,
        withdrawals = %totals.withdrawals,
        "statement parsed"
    );
    Ok(ParsedDocument { records, totals })
}

/// Records of one statement, in the shape of its bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "bank", content = "records", rename_all = "lowercase")]
pub enum StatementRecords {
    Bbva(Vec<BbvaRecord>),
    Banbajio(Vec<BanbajioRecord>),
    Banamex(Vec<BanamexRecord>),
    Banorte(Vec<BanorteRecord>),
}

impl StatementRecords {
    pub fn bank(&self) -> Bank {
        match self {
            StatementRecords::Bbva(_) => Bank::Bbva,
            StatementRecords::Banbajio(_) => Bank::Banbajio,
            StatementRecords::Banamex(_) => Bank::Banamex,
            StatementRecords::Banorte(_) => Bank::Banorte,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            StatementRecords::Bbva(r) => r.len(),
            StatementRecords::Banbajio(r) => r.len(),
            StatementRecords::Banamex(r) => r.len(),
            StatementRecords::Banorte(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<TransactionRecord> {
        match self {
            StatementRecords::Bbva(r) => r.last().cloned().map(Into::into),
            StatementRecords::Banbajio(r) => r.last().cloned().map(Into::into),
            StatementRecords::Banamex(r) => r.last().cloned().map(Into::into),
            StatementRecords::Banorte(r) => r.last().cloned().map(Into::into),
        }
    }

    pub fn into_transactions(self) -> Vec<TransactionRecord> {
        match self {
            StatementRecords::Bbva(r) => r.into_iter().map(Into::into).collect(),
            StatementRecords::Banbajio(r) => r.into_iter().map(Into::into).collect(),
            StatementRecords::Banamex(r) => r.into_iter().map(Into::into).collect(),
            StatementRecords::Banorte(r) => r.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedStatement {
    pub year: i32,
    #[serde(flatten)]
    pub records: StatementRecords,
    pub totals: StatementTotals,
}

impl ParsedStatement {
    pub fn bank(&self) -> Bank {
        self.records.bank()
    }
}

/// Parse `pages` with the built-in rules for `bank`, extended by `config`.
pub fn parse_statement(
    bank: Bank,
    pages: &[impl AsRef<str>],
    year: i32,
    config: &EngineConfig,
) -> Result<ParsedStatement, ParseError> {
    validate(pages, year)?;
    let overrides = config.overrides(bank);

    let (records, totals) = match bank {
        Bank::Bbva => {
            let doc = parse_document(&BbvaPipeline::with_overrides(overrides)?, pages, year)?;
            (StatementRecords::Bbva(doc.records), doc.totals)
        }
        Bank::Banbajio => {
            let doc = parse_document(&BanbajioPipeline::with_overrides(overrides)?, pages, year)?;
            (StatementRecords::Banbajio(doc.records), doc.totals)
        }
        Bank::Banamex => {
            let doc = parse_document(&BanamexPipeline::with_overrides(overrides)?, pages, year)?;
            (StatementRecords::Banamex(doc.records), doc.totals)
        }
        Bank::Banorte => {
            let doc = parse_document(&BanortePipeline::with_overrides(overrides)?, pages, year)?;
            (StatementRecords::Banorte(doc.records), doc.totals)
        }
    };

    Ok(ParsedStatement {
        year,
        records,
        totals,
    })
}

/// Resolve the bank selector, pull pages from `source`, and parse.
pub fn parse_source(
    selector: &str,
    source: &impl PageSource,
    year: i32,
    config: &EngineConfig,
) -> Result<ParsedStatement, ParseError> {
    let bank: Bank = selector.parse()?;
    let pages = source.pages()?;
    parse_statement(bank, &pages, year, config)
}
