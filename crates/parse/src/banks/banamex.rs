use std::borrow::Cow;

use extracto_core::{BanamexRecord, Bank, Money};
use tracing::trace;

use crate::amount::{AmountTokenizer, TokenShape};
use crate::classify::{LineClassifier, RecordStart, Ruleset, SectionRules};
use crate::config::{BankOverrides, ConfigError};
use crate::pipeline::{BankPipeline, PagePolicy};
use crate::session::RecordBuilder;
use crate::text::{collapse_whitespace, TextBuffer};

re!(
    re_record_start,
    r"(?i)^(?P<day>\d{1,2})[\s-]+(?P<month>ENE|FEB|MAR|ABR|MAY|JUN|JUL|AGO|SEP|OCT|NOV|DIC)\b\s*(?P<rest>.*)$"
);
re!(re_dashed_date, r"(?i)(\d{1,2})-([A-Z]{3})");
re!(re_importe, r"(?i)IMPORTE:\s*\$?\s*");
re!(re_column_header, r"(?i)FECHA.*CONCEPTO|CONCEPTO.*FECHA");
re!(re_page_counter, r"(?i)P[ÁA]GINA:\s*\d+\s*DE\s*\d+");

const NOISE: &[&str] = &["CIFIBANAMEX"];

const SECTION_START: &[&str] = &["DETALLE DE OPERACIONES"];
const SECTION_END: &[&str] = &[
    "COMISIONES COBRADAS",
    "RESUMEN",
    "ESTADO DE CUENTA",
    "CLIENTE:",
    "SUBTOTALES",
    "SALDO MINIMO REQUERIDO",
];

/// Amounts after an `IMPORTE:` marker; `$`-prefixed figures are not movements.
const IMPORTE_AMOUNTS: AmountTokenizer =
    AmountTokenizer::new(TokenShape::Bounded).skipping_currency_prefixed();

/// Amounts in blocks without a marker. Reference numbers and exchange rates
/// look like money, so figures just after those labels are skipped.
const FALLBACK_AMOUNTS: AmountTokenizer =
    AmountTokenizer::new(TokenShape::Bounded).excluding(&["REF", "RFB", "DIVISA"], 15);

fn ruleset() -> Ruleset {
    Ruleset::new(re_record_start())
        .with_noise(NOISE)
        .with_noise_pattern(re_column_header())
        .with_noise_pattern(re_page_counter())
        .with_section(SectionRules {
            start: SECTION_START.iter().map(|s| s.to_string()).collect(),
            end: SECTION_END.iter().map(|s| s.to_string()).collect(),
            initially_active: false,
            reset_each_page: false,
        })
}

/// Concept, amount and balance from one flattened movement block.
fn parse_block(block: &str) -> (String, Option<Money>, Option<Money>) {
    match re_importe().find(block) {
        Some(marker) => {
            let concept = collapse_whitespace(&block[..marker.start()]);
            let tail = re_importe().replace_all(&block[marker.start()..], " ");
            let amounts = IMPORTE_AMOUNTS.tokenize(&tail);
            (concept, amounts.primary(), amounts.secondary())
        }
        None => {
            let amounts = FALLBACK_AMOUNTS.tokenize(block);
            let (amount, balance) = (amounts.primary(), amounts.secondary());
            (amounts.residual, amount, balance)
        }
    }
}

/// Raw text of one movement. Nothing is interpreted until the block is
/// complete, which may be pages after it opened.
#[derive(Debug, Clone)]
pub struct BanamexBuilder {
    date: String,
    year: i32,
    block: TextBuffer,
}

impl RecordBuilder for BanamexBuilder {
    type Record = BanamexRecord;

    fn open(start: RecordStart, year: i32) -> Self {
        Self {
            date: start.primary_date,
            year,
            block: TextBuffer::from(start.rest.as_str()),
        }
    }

    fn append(&mut self, line: &str, _in_reference: &mut bool) {
        self.block.push(line);
    }

    fn build(self) -> Option<BanamexRecord> {
        if self.block.is_empty() {
            trace!(date = %self.date, "movement block without text");
            return None;
        }
        let (concept, amount, balance) = parse_block(&self.block.into_text());
        Some(BanamexRecord {
            date: self.date,
            year: self.year,
            concept,
            amount,
            balance,
        })
    }
}

/// Banamex statements: movements live under "DETALLE DE OPERACIONES" and a
/// movement may continue on the next page.
#[derive(Debug, Clone)]
pub struct BanamexPipeline {
    classifier: LineClassifier,
}

impl BanamexPipeline {
    pub fn new() -> Self {
        Self {
            classifier: LineClassifier::new(ruleset()),
        }
    }

    pub fn with_overrides(overrides: &BankOverrides) -> Result<Self, ConfigError> {
        Ok(Self {
            classifier: super::classifier(Bank::Banamex, ruleset(), overrides)?,
        })
    }
}

impl Default for BanamexPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl BankPipeline for BanamexPipeline {
    type Builder = BanamexBuilder;

    fn bank(&self) -> Bank {
        Bank::Banamex
    }

    fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    fn policy(&self) -> PagePolicy {
        PagePolicy {
            carry_across_pages: true,
            flush_on_section_boundary: false,
        }
    }

    /// `05-ENE` is printed as often as `05 ENE`.
    fn prepare_page<'t>(&self, text: &'t str) -> Cow<'t, str> {
        re_dashed_date().replace_all(text, "$1 $2")
    }
}
