use extracto_core::{BanbajioRecord, Bank};

use crate::amount::{AmountTokenizer, TokenShape, Tokenized};
use crate::classify::{LineClassifier, RecordStart, Ruleset, SectionRules};
use crate::config::{BankOverrides, ConfigError};
use crate::pipeline::{BankPipeline, PagePolicy};
use crate::session::RecordBuilder;
use crate::text::TextBuffer;

re!(re_record_start, r"^(?P<day>\d{1,2})\s+(?P<month>[A-Z]{3})\s+(?P<rest>.*)$");

const NOISE: &[&str] = &[
    "SALDO ANTERIOR",
    "SALDO PROMEDIO",
    "SALDO ACTUAL",
    "TASA ANUAL",
    "ISR",
    "DETALLE DE LA CUENTA",
    "DESCRIPCION DE LA OPERACION",
    "FECHA",
    "NO. REF/DOCT",
];

/// Anything after these on a page is summary, not movements.
const STOP: &[&str] = &["SALDO TOTAL", "TOTAL DE MOVIMIENTOS EN EL PERIODO"];

/// Deposit-or-withdrawal amount, then balance. Either may carry a `$`.
const AMOUNTS: AmountTokenizer = AmountTokenizer::new(TokenShape::Currency);

fn ruleset() -> Ruleset {
    Ruleset::new(re_record_start())
        .with_noise(NOISE)
        .with_section(SectionRules {
            start: Vec::new(),
            end: STOP.iter().map(|s| s.to_string()).collect(),
            initially_active: true,
            reset_each_page: true,
        })
}

#[derive(Debug, Clone)]
pub struct BanbajioBuilder {
    date: String,
    year: i32,
    reference: String,
    description: TextBuffer,
    amounts: Tokenized,
}

impl RecordBuilder for BanbajioBuilder {
    type Record = BanbajioRecord;

    fn open(start: RecordStart, year: i32) -> Self {
        let amounts = AMOUNTS.tokenize(&start.rest);
        // a leading token followed by more text is the reference/document number
        let (reference, description) = match amounts.residual.split_once(' ') {
            Some((reference, description)) => (reference.to_string(), TextBuffer::from(description)),
            None => (String::new(), TextBuffer::from(amounts.residual.as_str())),
        };

        Self {
            date: start.primary_date,
            year,
            reference,
            description,
            amounts,
        }
    }

    fn append(&mut self, line: &str, _in_reference: &mut bool) {
        self.description.push(line);
    }

    fn build(self) -> Option<BanbajioRecord> {
        Some(BanbajioRecord {
            date: self.date,
            year: self.year,
            reference: self.reference,
            description: self.description.into_text(),
            amount: self.amounts.primary(),
            balance: self.amounts.secondary(),
        })
    }
}

/// BanBajío statements: every page starts inside the movement listing, which
/// runs until a totals line.
#[derive(Debug, Clone)]
pub struct BanbajioPipeline {
    classifier: LineClassifier,
}

impl BanbajioPipeline {
    pub fn new() -> Self {
        Self {
            classifier: LineClassifier::new(ruleset()),
        }
    }

    pub fn with_overrides(overrides: &BankOverrides) -> Result<Self, ConfigError> {
        Ok(Self {
            classifier: super::classifier(Bank::Banbajio, ruleset(), overrides)?,
        })
    }
}

impl Default for BanbajioPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl BankPipeline for BanbajioPipeline {
    type Builder = BanbajioBuilder;

    fn bank(&self) -> Bank {
        Bank::Banbajio
    }

    fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    fn policy(&self) -> PagePolicy {
        PagePolicy {
            carry_across_pages: false,
            flush_on_section_boundary: true,
        }
    }
}
