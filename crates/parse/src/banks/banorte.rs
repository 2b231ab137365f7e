use extracto_core::{Bank, BanorteRecord, Money};

use crate::amount::{AmountTokenizer, TokenShape};
use crate::balance;
use crate::classify::{LineClassifier, RecordStart, Ruleset, SectionRules};
use crate::config::{BankOverrides, ConfigError};
use crate::pipeline::{BankPipeline, PagePolicy};
use crate::session::RecordBuilder;
use crate::text::TextBuffer;

re!(re_record_start, r"^(?P<day>\d{2})-(?P<month>[A-Z]{3})-(?P<yy>\d{2})(?P<rest>.*)$");

const NOISE: &[&str] = &[
    "Línea Directa para su empresa:",
    "Visita nuestra página:",
    "Banco Mercantil del Norte S.A.",
    "Institución de Banca Múltiple Grupo Financiero Banorte",
    "ESTADO DE CUENTA / ENLACE NEGOCIOS PFAE",
];

/// Only whole words count; figures glued to text are part of the description.
const AMOUNTS: AmountTokenizer = AmountTokenizer::new(TokenShape::WholeWord);

fn ruleset() -> Ruleset {
    Ruleset::new(re_record_start())
        .with_noise(NOISE)
        .with_section(SectionRules {
            start: vec!["DETALLE DE MOVIMIENTOS (PESOS)".to_string()],
            end: vec!["OTROS".to_string()],
            initially_active: false,
            reset_each_page: false,
        })
}

#[derive(Debug, Clone)]
pub struct BanorteBuilder {
    date: String,
    year: i32,
    description: TextBuffer,
    amount: Option<Money>,
    balance: Option<Money>,
}

impl BanorteBuilder {
    /// The last figure on a line is the running balance. Only a pair names
    /// the movement; a lone balance clears it.
    fn absorb(&mut self, fragment: &str) {
        let tokens = AMOUNTS.tokenize(fragment);
        self.description.push(&tokens.residual);
        if tokens.is_empty() {
            return;
        }
        self.balance = tokens.last();
        match tokens.len() {
            1 => self.amount = None,
            2 => self.amount = tokens.primary(),
            _ => {}
        }
    }
}

impl RecordBuilder for BanorteBuilder {
    type Record = BanorteRecord;

    fn open(start: RecordStart, year: i32) -> Self {
        let mut builder = Self {
            date: start.primary_date,
            year,
            description: TextBuffer::new(),
            amount: None,
            balance: None,
        };
        builder.absorb(&start.rest);
        builder
    }

    fn append(&mut self, line: &str, _in_reference: &mut bool) {
        self.absorb(line);
    }

    fn build(self) -> Option<BanorteRecord> {
        Some(BanorteRecord {
            date: self.date,
            year: self.year,
            description: self.description.into_text(),
            amount: self.amount,
            direction: None,
            balance: self.balance,
        })
    }

    fn settle(record: &mut BanorteRecord, previous_balance: &mut Option<Money>) {
        balance::settle(record, previous_balance);
    }
}

/// Banorte statements: movements under "DETALLE DE MOVIMIENTOS (PESOS)",
/// deposit or withdrawal told apart by the running balance.
#[derive(Debug, Clone)]
pub struct BanortePipeline {
    classifier: LineClassifier,
}

impl BanortePipeline {
    pub fn new() -> Self {
        Self {
            classifier: LineClassifier::new(ruleset()),
        }
    }

    pub fn with_overrides(overrides: &BankOverrides) -> Result<Self, ConfigError> {
        Ok(Self {
            classifier: super::classifier(Bank::Banorte, ruleset(), overrides)?,
        })
    }
}

impl Default for BanortePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl BankPipeline for BanortePipeline {
    type Builder = BanorteBuilder;

    fn bank(&self) -> Bank {
        Bank::Banorte
    }

    fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    fn policy(&self) -> PagePolicy {
        PagePolicy {
            carry_across_pages: true,
            flush_on_section_boundary: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse_document;
    use extracto_core::Direction;

    fn parse(pages: &[&str]) -> Vec<BanorteRecord> {
        parse_document(&BanortePipeline::new(), pages, 2024).unwrap().records
    }

    fn m(cents: i64) -> Option<Money> {
        Some(Money::from_cents(cents))
    }

    const HEADER: &str = "DETALLE DE MOVIMIENTOS (PESOS)";

    #[test]
    fn balance_delta_decides_direction() {
        let page = format!(
            "{HEADER}\n\
             01-ENE-24 SALDO INICIAL 1,000.00\n\
             02-ENE-24 COMPRA TIENDA 50.00 950.00\n\
             03-ENE-24 SPEI RECIBIDO 100.00 1,050.00"
        );
        let recs = parse(&[page.as_str()]);
        assert_eq!(recs.len(), 3);

        assert_eq!(recs[0].date, "01-ENE-24");
        assert_eq!(recs[0].amount, None);
        assert_eq!(recs[0].balance, m(100000));

        assert_eq!(recs[1].direction, Some(Direction::Withdrawal));
        assert_eq!(recs[1].withdrawal(), m(5000));
        assert_eq!(recs[1].description, "COMPRA TIENDA");

        assert_eq!(recs[2].direction, Some(Direction::Deposit));
        assert_eq!(recs[2].deposit(), m(10000));
    }

    #[test]
    fn first_movement_without_previous_balance_is_unresolved() {
        let page = format!("{HEADER}\n05-ENE-24 PAGO 50.00 950.00");
        let recs = parse(&[page.as_str()]);
        assert!(recs[0].is_unresolved());
        assert_eq!(recs[0].amount, m(5000));
    }

    #[test]
    fn unchanged_balance_is_unresolved() {
        let page = format!("{HEADER}\n05-ENE-24 A 1,000.00\n06-ENE-24 B 10.00 1,000.00");
        let recs = parse(&[page.as_str()]);
        assert!(recs[1].is_unresolved());
    }

    #[test]
    fn figures_on_continuation_lines_replace_earlier_ones() {
        let page = format!(
            "{HEADER}\n\
             01-ENE-24 INICIAL 1,000.00\n\
             02-ENE-24 TRANSFERENCIA\n\
             CUENTA 0012345 200.00 800.00\n\
             FOLIO ABC123.45X"
        );
        let recs = parse(&[page.as_str()]);
        assert_eq!(recs[1].description, "TRANSFERENCIA CUENTA 0012345 FOLIO ABC123.45X");
        assert_eq!(recs[1].amount, m(20000));
        assert_eq!(recs[1].balance, m(80000));
        assert_eq!(recs[1].direction, Some(Direction::Withdrawal));
    }

    #[test]
    fn lines_outside_detail_section_are_ignored() {
        let page = format!(
            "01-ENE-24 ANTES 5.00 5.00\n\
             {HEADER}\n\
             02-ENE-24 DENTRO 5.00 10.00\n\
             OTROS CARGOS\n\
             03-ENE-24 DESPUES 1.00 1.00"
        );
        let recs = parse(&[page.as_str()]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].description, "DENTRO");
    }

    #[test]
    fn previous_balance_carries_across_pages() {
        let first = format!("{HEADER}\n01-ENE-24 INICIAL 2,000.00");
        let second = "Banco Mercantil del Norte S.A.\n02-ENE-24 CARGO 500.00 1,500.00";
        let recs = parse(&[first.as_str(), second]);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1].withdrawal(), m(50000));
    }

    #[test]
    fn movement_split_by_page_break_keeps_its_figures() {
        let first = format!(
            "{HEADER}\n\
             01-ENE-24 INICIAL 1,000.00\n\
             02-ENE-24 DEPOSITO NOMINA"
        );
        let second = "\
Visita nuestra página: banorte.com
EMPRESA SA 100.00 1,100.00
03-ENE-24 CARGO 5.00 1,095.00";
        let recs = parse(&[first.as_str(), second]);
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[1].description, "DEPOSITO NOMINA EMPRESA SA");
        assert_eq!(recs[1].deposit(), m(10000));
        assert_eq!(recs[1].balance, m(110000));
        assert_eq!(recs[2].withdrawal(), m(500));
    }

    #[test]
    fn only_a_pair_of_figures_sets_the_movement() {
        let page = format!(
            "{HEADER}\n\
             01-ENE-24 INICIAL 1,000.00\n\
             02-ENE-24 PAGO 50.00 950.00\n\
             REFERENCIA 1.00 2.00 900.00\n\
             03-ENE-24 AJUSTE 10.00 890.00\n\
             SALDO 890.00"
        );
        let recs = parse(&[page.as_str()]);
        assert_eq!(recs[1].amount, m(5000));
        assert_eq!(recs[1].balance, m(90000));
        assert_eq!(recs[1].description, "PAGO REFERENCIA");
        assert_eq!(recs[2].amount, None);
        assert_eq!(recs[2].balance, m(89000));
    }

    #[test]
    fn lowercase_month_is_not_a_record() {
        let page = format!("{HEADER}\n01-ene-24 PAGO 1.00 2.00");
        assert!(parse(&[page.as_str()]).is_empty());
    }
}
