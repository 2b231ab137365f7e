use extracto_core::{Bank, BbvaRecord};
use tracing::trace;

use crate::amount::{AmountTokenizer, TokenShape, Tokenized};
use crate::classify::{LineClassifier, RecordStart, Ruleset};
use crate::config::{BankOverrides, ConfigError};
use crate::cursor::LineCursor;
use crate::pipeline::{BankPipeline, PagePolicy};
use crate::session::RecordBuilder;
use crate::text::TextBuffer;

re!(
    re_record_start,
    r"^(?P<day>\d{2})/(?P<month>[A-Z]{3})\s+(?P<day2>\d{2})/(?P<month2>[A-Z]{3})\s*(?P<rest>.*)$"
);

const NOISE: &[&str] = &[
    "Estimado Cliente,",
    "También le informamos que su Contrato ha sido modificado,",
    "Estado de Cuenta Modificado:",
    "Su Estado de Cuenta ha sido modificado y ahora tiene más detalle de información.",
    "Le informamos que su Contrato ha sido modificado, el cual puede consultarlo en cualquier sucursal o en www.bancomer.com",
    "Con Bancomer, adelante,",
    "BBVA Bancomer, S.A.",
    "Institución de Banca Múltiple, Grupo Financiero BBVA Bancomer",
    "Av. Paseo de la Reforma 510, Col. Juárez, Del. Cuauhtémoc, C.P. 06600, Ciudad de México, México,",
    "R.F.C. BBA830831LJ2",
    "el cual puede consultarlo en cualquier sucursal o www.bancomer.com",
    "Con Bancomer, adelante.",
    "BBVA BANCOMER, S.A. INSTITUCION DE BANCA MULTIPLE, GRUPO FINANCIERO BBVA BANCOMER",
    "Total de Movimientos",
];

const REFERENCE_MARKER: &str = "Ref.";

/// Charge/credit, operation balance, settlement balance.
const AMOUNTS: AmountTokenizer = AmountTokenizer::new(TokenShape::Grouped);

fn ruleset() -> Ruleset {
    Ruleset::new(re_record_start()).with_noise(NOISE)
}

/// Split `text` at the first reference marker into description and
/// `Ref. <rest>`.
fn split_reference(text: &str) -> (&str, Option<String>) {
    match text.split_once(REFERENCE_MARKER) {
        Some((description, rest)) => (
            description.trim(),
            Some(format!("{REFERENCE_MARKER} {}", rest.trim())),
        ),
        None => (text, None),
    }
}

#[derive(Debug, Clone)]
pub struct BbvaBuilder {
    operation_date: String,
    settlement_date: String,
    year: i32,
    description: TextBuffer,
    reference: TextBuffer,
    amounts: Tokenized,
}

impl RecordBuilder for BbvaBuilder {
    type Record = BbvaRecord;

    fn open(start: RecordStart, year: i32) -> Self {
        let amounts = AMOUNTS.tokenize(&start.rest);
        let (description, reference) = split_reference(&amounts.residual);
        let description = TextBuffer::from(description);
        let reference = reference
            .as_deref()
            .map(TextBuffer::from)
            .unwrap_or_default();

        Self {
            operation_date: start.primary_date,
            settlement_date: start.secondary_date.unwrap_or_default(),
            year,
            description,
            reference,
            amounts,
        }
    }

    /// Fold the lines under a movement into its description until noise, an
    /// amount or a new movement shows up.
    fn absorb_following(&mut self, cursor: &mut LineCursor<'_>, classifier: &LineClassifier) {
        while let Some(next) = cursor.peek() {
            if next.is_empty() {
                cursor.advance();
                continue;
            }
            if classifier.is_noise(next)
                || classifier.is_record_start(next)
                || AMOUNTS.has_amount(next)
            {
                break;
            }
            trace!(line = next, "folded into description");
            self.description.push(next);
            cursor.advance();
        }
    }

    fn append(&mut self, line: &str, in_reference: &mut bool) {
        if line.contains(REFERENCE_MARKER) {
            *in_reference = true;
        }
        if *in_reference {
            self.reference.push(line);
        } else {
            self.description.push(line);
        }
    }

    fn build(self) -> Option<BbvaRecord> {
        Some(BbvaRecord {
            operation_date: self.operation_date,
            settlement_date: self.settlement_date,
            year: self.year,
            description: self.description.into_text(),
            reference: self.reference.into_text(),
            charge_or_credit: self.amounts.primary(),
            operation_balance: self.amounts.secondary(),
            settlement_balance: self.amounts.tertiary(),
        })
    }
}

/// BBVA Bancomer statements: no detail section, every page flushed on its own.
#[derive(Debug, Clone)]
pub struct BbvaPipeline {
    classifier: LineClassifier,
}

impl BbvaPipeline {
    pub fn new() -> Self {
        Self {
            classifier: LineClassifier::new(ruleset()),
        }
    }

    pub fn with_overrides(overrides: &BankOverrides) -> Result<Self, ConfigError> {
        Ok(Self {
            classifier: super::classifier(Bank::Bbva, ruleset(), overrides)?,
        })
    }
}

impl Default for BbvaPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl BankPipeline for BbvaPipeline {
    type Builder = BbvaBuilder;

    fn bank(&self) -> Bank {
        Bank::Bbva
    }

    fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    fn policy(&self) -> PagePolicy {
        PagePolicy {
            carry_across_pages: false,
            flush_on_section_boundary: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse_document;
    use extracto_core::Money;

    fn parse(pages: &[&str]) -> Vec<BbvaRecord> {
        parse_document(&BbvaPipeline::new(), pages, 2024).unwrap().records
    }

    fn m(cents: i64) -> Option<Money> {
        Some(Money::from_cents(cents))
    }

    #[test]
    fn three_amounts_fill_columns_in_order() {
        let recs = parse(&["03/ENE 04/ENE SPEI ENVIADO 1,500.00 8,500.00 8,500.00"]);
        assert_eq!(recs.len(), 1);
        let r = &recs[0];
        assert_eq!(r.operation_date, "03-ENE");
        assert_eq!(r.settlement_date, "04-ENE");
        assert_eq!(r.year, 2024);
        assert_eq!(r.description, "SPEI ENVIADO");
        assert_eq!(r.charge_or_credit, m(150000));
        assert_eq!(r.operation_balance, m(850000));
        assert_eq!(r.settlement_balance, m(850000));
    }

    #[test]
    fn inline_reference_is_split_off() {
        let recs = parse(&["05/ENE 05/ENE PAGO CUENTA DE TERCERO Ref. BNET 0123456 200.00"]);
        assert_eq!(recs[0].description, "PAGO CUENTA DE TERCERO");
        assert_eq!(recs[0].reference, "Ref. BNET 0123456");
        assert_eq!(recs[0].charge_or_credit, m(20000));
        assert_eq!(recs[0].operation_balance, None);
    }

    #[test]
    fn lookahead_folds_plain_lines_and_stops_at_amounts() {
        let page = "\
07/ENE 07/ENE DEPOSITO EN EFECTIVO 300.00
SUCURSAL CENTRO

CAJERO 0042
ABONO 12.00
08/ENE 08/ENE COMISION 5.00";
        let recs = parse(&[page]);
        assert_eq!(recs.len(), 2);
        // the amount-bearing line is not folded but still lands as a continuation
        assert_eq!(recs[0].description, "DEPOSITO EN EFECTIVO SUCURSAL CENTRO CAJERO 0042 ABONO 12.00");
        assert_eq!(recs[0].charge_or_credit, m(30000));
        assert_eq!(recs[1].operation_date, "08-ENE");
    }

    #[test]
    fn lookahead_folds_reference_lines_into_description() {
        let page = "\
02/ENE 02/ENE SPEI RECIBIDO 5,000.00 15,000.00 15,000.00
Ref. 0012345678
CONCEPTO";
        let recs = parse(&[page]);
        assert_eq!(recs[0].description, "SPEI RECIBIDO Ref. 0012345678 CONCEPTO");
        assert_eq!(recs[0].reference, "");
    }

    #[test]
    fn reference_lines_stick_until_next_record() {
        let page = "\
10/ENE 10/ENE SPEI RECIBIDO 2,000.00
BANORTE
IVA 16.00
Ref. 0098765
CONCEPTO PAGO FACTURA
11/ENE 11/ENE CARGO 10.00";
        let recs = parse(&[page]);
        assert_eq!(recs[0].description, "SPEI RECIBIDO BANORTE IVA 16.00");
        assert_eq!(recs[0].reference, "Ref. 0098765 CONCEPTO PAGO FACTURA");
        assert_eq!(recs[1].reference, "");
    }

    #[test]
    fn letterhead_is_ignored() {
        let page = "\
BBVA BANCOMER, S.A. INSTITUCION DE BANCA MULTIPLE, GRUPO FINANCIERO BBVA BANCOMER
12/ENE 12/ENE RETIRO CAJERO 500.00
Estimado Cliente, su estado de cuenta
Total de Movimientos 3";
        let recs = parse(&[page]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].description, "RETIRO CAJERO");
    }

    #[test]
    fn records_do_not_cross_pages() {
        let recs = parse(&["15/ENE 15/ENE PAGO 100.00", "CONTINUA EN OTRA HOJA\n16/ENE 16/ENE OTRO 1.00"]);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].description, "PAGO");
    }

    #[test]
    fn lowercase_month_is_not_a_record() {
        let recs = parse(&["15/ene 15/ene PAGO 100.00"]);
        assert!(recs.is_empty());
    }

    #[test]
    fn override_noise_is_honored() {
        let o = BankOverrides {
            extra_noise: vec!["PUBLICIDAD".into()],
            ..Default::default()
        };
        let pipeline = BbvaPipeline::with_overrides(&o).unwrap();
        let doc = parse_document(&pipeline, &["20/ENE 20/ENE PAGO 1.00\npublicidad bancomer"], 2024).unwrap();
        assert_eq!(doc.records[0].description, "PAGO");
    }
}
