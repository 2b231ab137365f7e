use super::money::Money;
use super::record::{BanamexRecord, BanbajioRecord, BanorteRecord, BbvaRecord};

/// Row projection handed to a spreadsheet writer.
///
/// Headers and column order follow the sheets the statements have always
/// been exported to.
pub trait TabularRecord {
    const SHEET_NAME: &'static str;
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

fn money_cell(amount: Option<Money>) -> String {
    amount.map(Money::to_grouped_string).unwrap_or_default()
}

impl TabularRecord for BbvaRecord {
    const SHEET_NAME: &'static str = "Movimientos BBVA";
    const HEADERS: &'static [&'static str] = &[
        "OPER",
        "LIQ",
        "ANIO",
        "COD_DESCRIPCION",
        "REFERENCIA",
        "CARGOS_ABONOS",
        "OPERACION",
        "LIQUIDACION",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.operation_date.clone(),
            self.settlement_date.clone(),
            self.year.to_string(),
            self.description.clone(),
            self.reference.clone(),
            money_cell(self.charge_or_credit),
            money_cell(self.operation_balance),
            money_cell(self.settlement_balance),
        ]
    }
}

impl TabularRecord for BanbajioRecord {
    const SHEET_NAME: &'static str = "Movimientos BanBajio";
    const HEADERS: &'static [&'static str] = &[
        "FECHA",
        "AÑO",
        "REF_DOCT",
        "DESCRIPCION",
        "DEPOSITOS/RETIROS",
        "SALDO",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.year.to_string(),
            self.reference.clone(),
            self.description.clone(),
            money_cell(self.amount),
            money_cell(self.balance),
        ]
    }
}

impl TabularRecord for BanamexRecord {
    const SHEET_NAME: &'static str = "Movimientos Banamex";
    const HEADERS: &'static [&'static str] =
        &["FECHA", "AÑO", "CONCEPTO", "RETIROS/DEPOSITOS", "SALDO"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.year.to_string(),
            self.concept.clone(),
            money_cell(self.amount),
            money_cell(self.balance),
        ]
    }
}

impl TabularRecord for BanorteRecord {
    const SHEET_NAME: &'static str = "Movimientos Banorte";
    const HEADERS: &'static [&'static str] = &[
        "FECHA",
        "DESCRIPCION",
        "MONTO DEPOSITO",
        "MONTO RETIRO",
        "SALDO",
        "AÑO",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.description.clone(),
            money_cell(self.deposit()),
            money_cell(self.withdrawal()),
            money_cell(self.balance),
            self.year.to_string(),
        ]
    }
}
