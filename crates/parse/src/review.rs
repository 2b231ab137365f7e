use extracto_core::{Bank, TransactionRecord};
use serde::Serialize;
use thiserror::Error;

use crate::pipeline::ParsedStatement;

const REVIEW_MESSAGE: &str =
    "Verifique el último registro antes de exportar. Envíe confirmacion=true para proceder.";

/// Export refused until someone has looked at the final record.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ConfirmationRequired {
    pub message: String,
    pub last_record: TransactionRecord,
}

/// Layouts whose last movement is often cut short and must be checked by hand.
pub fn requires_confirmation(bank: Bank) -> bool {
    matches!(bank, Bank::Banamex)
}

/// Gate an export on explicit confirmation where the layout needs it.
pub fn review_export(statement: &ParsedStatement, confirmed: bool) -> Result<(), ConfirmationRequired> {
    if confirmed || !requires_confirmation(statement.bank()) {
        return Ok(());
    }
    match statement.records.last() {
        Some(last_record) => Err(ConfirmationRequired {
            message: REVIEW_MESSAGE.to_string(),
            last_record,
        }),
        None => Ok(()),
    }
}
