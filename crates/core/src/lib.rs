pub mod bank;
pub mod calendar;
pub mod money;
pub mod record;
pub mod tabular;

pub use bank::{Bank, BankError};
pub use money::Money;
pub use record::{
    BanamexRecord, BanbajioRecord, BanorteRecord, BbvaRecord, Direction, StatementTotals,
    TransactionRecord,
};
pub use tabular::TabularRecord;
