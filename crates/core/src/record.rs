use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bank::Bank;
use super::calendar::resolve_date;
use super::money::Money;

/// One BBVA movement: operation and settlement dates plus up to three amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BbvaRecord {
    /// `OPER`, e.g. `03-ENE`.
    pub operation_date: String,
    /// `LIQ`, the settlement date.
    pub settlement_date: String,
    pub year: i32,
    pub description: String,
    pub reference: String,
    /// `CARGOS/ABONOS` column.
    pub charge_or_credit: Option<Money>,
    /// `OPERACION` balance column.
    pub operation_balance: Option<Money>,
    /// `LIQUIDACION` balance column.
    pub settlement_balance: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanbajioRecord {
    pub date: String,
    pub year: i32,
    /// `NO. REF/DOCT`.
    pub reference: String,
    pub description: String,
    /// Deposit or withdrawal; the layout does not say which.
    pub amount: Option<Money>,
    pub balance: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanamexRecord {
    pub date: String,
    pub year: i32,
    pub concept: String,
    /// Withdrawal or deposit; the layout does not say which.
    pub amount: Option<Money>,
    pub balance: Option<Money>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Deposit,
    Withdrawal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanorteRecord {
    /// Date token as printed, e.g. `01-ENE-24`.
    pub date: String,
    pub year: i32,
    pub description: String,
    /// Movement amount before deposit/withdrawal resolution.
    pub amount: Option<Money>,
    /// `None` while unresolved.
    pub direction: Option<Direction>,
    pub balance: Option<Money>,
}

impl BanorteRecord {
    pub fn deposit(&self) -> Option<Money> {
        match self.direction {
            Some(Direction::Deposit) => self.amount,
            _ => None,
        }
    }

    pub fn withdrawal(&self) -> Option<Money> {
        match self.direction {
            Some(Direction::Withdrawal) => self.amount,
            _ => None,
        }
    }

    /// An amount was found but its direction could not be determined.
    pub fn is_unresolved(&self) -> bool {
        self.amount.is_some() && self.direction.is_none()
    }
}

/// Bank-agnostic view over the four record shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "bank", rename_all = "lowercase")]
pub enum TransactionRecord {
    Bbva(BbvaRecord),
    Banbajio(BanbajioRecord),
    Banamex(BanamexRecord),
    Banorte(BanorteRecord),
}

impl TransactionRecord {
    pub fn bank(&self) -> Bank {
        match self {
            TransactionRecord::Bbva(_) => Bank::Bbva,
            TransactionRecord::Banbajio(_) => Bank::Banbajio,
            TransactionRecord::Banamex(_) => Bank::Banamex,
            TransactionRecord::Banorte(_) => Bank::Banorte,
        }
    }

    pub fn primary_date(&self) -> &str {
        match self {
            TransactionRecord::Bbva(r) => &r.operation_date,
            TransactionRecord::Banbajio(r) => &r.date,
            TransactionRecord::Banamex(r) => &r.date,
            TransactionRecord::Banorte(r) => &r.date,
        }
    }

    pub fn secondary_date(&self) -> Option<&str> {
        match self {
            TransactionRecord::Bbva(r) => Some(r.settlement_date.as_str()),
            _ => None,
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            TransactionRecord::Bbva(r) => r.year,
            TransactionRecord::Banbajio(r) => r.year,
            TransactionRecord::Banamex(r) => r.year,
            TransactionRecord::Banorte(r) => r.year,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            TransactionRecord::Bbva(r) => &r.description,
            TransactionRecord::Banbajio(r) => &r.description,
            TransactionRecord::Banamex(r) => &r.concept,
            TransactionRecord::Banorte(r) => &r.description,
        }
    }

    pub fn reference(&self) -> Option<&str> {
        match self {
            TransactionRecord::Bbva(r) => Some(r.reference.as_str()),
            TransactionRecord::Banbajio(r) => Some(r.reference.as_str()),
            _ => None,
        }
        .filter(|s| !s.is_empty())
    }

    /// Positional amount slots as they appeared on the statement line.
    pub fn amounts(&self) -> [Option<Money>; 3] {
        match self {
            TransactionRecord::Bbva(r) => [r.charge_or_credit, r.operation_balance, r.settlement_balance],
            TransactionRecord::Banbajio(r) => [r.amount, r.balance, None],
            TransactionRecord::Banamex(r) => [r.amount, r.balance, None],
            TransactionRecord::Banorte(r) => [r.amount, r.balance, None],
        }
    }

    /// The primary date resolved against the record's year.
    pub fn posted_on(&self) -> Option<NaiveDate> {
        resolve_date(self.primary_date(), self.year())
    }
}

impl From<BbvaRecord> for TransactionRecord {
    fn from(r: BbvaRecord) -> Self {
        TransactionRecord::Bbva(r)
    }
}

impl From<BanbajioRecord> for TransactionRecord {
    fn from(r: BanbajioRecord) -> Self {
        TransactionRecord::Banbajio(r)
    }
}

impl From<BanamexRecord> for TransactionRecord {
    fn from(r: BanamexRecord) -> Self {
        TransactionRecord::Banamex(r)
    }
}

impl From<BanorteRecord> for TransactionRecord {
    fn from(r: BanorteRecord) -> Self {
        TransactionRecord::Banorte(r)
    }
}

/// Summary deposits/withdrawals as printed on the statement itself.
///
/// Recovered independently of the per-line parse and reported as-is; zero
/// means the label was not found, not that nothing moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementTotals {
    pub deposits: Money,
    pub withdrawals: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banorte(amount: Option<i64>, direction: Option<Direction>) -> BanorteRecord {
        BanorteRecord {
            date: "02-ENE-24".to_string(),
            year: 2024,
            description: "SPEI RECIBIDO".to_string(),
            amount: amount.map(Money::from_cents),
            direction,
            balance: Some(Money::from_cents(100000)),
        }
    }

    #[test]
    fn banorte_deposit_and_withdrawal_views() {
        let dep = banorte(Some(5000), Some(Direction::Deposit));
        assert_eq!(dep.deposit(), Some(Money::from_cents(5000)));
        assert_eq!(dep.withdrawal(), None);

        let wd = banorte(Some(5000), Some(Direction::Withdrawal));
        assert_eq!(wd.deposit(), None);
        assert_eq!(wd.withdrawal(), Some(Money::from_cents(5000)));
    }

    #[test]
    fn banorte_unresolved() {
        assert!(banorte(Some(5000), None).is_unresolved());
        assert!(!banorte(None, None).is_unresolved());
    }

    #[test]
    fn transaction_record_accessors() {
        let rec: TransactionRecord = BbvaRecord {
            operation_date: "03-ENE".to_string(),
            settlement_date: "04-ENE".to_string(),
            year: 2024,
            description: "PAGO TARJETA".to_string(),
            reference: String::new(),
            charge_or_credit: Some(Money::from_cents(15000)),
            operation_balance: None,
            settlement_balance: None,
        }
        .into();

        assert_eq!(rec.bank(), Bank::Bbva);
        assert_eq!(rec.primary_date(), "03-ENE");
        assert_eq!(rec.secondary_date(), Some("04-ENE"));
        assert_eq!(rec.reference(), None);
        assert_eq!(rec.amounts()[0], Some(Money::from_cents(15000)));
        assert_eq!(rec.posted_on(), NaiveDate::from_ymd_opt(2024, 1, 3));
    }

    #[test]
    fn tagged_serialization() {
        let rec: TransactionRecord = BanamexRecord {
            date: "05-FEB".to_string(),
            year: 2024,
            concept: "DEPOSITO".to_string(),
            amount: Some(Money::from_cents(1000)),
            balance: None,
        }
        .into();
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["bank"], "banamex");
        assert_eq!(json["amount"], "10.00");
        let back: TransactionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn totals_default_to_zero() {
        let t = StatementTotals::default();
        assert!(t.deposits.is_zero());
        assert!(t.withdrawals.is_zero());
    }
}
