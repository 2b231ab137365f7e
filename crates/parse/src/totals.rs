use extracto_core::{Bank, Money, StatementTotals};
use regex::Regex;
use tracing::{debug, trace};

/// Label, then optional `(+)`/`(-)`, optional item count, optional `$`, then
/// the first grouped amount.
macro_rules! labeled_amount {
    ($label:literal) => {
        concat!(
            "(?i)",
            $label,
            r"\s*:?\s*(?:\([+-]\)\s*)?(?:\d+\s+)?\$?\s*(\d{1,3}(?:,\d{3})*\.\d{2})"
        )
    };
}

re!(re_bbva_deposits, labeled_amount!(r"dep[oó]sitos\s*/\s*abonos"));
re!(re_bbva_withdrawals, labeled_amount!(r"retiros\s*/\s*cargos"));
re!(re_plain_deposits, labeled_amount!(r"dep[oó]sitos"));
re!(re_plain_withdrawals, labeled_amount!(r"retiros"));
re!(re_banorte_deposits, labeled_amount!(r"total\s+de\s+dep[oó]sitos"));
re!(re_banorte_withdrawals, labeled_amount!(r"total\s+de\s+retiros"));

/// Recovers the statement's own deposit and withdrawal totals.
///
/// Runs once over the concatenated text of every page and never looks at the
/// parsed records.
#[derive(Debug, Clone, Copy)]
pub struct TotalsExtractor {
    deposits: &'static Regex,
    withdrawals: &'static Regex,
}

impl TotalsExtractor {
    pub fn for_bank(bank: Bank) -> Self {
        let (deposits, withdrawals) = match bank {
            Bank::Bbva => (re_bbva_deposits(), re_bbva_withdrawals()),
            Bank::Banbajio | Bank::Banamex => (re_plain_deposits(), re_plain_withdrawals()),
            Bank::Banorte => (re_banorte_deposits(), re_banorte_withdrawals()),
        };
        Self { deposits, withdrawals }
    }

    pub fn extract(&self, full_text: &str) -> StatementTotals {
        let totals = StatementTotals {
            deposits: first_amount(self.deposits, full_text),
            withdrawals: first_amount(self.withdrawals, full_text),
        };
        debug!(deposits = %totals.deposits, withdrawals = %totals.withdrawals, "statement totals");
        totals
    }
}

fn first_amount(re: &Regex, text: &str) -> Money {
    match re
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| Money::parse_token(m.as_str()))
    {
        Some(amount) => amount,
        None => {
            trace!(pattern = re.as_str(), "totals label not found");
            Money::zero()
        }
    }
}
