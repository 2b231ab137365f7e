use extracto_core::{BanorteRecord, Direction, Money};
use tracing::trace;

/// Direction of a movement from the change in running balance.
///
/// Lower than before is a withdrawal, higher is a deposit. A tie, or any
/// missing input, leaves the movement unresolved.
pub fn resolve_direction(
    previous: Option<Money>,
    candidate: Option<Money>,
    balance: Option<Money>,
) -> Option<Direction> {
    let (previous, _, balance) = (previous?, candidate?, balance?);
    match balance.cmp(&previous) {
        std::cmp::Ordering::Less => Some(Direction::Withdrawal),
        std::cmp::Ordering::Greater => Some(Direction::Deposit),
        std::cmp::Ordering::Equal => None,
    }
}

/// Resolve `record` against the running balance and advance it.
///
/// `previous` only moves when the record carries a balance of its own.
pub fn settle(record: &mut BanorteRecord, previous: &mut Option<Money>) {
    record.direction = resolve_direction(*previous, record.amount, record.balance);
    if record.is_unresolved() {
        trace!(date = %record.date, "movement direction unresolved");
    }
    if record.balance.is_some() {
        *previous = record.balance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(cents: i64) -> Option<Money> {
        Some(Money::from_cents(cents))
    }

    fn record(amount: Option<Money>, balance: Option<Money>) -> BanorteRecord {
        BanorteRecord {
            date: "02-ENE-24".into(),
            year: 2024,
            description: "MOVIMIENTO".into(),
            amount,
            direction: None,
            balance,
        }
    }

    #[test]
    fn lower_balance_is_withdrawal() {
        assert_eq!(resolve_direction(m(100000), m(5000), m(95000)), Some(Direction::Withdrawal));
    }

    #[test]
    fn higher_balance_is_deposit() {
        assert_eq!(resolve_direction(m(100000), m(5000), m(105000)), Some(Direction::Deposit));
    }

    #[test]
    fn tie_is_unresolved() {
        assert_eq!(resolve_direction(m(100000), m(5000), m(100000)), None);
    }

    #[test]
    fn missing_inputs_are_unresolved() {
        assert_eq!(resolve_direction(None, m(5000), m(95000)), None);
        assert_eq!(resolve_direction(m(100000), None, m(95000)), None);
        assert_eq!(resolve_direction(m(100000), m(5000), None), None);
    }

    #[test]
    fn settle_advances_previous_only_with_balance() {
        let mut previous = m(100000);

        let mut r = record(m(5000), m(95000));
        settle(&mut r, &mut previous);
        assert_eq!(r.withdrawal(), m(5000));
        assert_eq!(previous, m(95000));

        let mut r = record(m(1000), None);
        settle(&mut r, &mut previous);
        assert!(r.is_unresolved());
        assert_eq!(previous, m(95000));

        let mut r = record(m(10000), m(105000));
        settle(&mut r, &mut previous);
        assert_eq!(r.deposit(), m(10000));
    }

    #[test]
    fn first_record_only_seeds_balance() {
        let mut previous = None;
        let mut r = record(None, m(100000));
        settle(&mut r, &mut previous);
        assert_eq!(r.direction, None);
        assert_eq!(previous, m(100000));
    }
}
