//! One module per supported statement layout.

pub mod banamex;
pub mod banbajio;
pub mod banorte;
pub mod bbva;

pub use banamex::{BanamexBuilder, BanamexPipeline};
pub use banbajio::{BanbajioBuilder, BanbajioPipeline};
pub use banorte::{BanorteBuilder, BanortePipeline};
pub use bbva::{BbvaBuilder, BbvaPipeline};

use extracto_core::Bank;

use crate::classify::{LineClassifier, Ruleset};
use crate::config::{BankOverrides, ConfigError};

/// Built-in rules for `bank` with user overrides merged in.
fn classifier(bank: Bank, rules: Ruleset, overrides: &BankOverrides) -> Result<LineClassifier, ConfigError> {
    let rules = if overrides.is_empty() {
        rules
    } else {
        overrides.apply(bank, rules)?
    };
    Ok(LineClassifier::new(rules))
}
