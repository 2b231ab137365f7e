use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The statement layouts the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bank {
    Bbva,
    Banbajio,
    Banamex,
    Banorte,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("Unsupported bank '{0}'. Use 'bbva', 'banbajio', 'banamex' or 'banorte'.")]
    Unsupported(String),
}

impl Bank {
    pub const ALL: [Bank; 4] = [Bank::Bbva, Bank::Banbajio, Bank::Banamex, Bank::Banorte];

    /// The lowercase selector callers use to pick a layout.
    pub fn selector(self) -> &'static str {
        match self {
            Bank::Bbva => "bbva",
            Bank::Banbajio => "banbajio",
            Bank::Banamex => "banamex",
            Bank::Banorte => "banorte",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Bank::Bbva => "BBVA",
            Bank::Banbajio => "BanBajío",
            Bank::Banamex => "Banamex",
            Bank::Banorte => "Banorte",
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Bank {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Bank::ALL
            .into_iter()
            .find(|b| b.selector() == wanted)
            .ok_or_else(|| BankError::Unsupported(s.trim().to_string()))
    }
}
