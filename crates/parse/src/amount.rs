use extracto_core::Money;
use regex::Regex;
use tracing::trace;

use crate::text::collapse_whitespace;

re!(re_grouped, r"\d{1,3}(?:,\d{3})*\.\d{2}");
re!(re_currency, r"\$?\s?\d{1,3}(?:,\d{3})*\.\d{2}");
re!(re_bounded, r"\b\d{1,3}(?:,\d{3})*\.\d{2}\b");
re!(re_whole_word, r"^\d{1,3}(?:,\d{3})*\.\d{2}$");

/// How a money token is delimited in a given layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShape {
    /// `1,234.56` anywhere in the text.
    Grouped,
    /// Like `Grouped`, optionally preceded by `$` and one space.
    Currency,
    /// `Grouped` on word boundaries.
    Bounded,
    /// Whitespace-delimited words that are entirely an amount.
    WholeWord,
}

/// Pulls money tokens out of a text fragment in left-to-right order.
///
/// Slot order is positional: the first token kept is slot 0, the second
/// slot 1, the third slot 2. What each slot means is up to the layout.
#[derive(Debug, Clone, Copy)]
pub struct AmountTokenizer {
    shape: TokenShape,
    exclusion_markers: &'static [&'static str],
    exclusion_window: usize,
    skip_currency_prefixed: bool,
}

/// Tokens found in a fragment plus whatever text is left once they are cut out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    pub amounts: Vec<Money>,
    pub residual: String,
}

impl Tokenized {
    pub fn slot(&self, index: usize) -> Option<Money> {
        self.amounts.get(index).copied()
    }

    pub fn primary(&self) -> Option<Money> {
        self.slot(0)
    }

    pub fn secondary(&self) -> Option<Money> {
        self.slot(1)
    }

    pub fn tertiary(&self) -> Option<Money> {
        self.slot(2)
    }

    pub fn last(&self) -> Option<Money> {
        self.amounts.last().copied()
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

impl AmountTokenizer {
    pub const fn new(shape: TokenShape) -> Self {
        Self {
            shape,
            exclusion_markers: &[],
            exclusion_window: 0,
            skip_currency_prefixed: false,
        }
    }

    /// Drop tokens whose preceding `window` characters mention any marker.
    pub const fn excluding(mut self, markers: &'static [&'static str], window: usize) -> Self {
        self.exclusion_markers = markers;
        self.exclusion_window = window;
        self
    }

    /// Drop tokens written directly after a `$`.
    pub const fn skipping_currency_prefixed(mut self) -> Self {
        self.skip_currency_prefixed = true;
        self
    }

    pub fn tokenize(&self, fragment: &str) -> Tokenized {
        match self.shape {
            TokenShape::WholeWord => tokenize_words(fragment),
            _ => self.tokenize_spans(fragment),
        }
    }

    pub fn has_amount(&self, fragment: &str) -> bool {
        !self.tokenize(fragment).is_empty()
    }

    fn pattern(&self) -> &'static Regex {
        match self.shape {
            TokenShape::Grouped => re_grouped(),
            TokenShape::Currency => re_currency(),
            TokenShape::Bounded | TokenShape::WholeWord => re_bounded(),
        }
    }

    fn tokenize_spans(&self, fragment: &str) -> Tokenized {
        let mut amounts = Vec::new();
        let mut residual = String::with_capacity(fragment.len());
        let mut last = 0;

        for m in self.pattern().find_iter(fragment) {
            if self.is_excluded(fragment, m.start()) {
                trace!(token = m.as_str(), "amount excluded by context");
                continue;
            }
            let Some(value) = Money::parse_token(m.as_str()) else {
                trace!(token = m.as_str(), "unparsable amount token");
                continue;
            };
            residual.push_str(&fragment[last..m.start()]);
            residual.push(' ');
            last = m.end();
            amounts.push(value);
        }
        residual.push_str(&fragment[last..]);

        Tokenized {
            amounts,
            residual: collapse_whitespace(&residual),
        }
    }

    fn is_excluded(&self, fragment: &str, start: usize) -> bool {
        let before = &fragment[..start];
        if self.skip_currency_prefixed && before.ends_with('$') {
            return true;
        }
        if self.exclusion_markers.is_empty() {
            return false;
        }
        let window: String = {
            let mut tail: Vec<char> = before.chars().rev().take(self.exclusion_window).collect();
            tail.reverse();
            tail.into_iter().collect::<String>().to_uppercase()
        };
        self.exclusion_markers.iter().any(|m| window.contains(m))
    }
}

fn tokenize_words(fragment: &str) -> Tokenized {
    let mut amounts = Vec::new();
    let mut words = Vec::new();
    for word in fragment.split_whitespace() {
        match re_whole_word()
            .is_match(word)
            .then(|| Money::parse_token(word))
            .flatten()
        {
            Some(value) => amounts.push(value),
            None => words.push(word),
        }
    }
    Tokenized {
        amounts,
        residual: words.join(" "),
    }
}
