use regex::{Captures, Regex};

use crate::text::contains_upper;

/// Captures from a record-start line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStart {
    /// Day-month token, e.g. `01-ENE` (or `01-ENE-24` when the layout prints a year).
    pub primary_date: String,
    pub secondary_date: Option<String>,
    /// Everything on the line after the date group(s).
    pub rest: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Noise,
    SectionStart,
    SectionEnd,
    RecordStart(RecordStart),
    Continuation,
}

/// Phrases delimiting the transaction detail region of a statement.
#[derive(Debug, Clone, Default)]
pub struct SectionRules {
    pub start: Vec<String>,
    pub end: Vec<String>,
    /// Whether the section is open before any start phrase is seen.
    pub initially_active: bool,
    /// Re-apply `initially_active` at the top of every page instead of
    /// carrying section state across pages.
    pub reset_each_page: bool,
}

impl SectionRules {
    fn starts(&self, upper: &str) -> bool {
        self.start.iter().any(|p| contains_upper(upper, p))
    }

    fn ends(&self, upper: &str) -> bool {
        self.end.iter().any(|p| contains_upper(upper, p))
    }
}

/// Everything needed to tag a line for one bank layout.
///
/// The record-start pattern must name a `day` and `month` group and a
/// `rest` group; `day2`/`month2` (second date) and `yy` are optional.
#[derive(Debug, Clone)]
pub struct Ruleset {
    pub noise: Vec<String>,
    pub noise_patterns: Vec<Regex>,
    pub record_start: Regex,
    pub section: Option<SectionRules>,
}

impl Ruleset {
    pub fn new(record_start: &Regex) -> Self {
        Self {
            noise: Vec::new(),
            noise_patterns: Vec::new(),
            record_start: record_start.clone(),
            section: None,
        }
    }

    pub fn with_noise(mut self, phrases: &[&str]) -> Self {
        self.noise.extend(phrases.iter().map(|p| p.to_string()));
        self
    }

    pub fn with_noise_pattern(mut self, pattern: &Regex) -> Self {
        self.noise_patterns.push(pattern.clone());
        self
    }

    pub fn with_section(mut self, section: SectionRules) -> Self {
        self.section = Some(section);
        self
    }
}

/// Tags trimmed lines according to a bank's [`Ruleset`].
///
/// Section phrases are checked first, then noise, then the record-start
/// pattern. Nothing here fails: a line that fits no rule is either noise or a
/// continuation.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    rules: Ruleset,
}

impl LineClassifier {
    pub fn new(rules: Ruleset) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    pub fn section(&self) -> Option<&SectionRules> {
        self.rules.section.as_ref()
    }

    /// Section state for a fresh document.
    pub fn initially_in_section(&self) -> bool {
        self.section().map_or(true, |s| s.initially_active)
    }

    pub fn classify(&self, line: &str, in_section: bool) -> LineKind {
        let line = line.trim();
        if line.is_empty() {
            return LineKind::Noise;
        }
        let upper = line.to_uppercase();

        if let Some(section) = &self.rules.section {
            if !in_section {
                return if section.starts(&upper) {
                    LineKind::SectionStart
                } else {
                    LineKind::Noise
                };
            }
            if section.ends(&upper) {
                return LineKind::SectionEnd;
            }
            if section.starts(&upper) {
                return LineKind::SectionStart;
            }
        }

        if self.is_noise_upper(line, &upper) {
            return LineKind::Noise;
        }

        match self.rules.record_start.captures(line) {
            Some(caps) => LineKind::RecordStart(record_start(&caps)),
            None => LineKind::Continuation,
        }
    }

    pub fn is_noise(&self, line: &str) -> bool {
        let line = line.trim();
        line.is_empty() || self.is_noise_upper(line, &line.to_uppercase())
    }

    pub fn is_record_start(&self, line: &str) -> bool {
        self.rules.record_start.is_match(line.trim())
    }

    fn is_noise_upper(&self, line: &str, upper: &str) -> bool {
        self.rules.noise.iter().any(|p| contains_upper(upper, p))
            || self.rules.noise_patterns.iter().any(|re| re.is_match(line))
    }
}

fn record_start(caps: &Captures<'_>) -> RecordStart {
    let group = |name: &str| caps.name(name).map(|m| m.as_str());

    let mut primary_date = format!(
        "{}-{}",
        group("day").unwrap_or_default(),
        group("month").unwrap_or_default()
    );
    if let Some(yy) = group("yy") {
        primary_date.push('-');
        primary_date.push_str(yy);
    }
    let secondary_date = match (group("day2"), group("month2")) {
        (Some(d), Some(m)) => Some(format!("{d}-{m}")),
        _ => None,
    };

    RecordStart {
        primary_date,
        secondary_date,
        rest: group("rest").unwrap_or_default().trim().to_string(),
    }
}
