use extracto_core::Money;
use tracing::{debug, trace};

use crate::carryover::Carryover;
use crate::classify::{LineClassifier, RecordStart};
use crate::cursor::LineCursor;
use crate::pipeline::PagePolicy;

/// A record under construction for one bank layout.
///
/// Opened on a record-start line, fed continuation lines in order, and
/// consumed by `build` when flushed. Nothing can reach a record after it has
/// been built.
pub trait RecordBuilder: Sized {
    type Record;

    fn open(start: RecordStart, year: i32) -> Self;

    /// Consume lines directly after the record start, before the main loop
    /// sees them.
    fn absorb_following(&mut self, _cursor: &mut LineCursor<'_>, _classifier: &LineClassifier) {}

    /// Add one continuation line. `in_reference` stays set for the rest of the
    /// record once a builder turns it on.
    fn append(&mut self, line: &str, in_reference: &mut bool);

    /// Materialize the record. `None` drops it.
    fn build(self) -> Option<Self::Record>;

    /// Post-process a built record against state carried between records.
    fn settle(_record: &mut Self::Record, _previous_balance: &mut Option<Money>) {}
}

/// Working state for parsing one document.
///
/// Holds at most one open record. Sessions are plain values passed into each
/// page step and handed back, so separate documents never share one.
pub struct ParseSession<B: RecordBuilder> {
    year: i32,
    open: Option<B>,
    in_reference: bool,
    in_section: bool,
    carryover: Carryover<B>,
    previous_balance: Option<Money>,
    records: Vec<B::Record>,
}

impl<B: RecordBuilder> ParseSession<B> {
    pub fn new(year: i32, in_section: bool) -> Self {
        Self {
            year,
            open: None,
            in_reference: false,
            in_section,
            carryover: Carryover::new(),
            previous_balance: None,
            records: Vec::new(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn in_section(&self) -> bool {
        self.in_section
    }

    pub fn set_in_section(&mut self, active: bool) {
        self.in_section = active;
    }

    pub fn is_building(&self) -> bool {
        self.open.is_some()
    }

    pub fn previous_balance(&self) -> Option<Money> {
        self.previous_balance
    }

    pub fn records(&self) -> &[B::Record] {
        &self.records
    }

    /// Flush whatever is open, then make `builder` the open record.
    pub fn open_record(&mut self, builder: B) {
        self.flush();
        self.open = Some(builder);
        self.in_reference = false;
    }

    /// Route a continuation line to the open record. Returns `false` when
    /// there is none and the line is discarded.
    pub fn append(&mut self, line: &str) -> bool {
        match self.open.as_mut() {
            Some(builder) => {
                builder.append(line, &mut self.in_reference);
                true
            }
            None => false,
        }
    }

    pub fn flush(&mut self) {
        let Some(builder) = self.open.take() else {
            return;
        };
        self.in_reference = false;
        match builder.build() {
            Some(mut record) => {
                B::settle(&mut record, &mut self.previous_balance);
                self.records.push(record);
                debug!(count = self.records.len(), "record flushed");
            }
            None => trace!("empty record dropped"),
        }
    }

    /// Prepare for the next page: re-arm the section if the layout resets it
    /// per page and resume a record carried over from the previous page.
    pub fn begin_page(&mut self, policy: PagePolicy, classifier: &LineClassifier) {
        if let Some(section) = classifier.section() {
            if section.reset_each_page {
                self.in_section = section.initially_active;
            }
        }
        if policy.carry_across_pages {
            if let Some(pending) = self.carryover.seed() {
                debug!("resuming record carried from previous page");
                self.open = Some(pending);
            }
        }
    }

    /// Close out a page: park the open record for the next page or flush it.
    pub fn end_page(&mut self, policy: PagePolicy) {
        if policy.carry_across_pages {
            if let Some(builder) = self.open.take() {
                if let Some(displaced) = self.carryover.hold(builder) {
                    self.open = Some(displaced);
                    self.flush();
                }
            }
        } else {
            self.flush();
        }
    }

    /// Finalize any carried or open record and return everything flushed, in
    /// order.
    pub fn finish(mut self) -> Vec<B::Record> {
        if let Some(pending) = self.carryover.seed() {
            self.flush();
            self.open = Some(pending);
        }
        self.flush();
        self.records
    }
}
