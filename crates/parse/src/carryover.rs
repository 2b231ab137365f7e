/// An unterminated record held over a page boundary.
///
/// At the end of a page the open builder is parked here instead of being
/// flushed; the next page resumes it as its open record. Whatever is still
/// parked after the last page is flushed by the session.
#[derive(Debug, Clone)]
pub struct Carryover<B> {
    pending: Option<B>,
}

impl<B> Default for Carryover<B> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<B> Carryover<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `builder`. A builder already held is returned so it is never lost.
    pub fn hold(&mut self, builder: B) -> Option<B> {
        self.pending.replace(builder)
    }

    /// Take the parked builder to seed the next page.
    pub fn seed(&mut self) -> Option<B> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_then_seed() {
        let mut c = Carryover::new();
        assert!(!c.is_pending());
        assert_eq!(c.hold("block"), None);
        assert!(c.is_pending());
        assert_eq!(c.seed(), Some("block"));
        assert_eq!(c.seed(), None);
    }

    #[test]
    fn hold_returns_displaced() {
        let mut c = Carryover::new();
        c.hold(1);
        assert_eq!(c.hold(2), Some(1));
        assert_eq!(c.seed(), Some(2));
    }
}
