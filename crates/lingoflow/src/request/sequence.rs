/// Source of fresh request numbers.
///
/// Consulted only when minting a brand-new number, never for part or
/// version advances. `last` is the counter value recorded by the
/// previous mint, or `None` on the very first mint.
pub trait NumberSequence: Send + Sync {
    fn next_number(&self, last: Option<i64>) -> i64;
}

/// Sequence that starts at a configured floor and advances by one.
///
/// The floor also applies after the fact: if the counter somehow holds a
/// value below `start` (say the configuration was raised between runs),
/// the next mint jumps up to `start` instead of continuing below it.
#[derive(Debug, Clone)]
pub struct ConfiguredSequence {
    start: i64,
}

impl ConfiguredSequence {
    pub fn new(start: i64) -> Self {
        Self { start }
    }
}

impl NumberSequence for ConfiguredSequence {
    fn next_number(&self, last: Option<i64>) -> i64 {
        match last {
            None => self.start,
            Some(last) => (last + 1).max(self.start),
        }
    }
}
