//! Seams between the growth driver and its inputs.
//!
//! The driver never reaches for a random number generator directly; it asks a
//! [`SequenceSource`] for each input. Production runs plug in
//! [`RandomLowercase`](crate::generator::RandomLowercase), tests plug in
//! deterministic fixtures (any `FnMut(usize) -> String` closure qualifies).

/// Supplier of test sequences for the growth driver.
pub trait SequenceSource {
    /// Produce a sequence of exactly `len` characters.
    ///
    /// Called twice per iteration; the two results must be independent draws.
    fn next_sequence(&mut self, len: usize) -> String;
}

impl<F> SequenceSource for F
where
    F: FnMut(usize) -> String,
{
    fn next_sequence(&mut self, len: usize) -> String {
        self(len)
    }
}
