//! The pluggable scanner contract.

use quill_document::CharCursor;

use crate::style::Colour;

/// A forward scanner that classifies the next run of characters.
///
/// Implementations read exactly one token from the cursor per call and
/// return its type as an index in `0..token_type_count()`. By convention
/// type 0 is the scanner's error type. A scanner must advance the cursor
/// by at least one character whenever input remains; callers guard
/// against a stalled scanner by force-skipping one character and
/// classifying it as type 0, so a misbehaving implementation degrades
/// instead of hanging.
pub trait Tokeniser {
    /// Reads one token, leaving the cursor at the first character after
    /// it. Leading whitespace is consumed as part of the token's span.
    fn read_next_token(&self, cursor: &mut CharCursor<'_>) -> usize;

    /// Number of token types this scanner can return.
    fn token_type_count(&self) -> usize;

    /// Default display colour for a token type. Out-of-range types get
    /// the error colour.
    fn default_colour_for_type(&self, token_type: usize) -> Colour;
}
