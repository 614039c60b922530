//! Incremental tokenisation for quill documents.
//!
//! A [`Tokeniser`] classifies runs of characters read through a
//! [`CharCursor`](quill_document::CharCursor); [`CppTokeniser`] is a
//! complete scanner for C and C++ source. [`TokeniserCache`] makes
//! repeated per-line requests cheap on large documents by checkpointing
//! cursor state every few lines, and [`LineTokenCache`] stores the
//! per-line results with change detection for render layers.
//!
//! # Example
//!
//! ```
//! use quill_document::Document;
//! use quill_syntax::{CppTokeniser, TokeniserCache};
//!
//! let mut doc = Document::new();
//! let cache = TokeniserCache::new(CppTokeniser);
//! cache.attach_to(&mut doc);
//! doc.insert(0, "int main() { return 0; }", true);
//! let tokens = cache.tokens_for_line(&doc, 0);
//! assert_eq!(tokens[0].token_type, CppTokeniser::KEYWORD);
//! ```

mod cache;
mod cpp;
mod line_tokens;
mod style;
mod tokeniser;

pub use cache::TokeniserCache;
pub use cpp::CppTokeniser;
pub use line_tokens::{column_to_index, index_to_column, LineToken, LineTokenCache};
pub use style::{catppuccin, Colour};
pub use tokeniser::Tokeniser;
