//! Tokenizer: split text into word-boundary release units.
//!
//! A token is a maximal run of non-whitespace characters together with any
//! whitespace run that immediately follows it. Whitespace appearing before
//! the first word forms a token of its own, which can only happen at the
//! very start of the input. Concatenating the tokens in order reconstructs
//! the input exactly, so releasing whole tokens never drops or reorders
//! text.
//!
//! Whitespace classification is `char::is_whitespace`, the unicode
//! whitespace character class.

/// Tokenize `text` into word-boundary release units.
///
/// Returns a borrowing iterator; no allocation is performed per token.
/// Empty input yields an empty iterator.
///
/// # Example
///
/// ```
/// use cadence::tokenize;
///
/// let tokens: Vec<&str> = tokenize("Hello world. ").collect();
/// assert_eq!(tokens, vec!["Hello ", "world. "]);
/// ```
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { rest: text }
}

/// Iterator over the word-boundary tokens of a string slice.
///
/// Created by [`tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        let mut end = scan(self.rest, 0, char::is_whitespace);
        if end == 0 {
            // Word run, then swallow the whitespace that follows it.
            end = scan(self.rest, 0, |c: char| !c.is_whitespace());
            end = scan(self.rest, end, char::is_whitespace);
        }

        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(token)
    }
}

impl std::iter::FusedIterator for Tokens<'_> {}

/// Byte offset of the first character at or after `from` that does not
/// match `pred`.
fn scan(text: &str, from: usize, pred: impl Fn(char) -> bool) -> usize {
    text[from..]
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(text.len(), |(i, _)| from + i)
}
