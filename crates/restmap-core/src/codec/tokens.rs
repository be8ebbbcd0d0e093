//! Token cursor over a serialized query path.

use crate::error::Error;

/// A left-to-right cursor over the `/`-separated tokens of a path.
///
/// Sections consume exactly the tokens they produced when packing; the only
/// lookahead is [`Tokens::peek`] on the next section prefix.
#[derive(Debug)]
pub(crate) struct Tokens<'a> {
    tokens: Vec<&'a str>,
    position: usize,
}

impl<'a> Tokens<'a> {
    /// Split a path into tokens.
    ///
    /// A leading `./` or `/` is ignored. Interior empty tokens are kept, so an
    /// empty operand stays in place.
    pub(crate) fn new(path: &'a str) -> Self {
        let path = path.strip_prefix("./").unwrap_or(path);
        let path = path.trim_start_matches('/');
        let tokens = if path.is_empty() {
            Vec::new()
        } else {
            path.split('/').collect()
        };
        Self {
            tokens,
            position: 0,
        }
    }

    /// The next token, without consuming it.
    pub(crate) fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.position).copied()
    }

    /// Consume the next token, if any.
    pub(crate) fn pop(&mut self) -> Option<&'a str> {
        let token = self.peek()?;
        self.position += 1;
        Some(token)
    }

    /// Consume the next token of a section, failing when the input ended.
    pub(crate) fn take(&mut self, section: &'static str) -> Result<&'a str, Error> {
        self.pop()
            .ok_or(Error::InsufficientTokens { section })
    }

    /// Consume a count token.
    pub(crate) fn take_count(&mut self, section: &'static str) -> Result<usize, Error> {
        let token = self.take(section)?;
        token
            .parse::<usize>()
            .map_err(|_| Error::InvalidCount(token.to_string()))
    }

    /// Consume a section prefix, failing when it is not `prefix`.
    pub(crate) fn expect(&mut self, prefix: &str, section: &'static str) -> Result<(), Error> {
        match self.pop() {
            Some(token) if token == prefix => Ok(()),
            _ => Err(Error::InvalidPrefix { section }),
        }
    }

    /// Number of tokens left.
    pub(crate) fn remaining(&self) -> usize {
        self.tokens.len() - self.position
    }
}
