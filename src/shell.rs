//! Shell quoting for process command lines
//!
//! Argument lists are kept as plain (unquoted) tokens everywhere in the
//! compiler. Quoting happens only here, when a token list is turned into a
//! single command string, so nothing is ever escaped twice.

use crate::error::MalformedValue;

/// Join tokens into one command string, quoting each token as needed
pub fn join<I, S>(tokens: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    shell_words::join(tokens)
}

/// Split a user-supplied argument string the way a POSIX shell would
pub fn split(path: &str, raw: &str) -> Result<Vec<String>, MalformedValue> {
    shell_words::split(raw).map_err(|e| MalformedValue::new(path, raw, e.to_string()))
}
