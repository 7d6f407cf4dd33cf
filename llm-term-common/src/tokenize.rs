// ABOUTME: splits a command payload into an argv using posix shell quoting rules.
// ABOUTME: malformed quoting is a distinct error so callers never execute a guessed argv.

/// Stands in for `#` while splitting so shlex never reads a word as a comment.
const HASH_PLACEHOLDER: char = '\u{E000}';

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("unbalanced quotes or trailing escape in command")]
    Malformed,
    #[error("command has no words")]
    Empty,
    #[error("command contains an unsupported control character")]
    ReservedCharacter,
}

/// Splits `command` into words, keeping `#` words verbatim.
///
/// The displayed command and the executed argv must agree, so a word starting
/// with `#` is an ordinary argument here rather than the start of a comment.
pub fn tokenize(command: &str) -> Result<Vec<String>, TokenizeError> {
    if command.contains(HASH_PLACEHOLDER) {
        return Err(TokenizeError::ReservedCharacter);
    }

    let masked = command.replace('#', &HASH_PLACEHOLDER.to_string());
    let argv: Vec<String> = shlex::split(&masked)
        .ok_or(TokenizeError::Malformed)?
        .into_iter()
        .map(|word| word.replace(HASH_PLACEHOLDER, "#"))
        .collect();

    if argv.is_empty() {
        return Err(TokenizeError::Empty);
    }
    Ok(argv)
}
