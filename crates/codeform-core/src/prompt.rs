//! Prompt construction.

use crate::LibraryMode;

/// Build the instruction sent to the completion service.
///
/// Both values are substituted verbatim; quotes inside `source_text` are not escaped.
///
/// # Example
///
/// ```rust
/// use codeform_core::{build_prompt, LibraryMode};
///
/// let prompt = build_prompt("a login button", LibraryMode::Mui);
/// assert_eq!(
///     prompt,
///     "write code program with react component for \"a login button\" using MUI as UI library. Show only code."
/// );
/// ```
pub fn build_prompt(source_text: &str, library: LibraryMode) -> String {
    format!(
        "write code program with react component for \"{}\" using {} as UI library. Show only code.",
        source_text,
        library.as_str()
    )
}
