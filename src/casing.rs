//! Identifier casing helper shared by the code generation tooling.

use thiserror::Error;

/// Casing conversion error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CasingError {
    /// Identifiers must start with an alphanumeric character.
    #[error("Illegal leading character in identifier '{0}'")]
    InvalidCharacter(String),
}

/// Convert a mixed-case identifier into lowercase snake_case.
///
/// An underscore is inserted at each transition from a lowercase to an
/// uppercase alphabetic character; consecutive uppercase letters are kept
/// as one word. Non-alphanumeric characters become single underscores,
/// except in the first position where they are rejected. The literal
/// substring "SoC" is rewritten to "Soc" up front so it reads as one
/// capitalized word instead of three capital letters.
pub fn to_snake_case(word: &str) -> Result<String, CasingError> {
    let word = word.replace("SoC", "Soc");

    let mut out = String::with_capacity(word.len());
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return Ok(out);
    };
    if !first.is_alphanumeric() {
        return Err(CasingError::InvalidCharacter(word.clone()));
    }
    out.extend(first.to_lowercase());

    let mut last = first;
    for current in chars {
        if last.is_lowercase() && current.is_uppercase() {
            out.push('_');
        }
        if !current.is_alphanumeric() {
            out.push('_');
        } else {
            out.extend(current.to_lowercase());
        }
        last = current;
    }

    Ok(out)
}
