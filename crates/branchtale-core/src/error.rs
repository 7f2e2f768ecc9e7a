//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The selector resolved to a game id that has no catalog entry or no
    /// story behind it. The message is shown to the player verbatim.
    #[error("Game code `{0}` not found.")]
    GameNotFound(String),

    /// A choice was applied that does not address a selectable option.
    /// Input is filtered before it reaches the state machine, so this
    /// signals a programming error rather than bad player input.
    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    /// Story content failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The presentation channel rejected an operation.
    #[error("presentation error: {0}")]
    Presentation(String),

    /// An infrastructure error (file I/O, parsing).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
