//! Rejected intents.

/// Why the engine rejected an intent.
///
/// None of these are fatal. After any of them the engine is in a state it
/// has already been in (for [`EngineError::IllegalPlacement`], the held
/// piece has gone back to where it came from).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum EngineError {
    /// Empty reserve slot, wrong color, or a cell not topped by the mover.
    #[display("Nothing the current player can pick up there")]
    InvalidSource,

    /// Pick-up with a piece already in hand, or drop/cancel with none.
    #[display("Intent not allowed in the current phase")]
    WrongPhase,

    /// Destination top piece is the same size or larger.
    #[display("Destination holds a piece of equal or larger size")]
    IllegalPlacement,

    #[display("Game is already over")]
    GameAlreadyOver,

    #[display("Cell ({row},{col}) is outside the 3x3 grid")]
    OutOfRange { row: u8, col: u8 },
}

impl std::error::Error for EngineError {}
