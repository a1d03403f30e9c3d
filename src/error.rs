/// Errors raised by board ingestion, move application and search
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid move, column {column} out of range")]
    ColumnOutOfRange { column: usize },

    #[error("invalid move, column {column} full")]
    ColumnFull { column: usize },

    #[error("no legal moves remain")]
    NoLegalMoves,

    #[error("malformed board: {0}")]
    MalformedInput(String),
}

impl GameError {
    /// Whether this error rejects a single move rather than the whole position
    pub fn is_invalid_move(&self) -> bool {
        matches!(
            self,
            GameError::ColumnOutOfRange { .. } | GameError::ColumnFull { .. }
        )
    }
}
