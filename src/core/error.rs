// Ficheiro: src/core/error.rs
// Descrição: Erros recuperáveis do motor (entrada externa malformada).

use thiserror::Error;

/// Campo de uma string FEN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenField {
    FieldCount,
    Placement,
    SideToMove,
    Castling,
    EnPassant,
    HalfmoveClock,
    FullmoveNumber,
}

impl std::fmt::Display for FenField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FenField::FieldCount => "number of fields",
            FenField::Placement => "piece placement",
            FenField::SideToMove => "side to move",
            FenField::Castling => "castling rights",
            FenField::EnPassant => "en passant square",
            FenField::HalfmoveClock => "halfmove clock",
            FenField::FullmoveNumber => "fullmove number",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ChessError {
    #[error("Invalid FEN: bad {field} '{value}'")]
    InvalidFen { field: FenField, value: String },

    #[error("Invalid move '{text}' in position {fen}")]
    InvalidMove { text: String, fen: String },

    #[error("Invalid square '{0}'")]
    InvalidSquare(String),

    #[error("Could not build search thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ChessError {
    pub(crate) fn fen(field: FenField, value: impl Into<String>) -> Self {
        ChessError::InvalidFen { field, value: value.into() }
    }
}

pub type ChessResult<T> = Result<T, ChessError>;
