// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types for the crate.
//!
//! Rejected candidate moves are not errors: `Position::is_valid_move` and
//! `Position::apply_move` report those as `false`. The types here cover input that
//! can't be interpreted at all and operations that are wrong no matter the position.
use thiserror::Error;

use crate::types::{Color, Square};

/// Possible errors that can arise when parsing a FEN string into a `Position`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum FenParseError {
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("invalid empty-square count")]
    InvalidDigit,
    #[error("rank does not sum to eight squares")]
    FileDoesNotSumToEight,
    #[error("unknown piece letter")]
    UnknownPiece,
    #[error("side to move must be `w` or `b`")]
    InvalidSideToMove,
    #[error("invalid castling rights")]
    InvalidCastle,
    #[error("invalid en-passant square")]
    InvalidEnPassant,
    #[error("invalid halfmove clock")]
    InvalidHalfmove,
    #[error("invalid fullmove number")]
    InvalidFullmove,
    #[error("{0:?} must have exactly one king, found {1}")]
    InvalidKingCount(Color, u32),
}

/// Operations that can never succeed, regardless of whose turn it is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no piece at source square {0}")]
    NoPieceAtSource(Square),
    #[error("pawn move to {0} must name a promotion piece")]
    MissingPromotion(Square),
    #[error("move to {0} is not a promotion")]
    UnexpectedPromotion(Square),
    #[error("move to {0} would capture a king")]
    CapturesKing(Square),
    #[error("castling needs a rook of the king's color on {0}")]
    MissingCastleRook(Square),
    #[error("castling rook cannot land on occupied square {0}")]
    CastleRookBlocked(Square),
}

/// Errors produced while resolving a move token against a position.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("token `{0}` is empty once decorations are removed")]
    Empty(String),
    #[error("token `{0}` is not recognizable move notation")]
    Unrecognized(String),
    #[error("token `{0}` is not supported")]
    Unsupported(String),
    #[error("no legal move matches `{0}`")]
    NoCandidate(String),
    #[error("`{token}` is ambiguous between {count} legal moves")]
    Ambiguous { token: String, count: usize },
    #[error("`{0}` reaches the last rank without naming a promotion piece")]
    MissingPromotion(String),
    #[error("`{0}` is not a legal move in this position")]
    IllegalMove(String),
    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Errors produced while reading a puzzle record.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("record has too few fields (found {0})")]
    MissingFields(usize),
    #[error("malformed CSV record: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid position `{fen}`: {source}")]
    Seed {
        fen: String,
        #[source]
        source: FenParseError,
    },
    #[error("move {index} (`{token}`): {source}")]
    Notation {
        index: usize,
        token: String,
        #[source]
        source: NotationError,
    },
}
