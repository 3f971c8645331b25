// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Reading and writing moves as text.
//!
//! Puzzle databases write moves tersely and inconsistently: long form (`e2e4`, `e7e8q`),
//! algebraic short form in English or German (`Nf3`, `Sbd2`, `exd5`, `e8=Q`), bare pawn-file
//! captures (`cd`), and castling as `0-0` or `O-O`. A short-form token only names a
//! destination and some hints, so it is resolved by asking the move generator which legal
//! moves fit.
use hashbrown::HashMap;
use regex::Regex;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::analysis::GameState;
use crate::error::{NotationError, PuzzleError};
use crate::movegen::{MoveGenerator, MoveVec, PromotionPolicy};
use crate::moves::Move;
use crate::position::Position;
use crate::types::{File, PieceKind, PromotionKind, Rank, Square};

/// The language piece letters are written in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    German,
}

impl Language {
    /// The letter written for a piece, or the empty string for a pawn.
    pub fn piece_letter(self, kind: PieceKind) -> &'static str {
        match (self, kind) {
            (_, PieceKind::Pawn) => "",
            (_, PieceKind::King) => "K",
            (Language::English, PieceKind::Knight) => "N",
            (Language::English, PieceKind::Bishop) => "B",
            (Language::English, PieceKind::Rook) => "R",
            (Language::English, PieceKind::Queen) => "Q",
            (Language::German, PieceKind::Knight) => "S",
            (Language::German, PieceKind::Bishop) => "L",
            (Language::German, PieceKind::Rook) => "T",
            (Language::German, PieceKind::Queen) => "D",
        }
    }
}

impl Default for Language {
    fn default() -> Language {
        Language::English
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Language, String> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "de" | "german" | "deutsch" => Ok(Language::German),
            other => Err(format!("unknown language `{}`", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Language::English => write!(f, "en"),
            Language::German => write!(f, "de"),
        }
    }
}

lazy_static! {
    // Uppercase piece letters in either language.
    static ref PIECE_LETTERS: HashMap<char, PieceKind> = {
        let mut letters = HashMap::new();
        for &(c, kind) in &[
            ('N', PieceKind::Knight),
            ('S', PieceKind::Knight),
            ('B', PieceKind::Bishop),
            ('L', PieceKind::Bishop),
            ('R', PieceKind::Rook),
            ('T', PieceKind::Rook),
            ('Q', PieceKind::Queen),
            ('D', PieceKind::Queen),
            ('K', PieceKind::King),
        ] {
            letters.insert(c, kind);
        }
        letters
    };

    static ref LONG_FORM: Regex =
        Regex::new(r"^([a-h][1-8])([a-h][1-8])([nbrqNBRQSLTD])?$").unwrap();
    static ref SHORT_FORM: Regex =
        Regex::new(r"^([NBRQKSLTD])?([a-h])?([1-8])?([a-h][1-8])([NBRQSLTD])?$").unwrap();
    static ref PAWN_FILES: Regex = Regex::new(r"^([a-h])([a-h])([NBRQSLTD])?$").unwrap();
}

const RESULT_TOKENS: [&str; 6] = ["1-0", "0-1", "+-", "-+", "1/2-1/2", "*"];

/// Whether the token records a game result rather than a move.
pub fn is_result_token(token: &str) -> bool {
    RESULT_TOKENS.contains(&token.trim())
}

/// Strips capture and check marks, a promotion `=`, and a leading move number from a token.
/// Castling keeps its dashes, so `0-0` comes out as `-0` and `0-0-0` as `-0-0`.
pub fn clean_token(token: &str) -> String {
    let stripped: String = token
        .chars()
        .filter(|c| !matches!(c, ' ' | 'x' | '#' | '+' | '=' | '!' | '?'))
        .map(|c| if c == 'O' { '0' } else { c })
        .collect();

    stripped
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.')
        .to_string()
}

fn promotion_from_letter(letter: Option<&str>) -> Option<PromotionKind> {
    let c = letter?.chars().next()?;
    match PIECE_LETTERS.get(&c.to_ascii_uppercase()) {
        Some(PieceKind::Knight) => Some(PromotionKind::Knight),
        Some(PieceKind::Bishop) => Some(PromotionKind::Bishop),
        Some(PieceKind::Rook) => Some(PromotionKind::Rook),
        Some(PieceKind::Queen) => Some(PromotionKind::Queen),
        _ => None,
    }
}

fn square(text: &str) -> Square {
    Square::try_from(text).unwrap_or_else(|_| unreachable!("regex admitted bad square {}", text))
}

/// Resolves one token to the legal move it names for the side to move in `pos`. The position
/// is not changed.
pub fn parse_token(pos: &Position, token: &str) -> Result<Move, NotationError> {
    let raw = token.trim();
    if matches!(raw, "--" | "0000" | "Z0" | "null") {
        return Err(NotationError::Unsupported(raw.to_string()));
    }

    let cleaned = clean_token(raw);
    if cleaned.is_empty() {
        return Err(NotationError::Empty(raw.to_string()));
    }

    let gen = MoveGenerator::new();
    let side = pos.side_to_move();
    match cleaned.as_str() {
        "-0" | "-0-0" => {
            let file = if cleaned == "-0" { File::G } else { File::C };
            let destination = Square::of(side.back_rank(), file);
            let candidates =
                gen.legal_moves_to(pos, destination, PieceKind::King, PromotionPolicy::All);
            let castles: MoveVec = candidates
                .into_iter()
                .filter(|mv| mv.file_delta().abs() == 2)
                .collect();
            return exactly_one(raw, &castles);
        }
        _ => {}
    }

    if let Some(caps) = LONG_FORM.captures(&cleaned) {
        let source = square(&caps[1]);
        let destination = square(&caps[2]);
        let promotion = promotion_from_letter(caps.get(3).map(|m| m.as_str()));
        return parse_long_form(pos, raw, source, destination, promotion);
    }

    if let Some(caps) = PAWN_FILES.captures(&cleaned) {
        let from = file(&caps[1]);
        let to = file(&caps[2]);
        let promotion = promotion_from_letter(caps.get(3).map(|m| m.as_str()));
        let candidates: MoveVec = gen
            .legal_moves(pos, side, PromotionPolicy::All)
            .into_iter()
            .filter(|mv| {
                pos.piece_at(mv.source()).map(|p| p.kind) == Some(PieceKind::Pawn)
                    && mv.source().file() == from
                    && mv.destination().file() == to
                    && mv.file_delta().abs() == 1
            })
            .collect();
        return select_promotion(raw, candidates, promotion);
    }

    if let Some(caps) = SHORT_FORM.captures(&cleaned) {
        let kind = match caps.get(1) {
            Some(letter) => {
                let c = letter.as_str().chars().next().unwrap_or('K');
                PIECE_LETTERS.get(&c).cloned().unwrap_or(PieceKind::King)
            }
            None => PieceKind::Pawn,
        };

        let file_hint = caps.get(2).map(|m| file(m.as_str()));
        let rank_hint = caps.get(3).map(|m| rank(m.as_str()));
        let destination = square(&caps[4]);
        let promotion = promotion_from_letter(caps.get(5).map(|m| m.as_str()));
        if promotion.is_some() && kind != PieceKind::Pawn {
            return Err(NotationError::Unrecognized(raw.to_string()));
        }

        let candidates: MoveVec = gen
            .legal_moves_to(pos, destination, kind, PromotionPolicy::All)
            .into_iter()
            .filter(|mv| file_hint.map_or(true, |f| mv.source().file() == f))
            .filter(|mv| rank_hint.map_or(true, |r| mv.source().rank() == r))
            // A pawn named by its destination alone is pushing, not capturing.
            .filter(|mv| {
                kind != PieceKind::Pawn || file_hint.is_some() || mv.file_delta() == 0
            })
            .collect();
        return select_promotion(raw, candidates, promotion);
    }

    Err(NotationError::Unrecognized(raw.to_string()))
}

fn file(text: &str) -> File {
    text.chars()
        .next()
        .and_then(|c| File::try_from(c).ok())
        .unwrap_or_else(|| unreachable!("regex admitted bad file {}", text))
}

fn rank(text: &str) -> Rank {
    text.chars()
        .next()
        .and_then(|c| Rank::try_from(c).ok())
        .unwrap_or_else(|| unreachable!("regex admitted bad rank {}", text))
}

fn parse_long_form(
    pos: &Position,
    raw: &str,
    source: Square,
    destination: Square,
    promotion: Option<PromotionKind>,
) -> Result<Move, NotationError> {
    let side = pos.side_to_move();
    let mv = Move::new(source, destination, side).with_promotion(promotion);
    let pawn_promotes = pos.piece_at(source).map(|p| p.kind) == Some(PieceKind::Pawn)
        && destination.rank() == side.promotion_rank();
    if pawn_promotes && promotion.is_none() {
        return Err(NotationError::MissingPromotion(raw.to_string()));
    }

    if pos.is_valid_move(mv) {
        Ok(mv)
    } else {
        Err(NotationError::IllegalMove(raw.to_string()))
    }
}

fn select_promotion(
    raw: &str,
    candidates: MoveVec,
    promotion: Option<PromotionKind>,
) -> Result<Move, NotationError> {
    if promotion.is_none() && candidates.iter().any(|mv| mv.is_promotion()) {
        return Err(NotationError::MissingPromotion(raw.to_string()));
    }

    let matching: MoveVec = candidates
        .into_iter()
        .filter(|mv| mv.promotion() == promotion)
        .collect();
    exactly_one(raw, &matching)
}

fn exactly_one(raw: &str, candidates: &[Move]) -> Result<Move, NotationError> {
    match candidates {
        [mv] => Ok(*mv),
        [] => Err(NotationError::NoCandidate(raw.to_string())),
        _ => Err(NotationError::Ambiguous {
            token: raw.to_string(),
            count: candidates.len(),
        }),
    }
}

/// Resolves a whole line of tokens from `seed`, playing each move before reading the next.
/// The first token that can't be resolved fails the whole line.
pub fn parse_line<S: AsRef<str>>(seed: &Position, tokens: &[S]) -> Result<Vec<Move>, PuzzleError> {
    let mut pos = seed.clone();
    let mut moves = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        let wrap = |source| PuzzleError::Notation {
            index,
            token: token.to_string(),
            source,
        };

        let mv = parse_token(&pos, token).map_err(wrap)?;
        pos.apply_move(mv, true)
            .map_err(|err| wrap(NotationError::from(err)))?;
        moves.push(mv);
    }

    Ok(moves)
}

/// Writes a legal move of the side to move in algebraic notation, as played from `pos`.
pub fn render_move(pos: &Position, mv: Move, language: Language) -> Result<String, NotationError> {
    let piece = match pos.piece_at(mv.source()) {
        Some(piece) if pos.is_valid_move(mv) => piece,
        _ => return Err(NotationError::IllegalMove(mv.to_string())),
    };

    let mut text = String::new();
    if piece.kind == PieceKind::King && mv.file_delta().abs() == 2 {
        text.push_str(if mv.file_delta() > 0 { "0-0" } else { "0-0-0" });
    } else {
        let capture = pos.is_capture(mv);
        text.push_str(language.piece_letter(piece.kind));
        if piece.kind == PieceKind::Pawn {
            if capture {
                text.push_str(&mv.source().file().to_string());
            }
        } else {
            text.push_str(&disambiguation(pos, mv, piece.kind));
        }

        if capture {
            text.push('x');
        }

        text.push_str(&mv.destination().to_string());
        if let Some(kind) = mv.promotion() {
            text.push('=');
            text.push_str(language.piece_letter(kind.kind()));
        }
    }

    let mut after = pos.clone();
    after.apply_move(mv, true)?;
    match after.game_state() {
        GameState::WhiteWinner | GameState::BlackWinner => text.push('#'),
        GameState::WhiteInCheck | GameState::BlackInCheck => text.push('+'),
        _ => {}
    }

    Ok(text)
}

// File if that singles the piece out, else rank, else both.
fn disambiguation(pos: &Position, mv: Move, kind: PieceKind) -> String {
    let rivals: Vec<Square> = MoveGenerator::new()
        .legal_moves_to(pos, mv.destination(), kind, PromotionPolicy::QueenOnly)
        .iter()
        .map(|other| other.source())
        .filter(|&source| source != mv.source())
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let source = mv.source();
    if rivals.iter().all(|sq| sq.file() != source.file()) {
        source.file().to_string()
    } else if rivals.iter().all(|sq| sq.rank() != source.rank()) {
        source.rank().to_string()
    } else {
        source.to_string()
    }
}

/// Writes a sequence of moves played from `seed`.
pub fn render_line(
    seed: &Position,
    moves: &[Move],
    language: Language,
) -> Result<Vec<String>, NotationError> {
    let mut pos = seed.clone();
    let mut tokens = Vec::with_capacity(moves.len());
    for &mv in moves {
        tokens.push(render_move(&pos, mv, language)?);
        pos.apply_move(mv, true)?;
    }

    Ok(tokens)
}
