// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Puzzle lines and replaying them.
//!
//! A puzzle line is a seed position and the forced sequence of moves that solves it. Three
//! record shapes are understood:
//!
//! * a Lichess CSV row, `PuzzleId,FEN,Moves,Rating,RatingDeviation,Popularity,NbPlays,Themes,
//!   GameUrl,OpeningTags`, whose first move is the opponent's setup move;
//! * a LucasChess row, `fen|label|moves`, whose first move is already the solver's;
//! * a bare seed with no moves.
use csv::{ReaderBuilder, StringRecord};

use crate::error::{MoveError, NotationError, PuzzleError};
use crate::moves::Move;
use crate::notation::{self, Language};
use crate::position::Position;

/// The shape of record a puzzle line was read from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    Lichess,
    LucasChess,
    Fen,
}

/// One row of the Lichess puzzle database.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LichessRecord {
    pub puzzle_id: String,
    #[serde(rename = "FEN")]
    pub fen: String,
    pub moves: String,
    pub rating: Option<u32>,
    pub rating_deviation: Option<u32>,
    pub popularity: Option<i32>,
    pub nb_plays: Option<u32>,
    pub themes: Option<String>,
    pub game_url: Option<String>,
    pub opening_tags: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PuzzleLine {
    id: Option<String>,
    kind: RecordKind,
    seed: Position,
    tokens: Vec<String>,
    moves: Vec<Move>,
    themes: Vec<String>,
    rating: Option<u32>,
    popularity: Option<i32>,
    plays: Option<u32>,
}

impl PuzzleLine {
    /// Reads a puzzle line from one line of text, guessing the record shape: a comma means
    /// Lichess, a pipe means LucasChess, anything else is a bare seed.
    pub fn parse(line: &str) -> Result<PuzzleLine, PuzzleError> {
        let line = line.trim();
        let result = if line.contains(',') {
            parse_lichess_line(line)
        } else if line.contains('|') {
            parse_lucas_line(line)
        } else {
            PuzzleLine::build(RecordKind::Fen, None, line, "")
        };

        if let Err(ref err) = result {
            warn!("rejected puzzle record `{}`: {}", line, err);
        }

        result
    }

    /// Builds a puzzle line from an already-deserialized Lichess row.
    pub fn from_lichess_record(record: &LichessRecord) -> Result<PuzzleLine, PuzzleError> {
        let mut line = PuzzleLine::build(
            RecordKind::Lichess,
            Some(record.puzzle_id.clone()),
            &record.fen,
            &record.moves,
        )?;

        line.themes = record
            .themes
            .as_ref()
            .map(|themes| themes.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        line.rating = record.rating;
        line.popularity = record.popularity;
        line.plays = record.nb_plays;
        Ok(line)
    }

    fn build(
        kind: RecordKind,
        id: Option<String>,
        fen: &str,
        moves: &str,
    ) -> Result<PuzzleLine, PuzzleError> {
        let fen = fen.trim();
        let seed = Position::from_fen(fen).map_err(|source| PuzzleError::Seed {
            fen: fen.to_string(),
            source,
        })?;

        let tokens: Vec<String> = moves
            .split_whitespace()
            .filter(|token| !notation::is_result_token(token))
            .map(str::to_string)
            .collect();
        let moves = notation::parse_line(&seed, &tokens)?;
        debug!(
            "parsed {:?} puzzle {} with {} moves",
            kind,
            id.as_ref().map(String::as_str).unwrap_or("-"),
            moves.len()
        );

        Ok(PuzzleLine {
            id,
            kind,
            seed,
            tokens,
            moves,
            themes: Vec::new(),
            rating: None,
            popularity: None,
            plays: None,
        })
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().map(String::as_str)
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn seed(&self) -> &Position {
        &self.seed
    }

    /// The move tokens as they appeared in the record, result tokens removed.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    pub fn rating(&self) -> Option<u32> {
        self.rating
    }

    pub fn popularity(&self) -> Option<i32> {
        self.popularity
    }

    pub fn plays(&self) -> Option<u32> {
        self.plays
    }

    pub fn has_theme(&self, theme: &str) -> bool {
        self.themes.iter().any(|t| t.eq_ignore_ascii_case(theme))
    }

    /// Whether every one of `themes` is among the line's tags.
    pub fn has_themes(&self, themes: &[&str]) -> bool {
        themes.iter().all(|theme| self.has_theme(theme))
    }

    /// Whether the rating lies in the inclusive range `min..=max`. An open bound admits
    /// anything on that side; an unrated line is only admitted when both bounds are open.
    pub fn is_rated_within(&self, min: Option<u32>, max: Option<u32>) -> bool {
        match self.rating {
            Some(rating) => {
                min.map_or(true, |min| rating >= min) && max.map_or(true, |max| rating <= max)
            }
            None => min.is_none() && max.is_none(),
        }
    }

    /// Renders `count` moves of the line in algebraic notation, starting with move `start`.
    pub fn notation(
        &self,
        start: usize,
        count: usize,
        language: Language,
    ) -> Result<String, NotationError> {
        let start = start.min(self.moves.len());
        let end = start.saturating_add(count).min(self.moves.len());
        let mut pos = self.seed.clone();
        for &mv in &self.moves[..start] {
            pos.apply_move(mv, true)?;
        }

        let tokens = notation::render_line(&pos, &self.moves[start..end], language)?;
        Ok(tokens.join(" "))
    }
}

fn parse_lichess_line(line: &str) -> Result<PuzzleLine, PuzzleError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Err(PuzzleError::MissingFields(0));
    }

    if record.len() < 3 {
        return Err(PuzzleError::MissingFields(record.len()));
    }

    let record: LichessRecord = record.deserialize(None)?;
    PuzzleLine::from_lichess_record(&record)
}

fn parse_lucas_line(line: &str) -> Result<PuzzleLine, PuzzleError> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 3 {
        return Err(PuzzleError::MissingFields(parts.len()));
    }

    PuzzleLine::build(RecordKind::LucasChess, None, parts[0], parts[2])
}

/// A solver's walk through a puzzle line.
///
/// The session alternates between the solver, who proposes moves with `try_move`, and the
/// opponent, whose replies are played with `play_reply`.
#[derive(Clone, Debug)]
pub struct PuzzleSession<'a> {
    line: &'a PuzzleLine,
    position: Position,
    next: usize,
}

impl<'a> PuzzleSession<'a> {
    /// Starts a session at the seed. Lichess lines open with the opponent's move, which is
    /// played immediately so the solver moves first.
    pub fn new(line: &'a PuzzleLine) -> Result<PuzzleSession<'a>, MoveError> {
        let mut session = PuzzleSession {
            line,
            position: line.seed.clone(),
            next: 0,
        };

        if line.kind != RecordKind::LucasChess && !line.moves.is_empty() {
            session.play_reply()?;
        }

        Ok(session)
    }

    pub fn line(&self) -> &'a PuzzleLine {
        self.line
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Number of moves of the line played so far.
    pub fn progress(&self) -> usize {
        self.next
    }

    pub fn expected_move(&self) -> Option<Move> {
        self.line.moves.get(self.next).cloned()
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.line.moves.len()
    }

    /// Plays `mv` if it is the move the line expects. On the last move of a mating puzzle any
    /// legal move that delivers mate is accepted too. Returns whether the move was played.
    pub fn try_move(&mut self, mv: Move) -> Result<bool, MoveError> {
        let expected = match self.expected_move() {
            Some(expected) => expected,
            None => return Ok(false),
        };

        if !self.position.is_valid_move(mv) {
            trace!("puzzle move {} is not legal", mv);
            return Ok(false);
        }

        if mv == expected {
            self.position.apply_move(mv, true)?;
            self.next += 1;
            return Ok(true);
        }

        let is_last = self.next + 1 == self.line.moves.len();
        if is_last && self.line.has_theme("mate") {
            let mut trial = self.position.clone();
            trial.apply_move(mv, true)?;
            if trial.game_state().winner().is_some() {
                debug!("accepted alternative mate {} (expected {})", mv, expected);
                self.position = trial;
                self.next += 1;
                return Ok(true);
            }
        }

        trace!("puzzle move {} is not {}", mv, expected);
        Ok(false)
    }

    /// Plays the next move of the line on the opponent's behalf.
    pub fn play_reply(&mut self) -> Result<Option<Move>, MoveError> {
        let mv = match self.expected_move() {
            Some(mv) => mv,
            None => return Ok(None),
        };

        self.position.apply_move(mv, true)?;
        self.next += 1;
        Ok(Some(mv))
    }
}
