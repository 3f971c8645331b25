// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::fmt::{self, Write};

use crate::analysis::{self, GameState};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::error::{FenParseError, MoveError};
use crate::moves::Move;
use crate::pieces::{self, PawnMove};
use crate::types::TableIndex;
use crate::types::{CastleStatus, Color, File, Piece, PieceKind, Rank, Square};
use crate::types::{COLORS, FILES, RANKS};

pub const START_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq";

/// Everything needed to take back a move made with `Position::make_move`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Undo {
    mv: Move,
    moved: Piece,
    captured: Option<(Square, Piece)>,
    rook: Option<(Square, Square)>,
    castle_status: CastleStatus,
    game_state: GameState,
}

impl Undo {
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// The piece taken by this move and the square it stood on, which differs from the move's
    /// destination for en-passant captures.
    pub fn captured(&self) -> Option<(Square, Piece)> {
        self.captured
    }
}

#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    castle_status: CastleStatus,
    history: Vec<Move>,
    game_state: GameState,
}

//
// Board state getters
//

impl Position {
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    pub fn pieces(&self, color: Color) -> Bitboard {
        self.board.pieces(color)
    }

    pub fn pieces_of_kind(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.board.pieces_of_kind(color, kind)
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    /// Every move applied since the position was set up, including a pre-move implied by the
    /// en-passant field of the seed.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().cloned()
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.castle_status.contains(CastleStatus::kingside(color))
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.castle_status.contains(CastleStatus::queenside(color))
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.board.king_square(color)
    }
}

//
// Move legality
//

impl Position {
    /// Move legality test. A move is valid if it is its player's turn, the player owns the moving
    /// piece, the piece can reach the destination, and the move doesn't leave the player's own
    /// king in check.
    pub fn is_valid_move(&self, mv: Move) -> bool {
        if mv.player() != self.side_to_move {
            return false;
        }

        let piece = match self.piece_at(mv.source()) {
            Some(piece) if piece.color == mv.player() => piece,
            _ => return false,
        };

        if mv.source() == mv.destination() {
            return false;
        }

        // Kings are never captured; a position where one could be is already over.
        match self.piece_at(mv.destination()) {
            Some(target) if target.color == mv.player() || target.kind == PieceKind::King => {
                return false;
            }
            _ => {}
        }

        self.piece_accepts(piece, mv) && !self.would_leave_in_check(mv)
    }

    /// The piece's own rule for this move, in the context of this board but ignoring the safety
    /// of the mover's king.
    fn piece_accepts(&self, piece: Piece, mv: Move) -> bool {
        if mv.is_promotion() != is_promoting(piece, mv) {
            return false;
        }

        if !pieces::is_geometric_move(piece.kind, mv) {
            return false;
        }

        match piece.kind {
            PieceKind::Pawn => self.pawn_accepts(mv),
            PieceKind::Knight => true,
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                self.board.is_path_clear(mv.source(), mv.destination())
            }
            PieceKind::King => !pieces::is_castle_shape(mv) || self.castle_accepts(mv),
        }
    }

    fn pawn_accepts(&self, mv: Move) -> bool {
        let destination_empty = self.piece_at(mv.destination()).is_none();
        match pieces::classify_pawn_move(mv) {
            PawnMove::OneStep => destination_empty,
            PawnMove::TwoSteps => {
                destination_empty && self.board.is_path_clear(mv.source(), mv.destination())
            }
            PawnMove::Capture => !destination_empty || self.is_en_passant(mv),
            PawnMove::Invalid => false,
        }
    }

    /// Whether `mv` is a pawn capturing en-passant: a diagonal step onto an empty square right
    /// behind an enemy pawn that advanced two squares on the previous move.
    pub fn is_en_passant(&self, mv: Move) -> bool {
        match self.piece_at(mv.source()) {
            Some(piece) if piece.kind == PieceKind::Pawn && piece.color == mv.player() => {}
            _ => return false,
        }

        if pieces::classify_pawn_move(mv) != PawnMove::Capture
            || self.piece_at(mv.destination()).is_some()
        {
            return false;
        }

        let last = match self.last_move() {
            Some(last) => last,
            None => return false,
        };

        let pushed = Piece::new(PieceKind::Pawn, mv.player().opponent());
        self.piece_at(last.destination()) == Some(pushed)
            && pieces::classify_pawn_move(last) == PawnMove::TwoSteps
            && last.destination().file() == mv.destination().file()
            && last.destination().rank() == mv.source().rank()
    }

    fn castle_accepts(&self, mv: Move) -> bool {
        let player = mv.player();
        let kingside = mv.file_delta() > 0;
        let (allowed, corner) = if kingside {
            (self.can_castle_kingside(player), Square::of(player.back_rank(), File::H))
        } else {
            (self.can_castle_queenside(player), Square::of(player.back_rank(), File::A))
        };

        if !allowed || self.is_check(player) {
            return false;
        }

        if self.piece_at(corner) != Some(Piece::new(PieceKind::Rook, player))
            || !self.board.is_path_clear(mv.source(), corner)
        {
            return false;
        }

        // The landing square is covered by the king-safety test every move goes through; the
        // square the king passes over is checked here as a one-square king move.
        let step = mv.file_delta().signum();
        match mv.source().offset(step, 0) {
            Some(transit) => !self.would_leave_in_check(Move::new(mv.source(), transit, player)),
            None => false,
        }
    }

    /// Plays the move on a copy of the board and reports whether the mover's king is attacked
    /// afterwards. Castling rights, history and side to move are not consulted.
    pub fn would_leave_in_check(&self, mv: Move) -> bool {
        let mut board = self.board;
        let piece = match board.remove_piece(mv.source()) {
            Ok(piece) => piece,
            Err(()) => return false,
        };

        if self.is_en_passant(mv) {
            let _ = board.remove_piece(Square::of(mv.source().rank(), mv.destination().file()));
        }

        let _ = board.remove_piece(mv.destination());
        let _ = board.add_piece(mv.destination(), piece);
        let king = if piece.kind == PieceKind::King {
            Some(mv.destination())
        } else {
            board.king_square(piece.color)
        };

        match king {
            Some(king) => board.is_attacked(king, piece.color.opponent()),
            None => false,
        }
    }

    /// Whether `color`'s king is attacked.
    ///
    /// # Panics
    ///
    /// Panics if `color` has no king. Positions built with `from_fen` always have one.
    pub fn is_check(&self, color: Color) -> bool {
        let king = self
            .king_square(color)
            .expect("position has no king for the side being tested");
        self.board.is_attacked(king, color.opponent())
    }

    pub fn squares_attacking(&self, by: Color, target: Square) -> Bitboard {
        self.board.squares_attacking(by, target)
    }

    /// See `Board::is_path_clear`; panics on squares that aren't aligned.
    pub fn is_path_clear(&self, from: Square, to: Square) -> bool {
        self.board.is_path_clear(from, to)
    }

    /// Whether the piece on the move's source would take something, en-passant included.
    pub fn is_capture(&self, mv: Move) -> bool {
        self.piece_at(mv.destination()).is_some() || self.is_en_passant(mv)
    }
}

fn is_promoting(piece: Piece, mv: Move) -> bool {
    piece.kind == PieceKind::Pawn && mv.destination().rank() == piece.color.promotion_rank()
}

/// The rook's corner and landing square for a castling king move.
fn castle_rook_squares(mv: Move) -> (Square, Square) {
    let rank = mv.source().rank();
    if mv.file_delta() > 0 {
        (Square::of(rank, File::H), Square::of(rank, File::F))
    } else {
        (Square::of(rank, File::A), Square::of(rank, File::D))
    }
}

//
// Move application
//

impl Position {
    /// Applies a move and re-classifies the game.
    ///
    /// Unless `already_validated` is set the move is checked with `is_valid_move` first, and
    /// `Ok(false)` is returned, with nothing changed, if it is not legal. Errors are reserved for
    /// moves that make no sense in any position: an empty source square, a promotion piece
    /// where none belongs or a missing one where it does, a move onto a king, or a castle
    /// with no rook to bring across.
    pub fn apply_move(&mut self, mv: Move, already_validated: bool) -> Result<bool, MoveError> {
        let piece = self
            .piece_at(mv.source())
            .ok_or_else(|| MoveError::NoPieceAtSource(mv.source()))?;

        match (is_promoting(piece, mv), mv.is_promotion()) {
            (true, false) => return Err(MoveError::MissingPromotion(mv.destination())),
            (false, true) => return Err(MoveError::UnexpectedPromotion(mv.destination())),
            _ => {}
        }

        if let Some(target) = self.piece_at(mv.destination()) {
            if target.kind == PieceKind::King {
                return Err(MoveError::CapturesKing(mv.destination()));
            }
        }

        if !already_validated && !self.is_valid_move(mv) {
            trace!("rejected move {} in {}", mv, self.as_fen());
            return Ok(false);
        }

        // Only reachable when the caller vouched for the move.
        if piece.kind == PieceKind::King && pieces::is_castle_shape(mv) {
            let (corner, landing) = castle_rook_squares(mv);
            if self.piece_at(corner) != Some(Piece::new(PieceKind::Rook, piece.color)) {
                return Err(MoveError::MissingCastleRook(corner));
            }

            if self.piece_at(landing).is_some() {
                return Err(MoveError::CastleRookBlocked(landing));
            }
        }

        self.make_move(mv);
        let previous = self.game_state;
        self.game_state = analysis::classify(self);
        trace!("applied move {} ({:?})", mv, piece.kind);
        if self.game_state != previous {
            debug!("game state {:?} -> {:?}", previous, self.game_state);
        }

        Ok(true)
    }

    /// Makes a move that is already known to be legal and returns the record needed to take it
    /// back. The game state is left as it was; `apply_move` is the full transition.
    ///
    /// # Panics
    ///
    /// Panics if there is no piece at the move's source square.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let moved = self
            .piece_at(mv.source())
            .expect("invalid move: no piece at source square");
        let mut undo = Undo {
            mv,
            moved,
            captured: None,
            rook: None,
            castle_status: self.castle_status,
            game_state: self.game_state,
        };

        self.update_castle_status(mv, moved);

        // The captured piece usually sits on the destination square. En-passant is the one case
        // where it lies beside the source square instead.
        let capture_square = if self.is_en_passant(mv) {
            Some(Square::of(mv.source().rank(), mv.destination().file()))
        } else if self.piece_at(mv.destination()).is_some() {
            Some(mv.destination())
        } else {
            None
        };

        if let Some(square) = capture_square {
            if let Ok(piece) = self.board.remove_piece(square) {
                undo.captured = Some((square, piece));
            }
        }

        if moved.kind == PieceKind::King && pieces::is_castle_shape(mv) {
            let (from, to) = castle_rook_squares(mv);
            let rook = self
                .board
                .remove_piece(from)
                .expect("invalid move: castle without rook");
            self.board
                .add_piece(to, rook)
                .expect("invalid move: piece at rook target square");
            undo.rook = Some((from, to));
        }

        let placed = match mv.promotion() {
            Some(kind) if moved.kind == PieceKind::Pawn => Piece::new(kind.kind(), moved.color),
            _ => moved,
        };

        let _ = self.board.remove_piece(mv.source());
        self.board
            .add_piece(mv.destination(), placed)
            .expect("invalid move: piece at destination square");
        self.history.push(mv);
        self.side_to_move = self.side_to_move.opponent();
        undo
    }

    /// Takes back the move recorded in `undo`, which must be the last move made.
    pub fn unmake_move(&mut self, undo: Undo) {
        let mv = undo.mv;
        let popped = self.history.pop();
        debug_assert_eq!(Some(mv), popped, "unmake_move out of order");

        let _ = self.board.remove_piece(mv.destination());
        let _ = self.board.add_piece(mv.source(), undo.moved);
        if let Some((from, to)) = undo.rook {
            if let Ok(rook) = self.board.remove_piece(to) {
                let _ = self.board.add_piece(from, rook);
            }
        }

        if let Some((square, piece)) = undo.captured {
            let _ = self.board.add_piece(square, piece);
        }

        self.side_to_move = mv.player();
        self.castle_status = undo.castle_status;
        self.game_state = undo.game_state;
    }

    // Castling rights only ever go away: moving the king drops both, and moving a rook off its
    // corner or capturing a rook on its corner drops that side.
    fn update_castle_status(&mut self, mv: Move, moved: Piece) {
        if moved.kind == PieceKind::King {
            self.castle_status &= !CastleStatus::both(moved.color);
        }

        for &square in &[mv.source(), mv.destination()] {
            for &color in &COLORS {
                let rank = color.back_rank();
                if square == Square::of(rank, File::H) {
                    self.castle_status &= !CastleStatus::kingside(color);
                } else if square == Square::of(rank, File::A) {
                    self.castle_status &= !CastleStatus::queenside(color);
                }
            }
        }
    }
}

//
// FEN parsing and generation.
//
// Seeds are FEN with everything after the side to move optional: castling rights, an
// en-passant target, and the two clocks. The clocks are accepted and dropped.
//

impl Position {
    pub fn from_start_position() -> Position {
        Position::from_fen(START_POSITION).expect("start position is well-formed")
    }

    /// Constructs a new position from a FEN representation of a board position.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Position, FenParseError> {
        use std::iter::Peekable;
        use std::str::Chars;

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat(iter: &mut Stream<'_>, expected: char) -> Result<(), FenParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(FenParseError::UnexpectedChar(c)),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn advance(iter: &mut Stream<'_>) {
            let _ = iter.next();
        }

        fn peek(iter: &mut Stream<'_>) -> Result<char, FenParseError> {
            iter.peek().cloned().ok_or(FenParseError::UnexpectedEnd)
        }

        // Skips the separator before an optional field and reports whether the field is there.
        fn next_field(iter: &mut Stream<'_>) -> bool {
            while iter.peek() == Some(&' ') {
                advance(iter);
            }

            iter.peek().is_some()
        }

        fn eat_side_to_move(iter: &mut Stream<'_>) -> Result<Color, FenParseError> {
            let side = match peek(iter)? {
                'w' => Color::White,
                'b' => Color::Black,
                _ => return Err(FenParseError::InvalidSideToMove),
            };

            advance(iter);
            Ok(side)
        }

        fn eat_castle_status(iter: &mut Stream<'_>) -> Result<CastleStatus, FenParseError> {
            if peek(iter)? == '-' {
                advance(iter);
                return Ok(CastleStatus::NONE);
            }

            let mut status = CastleStatus::NONE;
            while let Some(&c) = iter.peek() {
                match c {
                    'K' => status |= CastleStatus::WHITE_KINGSIDE,
                    'k' => status |= CastleStatus::BLACK_KINGSIDE,
                    'Q' => status |= CastleStatus::WHITE_QUEENSIDE,
                    'q' => status |= CastleStatus::BLACK_QUEENSIDE,
                    ' ' => break,
                    _ => return Err(FenParseError::InvalidCastle),
                }

                advance(iter);
            }

            Ok(status)
        }

        fn eat_en_passant(iter: &mut Stream<'_>) -> Result<Option<Square>, FenParseError> {
            let c = peek(iter)?;
            if c == '-' {
                advance(iter);
                return Ok(None);
            }

            let file = File::try_from(c).map_err(|_| FenParseError::InvalidEnPassant)?;
            advance(iter);
            let rank = Rank::try_from(peek(iter)?).map_err(|_| FenParseError::InvalidEnPassant)?;
            advance(iter);
            Ok(Some(Square::of(rank, file)))
        }

        fn eat_number(iter: &mut Stream<'_>, err: FenParseError) -> Result<u32, FenParseError> {
            let mut buf = String::new();
            while let Some(&c) = iter.peek() {
                if !c.is_digit(10) {
                    break;
                }

                buf.push(c);
                advance(iter);
            }

            buf.parse::<u32>().map_err(|_| err)
        }

        let mut board = Board::new();
        let iter = &mut fen.as_ref().trim().chars().peekable();
        for &rank in RANKS.iter().rev() {
            let mut file = File::A as usize;
            while file <= File::H as usize {
                let c = peek(iter)?;
                // digits 1 through 8 indicate empty squares.
                if c.is_digit(10) {
                    if c < '1' || c > '8' {
                        return Err(FenParseError::InvalidDigit);
                    }

                    file += c as usize - '0' as usize;
                    if file > 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    advance(iter);
                    continue;
                }

                // if it's not a digit, it represents a piece.
                let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece)?;
                let square = Square::of(rank, File::from_index(file));
                board
                    .add_piece(square, piece)
                    .map_err(|_| FenParseError::FileDoesNotSumToEight)?;
                advance(iter);
                file += 1;
            }

            if rank != Rank::One {
                eat(iter, '/')?;
            }
        }

        eat(iter, ' ')?;
        next_field(iter);
        let side_to_move = eat_side_to_move(iter)?;
        let castle_status = if next_field(iter) {
            eat_castle_status(iter)?
        } else {
            default_castle_status(&board)
        };

        let en_passant = if next_field(iter) {
            eat_en_passant(iter)?
        } else {
            None
        };

        if next_field(iter) {
            eat_number(iter, FenParseError::InvalidHalfmove)?;
        }

        if next_field(iter) {
            eat_number(iter, FenParseError::InvalidFullmove)?;
        }

        if let Some(c) = iter.next() {
            return Err(FenParseError::UnexpectedChar(c));
        }

        for &color in &COLORS {
            let kings = board.pieces_of_kind(color, PieceKind::King).count();
            if kings != 1 {
                return Err(FenParseError::InvalidKingCount(color, kings));
            }
        }

        let mut history = Vec::new();
        if let Some(target) = en_passant {
            history.push(en_passant_pre_move(&board, side_to_move, target)?);
        }

        let mut pos = Position {
            board,
            side_to_move,
            castle_status,
            history,
            game_state: GameState::NotCompleted,
        };
        pos.game_state = analysis::classify(&pos);
        debug!("seeded {} ({:?})", pos.as_fen(), pos.game_state);
        Ok(pos)
    }

    /// The en-passant target square, if the last move was a two-square pawn advance.
    pub fn en_passant_square(&self) -> Option<Square> {
        let last = self.last_move()?;
        let pawn = Piece::new(PieceKind::Pawn, last.player());
        if self.piece_at(last.destination()) != Some(pawn)
            || pieces::classify_pawn_move(last) != PawnMove::TwoSteps
        {
            return None;
        }

        last.source().offset(0, last.player().pawn_direction())
    }

    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for &rank in RANKS.iter().rev() {
            let mut empty_squares = 0;
            for &file in &FILES {
                let square = Square::of(rank, file);
                if let Some(piece) = self.piece_at(square) {
                    if empty_squares != 0 {
                        let _ = write!(&mut buf, "{}", empty_squares);
                    }
                    let _ = write!(&mut buf, "{}", piece);
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                let _ = write!(&mut buf, "{}", empty_squares);
            }

            if rank != Rank::One {
                buf.push('/');
            }
        }

        let _ = write!(&mut buf, " {} ", self.side_to_move);
        if self.castle_status.is_empty() {
            buf.push('-');
        }
        for &(flag, chr) in &[
            (CastleStatus::WHITE_KINGSIDE, 'K'),
            (CastleStatus::WHITE_QUEENSIDE, 'Q'),
            (CastleStatus::BLACK_KINGSIDE, 'k'),
            (CastleStatus::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.castle_status.contains(flag) {
                buf.push(chr);
            }
        }

        buf.push(' ');
        match self.en_passant_square() {
            Some(square) => {
                let _ = write!(&mut buf, "{}", square);
            }
            None => buf.push('-'),
        }

        buf
    }
}

// Without a castling field, a right is granted when the king and that rook are both at home.
fn default_castle_status(board: &Board) -> CastleStatus {
    let mut status = CastleStatus::NONE;
    for &color in &COLORS {
        let rank = color.back_rank();
        let king = Piece::new(PieceKind::King, color);
        let rook = Piece::new(PieceKind::Rook, color);
        if board.piece_at(Square::of(rank, File::E)) != Some(king) {
            continue;
        }

        if board.piece_at(Square::of(rank, File::H)) == Some(rook) {
            status |= CastleStatus::kingside(color);
        }

        if board.piece_at(Square::of(rank, File::A)) == Some(rook) {
            status |= CastleStatus::queenside(color);
        }
    }

    status
}

// An en-passant target square means the opponent just advanced a pawn two squares past it.
fn en_passant_pre_move(
    board: &Board,
    side_to_move: Color,
    target: Square,
) -> Result<Move, FenParseError> {
    let pusher = side_to_move.opponent();
    let direction = pusher.pawn_direction();
    let source = target.offset(0, -direction);
    let destination = target.offset(0, direction);
    match (source, destination) {
        (Some(source), Some(destination))
            if source.rank() == pusher.pawn_rank()
                && board.piece_at(source).is_none()
                && board.piece_at(target).is_none()
                && board.piece_at(destination) == Some(Piece::new(PieceKind::Pawn, pusher)) =>
        {
            Ok(Move::new(source, destination, pusher))
        }
        _ => Err(FenParseError::InvalidEnPassant),
    }
}

//
// Trait implementations
//

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.board, f)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::from_start_position()
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis::GameState;
    use crate::error::MoveError;
    use crate::moves::Move;
    use crate::position::Position;
    use crate::types::{Color, Piece, PieceKind, PromotionKind, Square};

    fn mv(source: Square, destination: Square, player: Color) -> Move {
        Move::new(source, destination, player)
    }

    #[test]
    fn check_smoke() {
        let pos =
            Position::from_fen("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1")
                .unwrap();
        assert!(pos.is_check(Color::Black));
        assert_eq!(GameState::BlackInCheck, pos.game_state());
    }

    #[test]
    fn pinned_piece_cannot_move() {
        let pos = Position::from_fen("4k3/8/3q4/8/8/3B4/3K4/8 w").unwrap();
        assert!(!pos.is_valid_move(mv(Square::D3, Square::E4, Color::White)));
        assert!(pos.is_valid_move(mv(Square::D2, Square::E2, Color::White)));
    }

    #[test]
    fn pin_along_diagonal_allows_moving_along_it() {
        let pos = Position::from_fen("4k3/8/8/q7/8/2B5/3K4/8 w").unwrap();
        assert!(pos.is_valid_move(mv(Square::C3, Square::B4, Color::White)));
        assert!(!pos.is_valid_move(mv(Square::C3, Square::D4, Color::White)));
    }

    #[test]
    fn validation_order() {
        let pos = Position::from_start_position();
        // not black's turn
        assert!(!pos.is_valid_move(mv(Square::E7, Square::E5, Color::Black)));
        // white doesn't own e7
        assert!(!pos.is_valid_move(mv(Square::E7, Square::E5, Color::White)));
        // empty source
        assert!(!pos.is_valid_move(mv(Square::E4, Square::E5, Color::White)));
        // own piece on destination
        assert!(!pos.is_valid_move(mv(Square::A1, Square::A2, Color::White)));
        // blocked slider
        assert!(!pos.is_valid_move(mv(Square::A1, Square::A3, Color::White)));
        assert!(pos.is_valid_move(mv(Square::G1, Square::F3, Color::White)));
    }

    #[test]
    fn apply_move_flips_turn_and_records_history() {
        let mut pos = Position::from_start_position();
        assert_eq!(Ok(true), pos.apply_move(mv(Square::E2, Square::E4, Color::White), false));
        assert_eq!(Color::Black, pos.side_to_move());
        assert_eq!(1, pos.history().len());
        assert_eq!(Some(Square::E3), pos.en_passant_square());
        assert_eq!(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3",
            pos.as_fen()
        );
    }

    #[test]
    fn invalid_move_is_false_and_changes_nothing() {
        let mut pos = Position::from_start_position();
        assert_eq!(Ok(false), pos.apply_move(mv(Square::E2, Square::E5, Color::White), false));
        assert_eq!(Color::White, pos.side_to_move());
        assert!(pos.history().is_empty());
    }

    #[test]
    fn apply_move_errors() {
        let mut pos = Position::from_fen("8/4P3/8/8/8/8/8/K6k w").unwrap();
        assert_eq!(
            Err(MoveError::NoPieceAtSource(Square::D4)),
            pos.apply_move(mv(Square::D4, Square::D5, Color::White), false)
        );
        assert_eq!(
            Err(MoveError::MissingPromotion(Square::E8)),
            pos.apply_move(mv(Square::E7, Square::E8, Color::White), false)
        );
        assert_eq!(
            Err(MoveError::UnexpectedPromotion(Square::B2)),
            pos.apply_move(
                Move::promoting(Square::A1, Square::B2, Color::White, PromotionKind::Queen),
                false
            )
        );
    }

    #[test]
    fn castle_without_rook_is_an_error() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w").unwrap();
        let before = pos.as_fen();
        assert_eq!(
            Err(MoveError::MissingCastleRook(Square::H1)),
            pos.apply_move(mv(Square::E1, Square::G1, Color::White), true)
        );
        assert_eq!(
            Err(MoveError::MissingCastleRook(Square::A1)),
            pos.apply_move(mv(Square::E1, Square::C1, Color::White), true)
        );
        assert_eq!(before, pos.as_fen());

        // unvouched, the same move is simply illegal
        assert_eq!(
            Ok(false),
            pos.apply_move(mv(Square::E1, Square::G1, Color::White), false)
        );

        // a black rook in white's corner doesn't count
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2r w").unwrap();
        assert_eq!(
            Err(MoveError::MissingCastleRook(Square::H1)),
            pos.apply_move(mv(Square::E1, Square::G1, Color::White), true)
        );

        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4KB1R w").unwrap();
        assert_eq!(
            Err(MoveError::CastleRookBlocked(Square::F1)),
            pos.apply_move(mv(Square::E1, Square::G1, Color::White), true)
        );
    }

    #[test]
    fn attackers_of_the_king() {
        let pos = Position::from_fen("4k3/8/8/1B6/8/8/4R3/4K3 b").unwrap();
        let attackers = pos.squares_attacking(Color::White, Square::E8);
        assert_eq!(2, attackers.count());
        assert!(attackers.test(Square::B5));
        assert!(attackers.test(Square::E2));
        assert!(pos.squares_attacking(Color::Black, Square::E1).empty());
    }

    #[test]
    fn promotion_places_new_piece() {
        let mut pos = Position::from_fen("8/4P3/8/8/8/8/8/K6k w").unwrap();
        let promo = Move::promoting(Square::E7, Square::E8, Color::White, PromotionKind::Knight);
        assert_eq!(Ok(true), pos.apply_move(promo, false));
        assert_eq!(
            Some(Piece::new(PieceKind::Knight, Color::White)),
            pos.piece_at(Square::E8)
        );
        assert!(pos.piece_at(Square::E7).is_none());
    }

    #[test]
    fn make_unmake_restores_position() {
        let mut pos = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -",
        )
        .unwrap();
        let before = pos.as_fen();

        let castle = pos.make_move(mv(Square::E1, Square::G1, Color::White));
        assert_eq!(
            Some(Piece::new(PieceKind::Rook, Color::White)),
            pos.piece_at(Square::F1)
        );
        assert!(!pos.can_castle_queenside(Color::White));
        pos.unmake_move(castle);
        assert_eq!(before, pos.as_fen());

        let capture = pos.make_move(mv(Square::E5, Square::F7, Color::White));
        assert!(capture.captured().is_some());
        pos.unmake_move(capture);
        assert_eq!(before, pos.as_fen());
    }

    mod fen {
        use crate::error::FenParseError;
        use crate::moves::Move;
        use crate::position::Position;
        use crate::types::{Color, Piece, PieceKind, Square};

        #[test]
        fn minimal_seed() {
            let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w").unwrap();
            assert_eq!(Color::White, pos.side_to_move());
            assert!(!pos.can_castle_kingside(Color::White));
            assert!(pos.history().is_empty());
            assert_eq!("4k3/8/8/8/8/8/8/4K3 w - -", pos.as_fen());
        }

        #[test]
        fn starting_position() {
            let pos = Position::from_start_position();
            assert_eq!(
                Some(Piece::new(PieceKind::Queen, Color::White)),
                pos.piece_at(Square::D1)
            );
            assert_eq!(
                Some(Piece::new(PieceKind::King, Color::Black)),
                pos.piece_at(Square::E8)
            );
            assert!(pos.can_castle_kingside(Color::White));
            assert!(pos.can_castle_queenside(Color::Black));
            assert_eq!(16, pos.pieces(Color::Black).count());
        }

        #[test]
        fn castling_defaults_from_home_squares() {
            let pos = Position::from_fen("r3k3/8/8/8/8/8/8/4K2R b").unwrap();
            assert!(pos.can_castle_kingside(Color::White));
            assert!(!pos.can_castle_queenside(Color::White));
            assert!(!pos.can_castle_kingside(Color::Black));
            assert!(pos.can_castle_queenside(Color::Black));
        }

        #[test]
        fn explicit_castling_field_is_taken_as_given() {
            let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq").unwrap();
            assert!(pos.can_castle_kingside(Color::White));
            assert!(!pos.can_castle_queenside(Color::White));
            assert!(!pos.can_castle_kingside(Color::Black));
            assert!(pos.can_castle_queenside(Color::Black));
        }

        #[test]
        fn en_passant_field_becomes_a_pre_move() {
            let pos = Position::from_fen(
                "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3",
            )
            .unwrap();
            assert_eq!(
                Some(Move::new(Square::E2, Square::E4, Color::White)),
                pos.last_move()
            );
            assert!(pos.is_valid_move(Move::new(Square::D4, Square::E3, Color::Black)));
        }

        #[test]
        fn repeated_spaces_between_fields() {
            let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3  b   Q  -").unwrap();
            assert_eq!(Color::Black, pos.side_to_move());
            assert!(pos.can_castle_queenside(Color::White));
            assert_eq!("4k3/8/8/8/8/8/8/R3K3 b Q -", pos.as_fen());
        }

        #[test]
        fn bad_en_passant_field() {
            assert_eq!(
                Err(FenParseError::InvalidEnPassant),
                Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - e3").map(|_| ())
            );
        }

        #[test]
        fn king_count() {
            assert_eq!(
                Err(FenParseError::InvalidKingCount(Color::Black, 0)),
                Position::from_fen("8/8/8/8/8/8/8/4K3 w").map(|_| ())
            );
            assert_eq!(
                Err(FenParseError::InvalidKingCount(Color::White, 2)),
                Position::from_fen("4k3/8/8/8/8/8/8/3KK3 w").map(|_| ())
            );
        }

        #[test]
        fn malformed_seeds() {
            assert_eq!(
                Err(FenParseError::InvalidSideToMove),
                Position::from_fen("4k3/8/8/8/8/8/8/4K3 x").map(|_| ())
            );
            assert_eq!(
                Err(FenParseError::UnknownPiece),
                Position::from_fen("4k3/8/8/8/8/8/8/4X3 w").map(|_| ())
            );
            assert_eq!(
                Err(FenParseError::FileDoesNotSumToEight),
                Position::from_fen("4k4/8/8/8/8/8/8/4K3 w").map(|_| ())
            );
            assert_eq!(
                Err(FenParseError::InvalidCastle),
                Position::from_fen("4k3/8/8/8/8/8/8/4K3 w KX").map(|_| ())
            );
            assert_eq!(
                Err(FenParseError::UnexpectedEnd),
                Position::from_fen("4k3/8/8").map(|_| ())
            );
        }

        #[test]
        fn fen_round_trip() {
            for fen in &[
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -",
                "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -",
                "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3",
            ] {
                assert_eq!(*fen, Position::from_fen(fen).unwrap().as_fen());
            }
        }
    }
}
