//! Pick-up / drop turn state machine.
//!
//! A turn is two intents: [`GameEngine::pick_up`] lifts a piece from the
//! mover's reserve or from a cell they top, then [`GameEngine::drop`] places
//! it. Each intent runs to completion and returns a fresh [`EngineState`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{Board, CellCoord, Color, EngineConfig, EngineError, Piece, Pos, Reserve, Size};

/// Which intent the engine is waiting for.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No piece in hand; `pick_up` is the only move intent accepted.
    AwaitingPickup,
    /// One piece in hand; `drop` or `cancel`.
    PieceInHand,
}

/// Where to pick a piece up from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Source {
    /// A reserve slot. `color` must be the current player.
    Reserve { color: Color, size: Size },
    /// The top piece of a board cell.
    Cell(CellCoord),
}

/// Where the piece in hand came from, and where it goes back on cancel.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Origin {
    Reserve,
    Cell(CellCoord),
}

/// The lifted piece together with its origin.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct InHand {
    pub piece: Piece,
    pub origin: Origin,
}

/// How the game was decided.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum WinCause {
    /// The mover completed a line of their own.
    ThreeInARow,
    /// The mover lifted a piece that uncovered an opponent line and did not
    /// cover it again with the drop.
    Exposure,
}

/// Read-only view of the whole engine, for rendering.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct EngineState {
    /// `board[row][col]` is the cell's stack, bottom to top.
    pub board: [[Vec<Piece>; 3]; 3],
    pub reserves: Reserve,
    pub current_player: Color,
    pub phase: Phase,
    pub in_hand: Option<InHand>,
    pub game_over: bool,
    pub winner: Option<Color>,
    pub win_cause: Option<WinCause>,
    pub winning_line: Option<[CellCoord; 3]>,
    /// Completed turns since the last reset.
    pub move_count: u32,
}

impl EngineState {
    /// The visible piece at a cell, if any. Out-of-range cells are empty.
    pub fn top(&self, coord: CellCoord) -> Option<Piece> {
        self.board
            .get(coord.row as usize)
            .and_then(|row| row.get(coord.col as usize))
            .and_then(|stack| stack.last().copied())
    }

    /// Pieces of one color and size across reserve, board and hand.
    /// Always [`crate::PIECES_PER_SIZE`].
    pub fn piece_total(&self, color: Color, size: Size) -> u8 {
        let target = Piece::new(color, size);
        let on_board = self
            .board
            .iter()
            .flatten()
            .flatten()
            .filter(|&&piece| piece == target)
            .count() as u8;
        let held = self.in_hand.map_or(0, |h| u8::from(h.piece == target));
        self.reserves.count(color, size) + on_board + held
    }
}

/// Piece in hand plus the cell it was lifted from (None for the reserve).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Held {
    piece: Piece,
    from: Option<Pos>,
}

/// Decided game.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Win {
    winner: Color,
    cause: WinCause,
    line: [Pos; 3],
}

/// Rules engine for one game: board, reserves, turn order and outcome.
///
/// The engine owns all game state exclusively and is driven by one intent
/// at a time.
#[derive(Clone, Debug)]
pub struct GameEngine {
    config: EngineConfig,
    board: Board,
    reserve: Reserve,
    current: Color,
    held: Option<Held>,
    result: Option<Win>,
    moves: u32,
}

impl GameEngine {
    /// Fresh game: empty board, full reserves, configured color to move.
    pub fn new(config: EngineConfig) -> GameEngine {
        GameEngine {
            config,
            board: Board::new(),
            reserve: Reserve::new(),
            current: config.starting_color,
            held: None,
            result: None,
            moves: 0,
        }
    }

    /// Engine resumed from a board position with `to_move` on turn.
    ///
    /// Reserves hold whatever is not on the board. Returns None if the board
    /// has more than [`crate::PIECES_PER_SIZE`] pieces of any color and size.
    ///
    /// The board is not evaluated: a position that already shows a line is
    /// accepted undecided, and the game is only decided by the next drop.
    pub fn from_position(config: EngineConfig, board: Board, to_move: Color) -> Option<GameEngine> {
        let reserve = Reserve::remaining(
            board.pieces_on_board(Color::A),
            board.pieces_on_board(Color::B),
        )?;
        Some(GameEngine {
            board,
            reserve,
            current: to_move,
            ..GameEngine::new(config)
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn reserve(&self) -> &Reserve {
        &self.reserve
    }

    /// Color whose turn it is. Once the game is over, the color that made
    /// the deciding drop.
    pub fn current_player(&self) -> Color {
        self.current
    }

    pub fn phase(&self) -> Phase {
        if self.held.is_some() {
            Phase::PieceInHand
        } else {
            Phase::AwaitingPickup
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn winner(&self) -> Option<Color> {
        self.result.map(|win| win.winner)
    }

    /// Lift a piece into hand.
    ///
    /// Reserve slots must belong to the current player and be non-empty;
    /// cells must be topped by the current player. Any other source,
    /// including an off-grid cell, is [`EngineError::InvalidSource`].
    #[instrument(skip(self), fields(player = ?self.current))]
    pub fn pick_up(&mut self, source: Source) -> Result<EngineState, EngineError> {
        self.ensure_running()?;
        if self.held.is_some() {
            return Err(EngineError::WrongPhase);
        }

        let player = self.current;
        let held = match source {
            Source::Reserve { color, size } => {
                if color != player || !self.reserve.take(color, size) {
                    return Err(EngineError::InvalidSource);
                }
                Held {
                    piece: Piece::new(color, size),
                    from: None,
                }
            }
            Source::Cell(coord) => {
                let pos = Pos::try_from(coord).map_err(|_| EngineError::InvalidSource)?;
                match self.board.top(pos) {
                    Some(piece) if piece.color == player => {
                        self.board.pop(pos);
                        Held {
                            piece,
                            from: Some(pos),
                        }
                    }
                    _ => return Err(EngineError::InvalidSource),
                }
            }
        };

        debug!(piece = %held.piece, "picked up");
        self.held = Some(held);
        Ok(self.snapshot())
    }

    /// Place the piece in hand at `dest` and resolve the turn.
    ///
    /// An off-grid `dest` is rejected with the piece still in hand. An
    /// occupied `dest` whose top is not strictly smaller sends the piece back
    /// to its origin and reports [`EngineError::IllegalPlacement`].
    ///
    /// If the piece came off the board and lifting it uncovered a line for
    /// the opponent, the drop must land on that line: when the opponent
    /// still has three in a row with the piece placed, the opponent wins and
    /// the piece stays where it was dropped. Otherwise the mover wins on a
    /// line of their own, or the turn passes.
    #[instrument(skip(self), fields(player = ?self.current))]
    pub fn drop(&mut self, dest: CellCoord) -> Result<EngineState, EngineError> {
        self.ensure_running()?;
        let held = self.held.ok_or(EngineError::WrongPhase)?;
        let to = Pos::try_from(dest)?;

        let player = self.current;
        let opponent = player.opponent();
        let exposed = held.from.is_some() && self.board.has_three_in_a_row(opponent);

        if let Err(err) = self.board.push(to, held.piece) {
            debug!(piece = %held.piece, "illegal placement, returning piece");
            self.held = None;
            self.return_to_origin(held);
            return Err(err);
        }
        self.held = None;
        self.moves += 1;

        if exposed {
            if let Some(line) = self.board.winning_line(opponent) {
                info!(winner = %opponent, "lifted piece exposed an opponent line");
                self.result = Some(Win {
                    winner: opponent,
                    cause: WinCause::Exposure,
                    line,
                });
                return Ok(self.snapshot());
            }
            debug!("exposed line covered by the drop");
        }

        if let Some(line) = self.board.winning_line(player) {
            info!(winner = %player, "three in a row");
            self.result = Some(Win {
                winner: player,
                cause: WinCause::ThreeInARow,
                line,
            });
            return Ok(self.snapshot());
        }

        self.current = opponent;
        debug!(piece = %held.piece, to = %dest, "turn passes");
        Ok(self.snapshot())
    }

    /// Put the piece in hand back where it came from. The turn does not pass.
    #[instrument(skip(self), fields(player = ?self.current))]
    pub fn cancel(&mut self) -> Result<EngineState, EngineError> {
        self.ensure_running()?;
        let held = self.held.take().ok_or(EngineError::WrongPhase)?;
        self.return_to_origin(held);
        debug!(piece = %held.piece, "cancelled");
        Ok(self.snapshot())
    }

    /// Start over with an empty board and full reserves. Always accepted.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> EngineState {
        *self = GameEngine::new(self.config);
        debug!(first = %self.current, "reset");
        self.snapshot()
    }

    /// Cells where the piece in hand could legally be dropped.
    /// Empty when nothing is in hand or the game is over.
    pub fn legal_destinations(&self) -> Vec<CellCoord> {
        match self.held {
            Some(held) if !self.is_game_over() => Pos::all()
                .filter(|&pos| self.board.can_place(held.piece.size, pos))
                .map(Pos::coord)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn snapshot(&self) -> EngineState {
        let board = std::array::from_fn(|row| {
            std::array::from_fn(|col| self.board.stack(Pos(row as u8 * 3 + col as u8)))
        });
        EngineState {
            board,
            reserves: self.reserve,
            current_player: self.current,
            phase: self.phase(),
            in_hand: self.held.map(|held| InHand {
                piece: held.piece,
                origin: match held.from {
                    Some(pos) => Origin::Cell(pos.coord()),
                    None => Origin::Reserve,
                },
            }),
            game_over: self.result.is_some(),
            winner: self.winner(),
            win_cause: self.result.map(|win| win.cause),
            winning_line: self.result.map(|win| win.line.map(Pos::coord)),
            move_count: self.moves,
        }
    }

    fn ensure_running(&self) -> Result<(), EngineError> {
        if self.is_game_over() {
            return Err(EngineError::GameAlreadyOver);
        }
        Ok(())
    }

    fn return_to_origin(&mut self, held: Held) {
        match held.from {
            Some(pos) => self.board.put(pos, held.piece),
            None => self.reserve.put_back(held.piece.color, held.piece.size),
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
