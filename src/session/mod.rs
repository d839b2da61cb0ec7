pub mod promotion;
pub mod transcript;

use std::fmt;
use std::path::{Path, PathBuf};
use cozy_chess::{BitBoard, Color, Square};
use crate::board::{BoardPiece, DrawReason, RulesEngine, RulesError};
use crate::save::{self, SaveError};
use crate::view::BoardView;
use self::promotion::{promote, AlwaysQueen, PromotionResolver};
use self::transcript::MoveRecorder;

/// The two-click gesture: nothing held, or a piece plus the targets it had
/// when it was picked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Empty,
    Holding { piece: BoardPiece, targets: BitBoard },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingSelection,
    PieceSelected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionState {
    turn_to_move: Color,
    selection: Selection,
    active: bool,
}

impl SessionState {
    pub fn new(first_to_move: Color) -> Self {
        Self { turn_to_move: first_to_move, selection: Selection::Empty, active: true }
    }

    pub fn turn_to_move(&self) -> Color { self.turn_to_move }
    pub fn selection(&self) -> Selection { self.selection }
    pub fn is_active(&self) -> bool { self.active }

    pub fn phase(&self) -> Phase {
        match self.selection {
            Selection::Empty => Phase::AwaitingSelection,
            Selection::Holding { .. } => Phase::PieceSelected,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    /// A draw the engine reported, with its reason when it gave one.
    Draw(Option<DrawReason>),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Checkmate { winner: Color::White } => write!(f, "White wins by checkmate."),
            Outcome::Checkmate { winner: Color::Black } => write!(f, "Black wins by checkmate."),
            Outcome::Stalemate => write!(f, "Stalemate. The game is drawn."),
            Outcome::Draw(Some(reason)) => write!(f, "Draw by {}.", reason),
            Outcome::Draw(None) => write!(f, "The game is drawn."),
        }
    }
}

/// What a single click did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Selected { square: Square, targets: BitBoard },
    Deselected,
    Moved { notation: String, outcome: Option<Outcome> },
}

/// One game: turn order, the click state machine, and the transcript.
pub struct SessionController<E, V> {
    state: SessionState,
    engine: E,
    view: V,
    recorder: MoveRecorder,
    promotion: Box<dyn PromotionResolver>,
    outcome: Option<Outcome>,
}

impl<E: RulesEngine, V: BoardView> SessionController<E, V> {
    /// Starts a session on the engine's position. A position that is already
    /// over ends the session here, before any click.
    pub fn new(engine: E, mut view: V) -> Self {
        view.refresh(&engine.snapshot());
        let state = SessionState::new(engine.side_to_move());
        let mut session = Self { state, engine, view, recorder: MoveRecorder::new(), promotion: Box::new(AlwaysQueen), outcome: None };
        session.check_terminal();
        session
    }

    pub fn with_promotion(mut self, resolver: impl PromotionResolver + 'static) -> Self {
        self.promotion = Box::new(resolver);
        self
    }

    pub fn handle_tile_click(&mut self, sq: Square) -> Result<ClickOutcome, RulesError> {
        if !self.state.active {
            log::trace!("click on {} after game end", sq);
            return Ok(ClickOutcome::Ignored);
        }
        let turn = self.state.turn_to_move;
        let own = self.engine.piece_at(sq).filter(|p| p.color == turn);

        match self.state.selection {
            Selection::Empty => match own {
                Some(piece) => Ok(self.select(piece)),
                None => {
                    log::trace!("click on {} selects nothing", sq);
                    Ok(ClickOutcome::Ignored)
                }
            },
            Selection::Holding { piece, targets } => {
                if targets.has(sq) && self.engine.is_valid_move(&piece, sq, turn) {
                    self.execute_move(piece, sq)
                } else if let Some(other) = own {
                    Ok(self.select(other))
                } else {
                    self.clear_selection();
                    Ok(ClickOutcome::Deselected)
                }
            }
        }
    }

    fn select(&mut self, piece: BoardPiece) -> ClickOutcome {
        let targets = self.engine.legal_targets(&piece);
        log::debug!("selected {:?} on {} with {} targets", piece.kind, piece.square, targets.len());
        self.state.selection = Selection::Holding { piece, targets };
        self.view.highlight_squares(targets);
        ClickOutcome::Selected { square: piece.square, targets }
    }

    fn clear_selection(&mut self) {
        self.state.selection = Selection::Empty;
        self.view.reset_highlights();
    }

    fn execute_move(&mut self, mut piece: BoardPiece, target: Square) -> Result<ClickOutcome, RulesError> {
        let turn = self.state.turn_to_move;
        if piece.promotes_on(target) {
            promote(&mut *self.promotion, &mut piece, target);
        }
        if let Err(e) = self.engine.make_move(target, &piece) {
            log::error!("engine refused {}{}: {}", piece.square, target, e);
            self.clear_selection();
            return Err(e);
        }
        let notation = self.recorder.record(target, &piece, &self.engine, turn);
        log::info!("{:?} plays {}", turn, notation);
        self.view.refresh(&self.engine.snapshot());
        self.state.turn_to_move = !turn;
        let outcome = self.check_terminal();
        self.clear_selection();
        Ok(ClickOutcome::Moved { notation, outcome })
    }

    /// Mate first: a side with no replies is only stalemated if not in check.
    fn check_terminal(&mut self) -> Option<Outcome> {
        let to_move = self.state.turn_to_move;
        let outcome = if self.engine.is_checkmate(to_move) {
            Some(Outcome::Checkmate { winner: !to_move })
        } else if self.engine.is_stalemate(to_move) {
            Some(Outcome::Stalemate)
        } else if self.engine.is_draw() {
            Some(Outcome::Draw(self.engine.draw_reason()))
        } else {
            None
        };
        if let Some(o) = outcome { self.end_game(o); }
        outcome
    }

    fn end_game(&mut self, outcome: Outcome) {
        if !self.state.active { return; }
        self.state.active = false;
        self.outcome = Some(outcome);
        log::info!("game over: {}", outcome);
        self.view.show_message(&outcome.to_string());
        self.view.disable_input();
    }

    /// Write the transcript to `dir` under a sanitised `name`.
    pub fn save_game(&self, dir: &Path, name: &str) -> Result<PathBuf, SaveError> {
        let path = dir.join(save::sanitize_filename(name)?);
        save::save(self.recorder.full_history(), &path)?;
        Ok(path)
    }

    pub fn state(&self) -> &SessionState { &self.state }
    pub fn turn_to_move(&self) -> Color { self.state.turn_to_move }
    pub fn selection(&self) -> Selection { self.state.selection }
    pub fn phase(&self) -> Phase { self.state.phase() }
    pub fn is_active(&self) -> bool { self.state.active }
    pub fn outcome(&self) -> Option<Outcome> { self.outcome }
    pub fn history(&self) -> &str { self.recorder.full_history() }
    pub fn engine(&self) -> &E { &self.engine }
    pub fn view(&self) -> &V { &self.view }
}
