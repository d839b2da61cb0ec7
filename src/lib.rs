// Click-driven chess session: selection state machine, promotion and transcript
pub mod board;
pub mod config;
pub mod save;
pub mod session;
pub mod view;

pub use board::cozy::Position;
pub use session::{ClickOutcome, Outcome, SessionController};
