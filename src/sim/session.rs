/// GameSession: the complete state of one game, owned by the event loop.
///
/// The session is the only owner of the board and the only caller of the
/// engine. One command is fully processed — move computed, score added,
/// tile spawned, terminal check run — before the loop reads the next
/// input event, so every engine operation is atomic with respect to the
/// single thread of control.
///
/// The session owns its RNG. Production uses an entropy-seeded `StdRng`;
/// tests seed one for reproducible spawns.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::board::{self, Board, Direction};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    GameOver,
}

/// The closed set of inputs the shell can produce. Unrecognized keys
/// never become a Command.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(Direction),
    Restart,
    Quit,
}

pub struct GameSession {
    pub board: Board,
    pub score: u32,
    pub phase: Phase,
    rng: StdRng,
}

impl GameSession {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Start a session over a fresh two-tile board using the given RNG.
    pub fn with_rng(mut rng: StdRng) -> Self {
        let board = spawn_initial(&mut rng);
        GameSession {
            board,
            score: 0,
            phase: Phase::Playing,
            rng,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Apply one command. Returns false when the session should end
    /// (quit); the caller stops reading events and drops the session.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Move(direction) => self.apply_move(direction),
            Command::Restart => self.restart(),
            Command::Quit => return false,
        }
        true
    }

    fn apply_move(&mut self, direction: Direction) {
        if self.phase != Phase::Playing {
            return;
        }
        let result = board::move_board(&self.board, direction);
        if result.moved {
            self.board = result.board;
            self.score += result.score_gained;
            // A changed board always has an empty cell when a merge
            // occurred; ignore BoardFull defensively either way.
            let _ = self.board.add_random_tile(&mut self.rng);
        }
        // Checked after every move command, changed or not: a full
        // board with no merges left is over even if this key was a no-op.
        if self.board.is_terminal() {
            self.phase = Phase::GameOver;
        }
    }

    /// Back to a fresh two-tile board, score 0, from any phase.
    fn restart(&mut self) {
        self.board = spawn_initial(&mut self.rng);
        self.score = 0;
        self.phase = Phase::Playing;
    }
}

fn spawn_initial<R: Rng + ?Sized>(rng: &mut R) -> Board {
    let mut board = Board::new();
    // 16 empty cells: neither spawn can fail.
    let _ = board.add_random_tile(rng);
    let _ = board.add_random_tile(rng);
    board
}
