/// Board engine — pure merge/slide logic, no I/O.
///
/// A cell stores the tile's *level*: 0 is empty, level k displays as 2^k.
/// Every direction is expressed as one primitive (`collapse_line`, which
/// compacts and merges toward index 0) plus two structural transforms:
///
///   Left    collapse each row
///   Right   reverse rows · collapse · reverse rows
///   Up      transpose · collapse · transpose
///   Down    transpose · reverse rows · collapse · reverse rows · transpose
///
/// This keeps the merge rules in exactly one place. The merge-once rule:
/// a tile produced by a merge never merges again within the same move,
/// so [1,1,1,0] collapses to [2,1,0,0], not [2,2,0,0] cascading further.

use std::error::Error;
use std::fmt;

use rand::Rng;

/// Board edge length.
pub const SIZE: usize = 4;

/// One row (or column, after transpose) of cell levels.
pub type Line = [u8; SIZE];

/// A slide direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// 4×4 grid of tile levels. A value type: moves produce a new board
/// rather than mutating in place, so merge history can never leak
/// between moves.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Board([Line; SIZE]);

/// Outcome of sliding a board in one direction.
///
/// `moved` is true iff `board` differs from the input in at least one
/// cell — compaction alone counts, merges are not required.
#[derive(Clone, Copy, Debug)]
pub struct MoveResult {
    pub board: Board,
    pub moved: bool,
    pub score_gained: u32,
}

/// Signalled by `add_random_tile` when no empty cell exists.
/// Callers treat this as a no-op, never as fatal.
#[derive(Debug)]
pub struct BoardFull;

impl fmt::Display for BoardFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no empty cell to spawn a tile into")
    }
}

impl Error for BoardFull {}

impl Board {
    pub fn new() -> Self {
        Board([[0; SIZE]; SIZE])
    }

    pub fn from_rows(rows: [Line; SIZE]) -> Self {
        Board(rows)
    }

    /// Level at (x, y); x is the column, y the row.
    pub fn level(&self, x: usize, y: usize) -> u8 {
        self.0[y][x]
    }

    pub fn rows(&self) -> &[Line; SIZE] {
        &self.0
    }

    /// All (x, y) coordinates whose cell is empty.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::with_capacity(SIZE * SIZE);
        for y in 0..SIZE {
            for x in 0..SIZE {
                if self.0[y][x] == 0 {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    /// Highest level present (0 on an empty board).
    pub fn highest_level(&self) -> u8 {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Rows become columns.
    pub fn transposed(&self) -> Board {
        let mut out = [[0u8; SIZE]; SIZE];
        for y in 0..SIZE {
            for x in 0..SIZE {
                out[x][y] = self.0[y][x];
            }
        }
        Board(out)
    }

    /// Each row reversed (horizontal mirror).
    pub fn inverted(&self) -> Board {
        let mut out = self.0;
        for row in out.iter_mut() {
            row.reverse();
        }
        Board(out)
    }

    /// Place a level-1 (90%) or level-2 (10%) tile into a uniformly
    /// chosen empty cell. The random source is injected so sessions and
    /// tests control seeding.
    pub fn add_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), BoardFull> {
        let empties = self.empty_cells();
        if empties.is_empty() {
            return Err(BoardFull);
        }
        let (x, y) = empties[rng.gen_range(0..empties.len())];
        self.0[y][x] = if rng.gen_bool(0.1) { 2 } else { 1 };
        Ok(())
    }

    /// True iff no move in any direction could change the board:
    /// zero empty cells and no two orthogonally adjacent equal levels.
    pub fn is_terminal(&self) -> bool {
        for y in 0..SIZE {
            for x in 0..SIZE {
                let v = self.0[y][x];
                if v == 0 {
                    return false;
                }
                if x + 1 < SIZE && self.0[y][x + 1] == v {
                    return false;
                }
                if y + 1 < SIZE && self.0[y + 1][x] == v {
                    return false;
                }
            }
        }
        true
    }
}

/// Displayed value of a level (0 for empty).
pub fn tile_value(level: u8) -> u32 {
    if level == 0 { 0 } else { 1u32 << level }
}

/// Compact non-zero entries toward index 0 preserving order, then merge
/// adjacent equal pairs left-to-right without overlap. Each merge emits
/// one tile of level+1 and scores its displayed value 2^(level+1).
pub fn collapse_line(line: &Line) -> (Line, u32) {
    let mut packed = [0u8; SIZE];
    let mut count = 0;
    for &v in line.iter() {
        if v != 0 {
            packed[count] = v;
            count += 1;
        }
    }

    let mut out = [0u8; SIZE];
    let mut score = 0u32;
    let mut i = 0;
    let mut n = 0;
    while i < count {
        if i + 1 < count && packed[i] == packed[i + 1] {
            let merged = packed[i] + 1;
            out[n] = merged;
            score += 1u32 << merged;
            i += 2; // the consumed partner never merges again this move
        } else {
            out[n] = packed[i];
            i += 1;
        }
        n += 1;
    }
    (out, score)
}

/// Slide and merge the whole board in `direction`.
pub fn move_board(board: &Board, direction: Direction) -> MoveResult {
    // Orient so the slide is always a leftward collapse.
    let oriented = match direction {
        Direction::Left => *board,
        Direction::Right => board.inverted(),
        Direction::Up => board.transposed(),
        Direction::Down => board.transposed().inverted(),
    };

    let mut rows = *oriented.rows();
    let mut moved = false;
    let mut score_gained = 0;
    for row in rows.iter_mut() {
        let (new_row, s) = collapse_line(row);
        if new_row != *row {
            moved = true;
        }
        *row = new_row;
        score_gained += s;
    }
    let collapsed = Board::from_rows(rows);

    // Undo the orientation transforms.
    let board = match direction {
        Direction::Left => collapsed,
        Direction::Right => collapsed.inverted(),
        Direction::Up => collapsed.transposed(),
        Direction::Down => collapsed.inverted().transposed(),
    };

    MoveResult { board, moved, score_gained }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tile_count(b: &Board) -> usize {
        b.rows().iter().flatten().filter(|&&v| v != 0).count()
    }

    // ── collapse_line ──

    #[test]
    fn collapse_empty_line() {
        assert_eq!(collapse_line(&[0, 0, 0, 0]), ([0, 0, 0, 0], 0));
    }

    #[test]
    fn collapse_compacts_without_merging() {
        // No equal neighbours: compaction only, zero score
        assert_eq!(collapse_line(&[0, 1, 0, 2]), ([1, 2, 0, 0], 0));
        assert_eq!(collapse_line(&[1, 2, 1, 2]), ([1, 2, 1, 2], 0));
    }

    #[test]
    fn collapse_merges_across_gaps() {
        // 2 + 2 = 4 even with empty cells between
        assert_eq!(collapse_line(&[1, 0, 0, 1]), ([2, 0, 0, 0], 4));
    }

    #[test]
    fn collapse_merges_pairwise() {
        // [2,2,4,4] -> [4,8]: two independent merges
        assert_eq!(collapse_line(&[1, 1, 2, 2]), ([2, 3, 0, 0], 4 + 8));
    }

    #[test]
    fn collapse_merges_once_per_tile() {
        // Three 2s: one merge and a leftover, never a cascade to 8
        assert_eq!(collapse_line(&[1, 1, 1, 0]), ([2, 1, 0, 0], 4));
        // Four 2s: two separate merges, not 2+2->4->8
        assert_eq!(collapse_line(&[1, 1, 1, 1]), ([2, 2, 0, 0], 8));
    }

    #[test]
    fn collapse_conserves_tiles() {
        // Each merge removes exactly one tile and scores the merged value
        let cases: [(Line, usize, u32); 3] = [
            ([1, 1, 2, 3], 3, 4),
            ([2, 2, 2, 2], 2, 16),
            ([3, 0, 3, 3], 2, 16),
        ];
        for (line, want_count, want_score) in cases {
            let (out, score) = collapse_line(&line);
            let count = out.iter().filter(|&&v| v != 0).count();
            assert_eq!(count, want_count, "line {:?}", line);
            assert_eq!(score, want_score, "line {:?}", line);
        }
    }

    #[test]
    fn collapse_of_settled_line_changes_nothing() {
        // A line whose collapse produced no merge is settled: collapsing
        // again is a no-op with zero score.
        let (once, score) = collapse_line(&[1, 0, 2, 0]);
        assert_eq!(once, [1, 2, 0, 0]);
        assert_eq!(score, 0);
        let (twice, score) = collapse_line(&once);
        assert_eq!(twice, once);
        assert_eq!(score, 0);
    }

    #[test]
    fn merged_neighbours_may_merge_on_a_later_move() {
        // [2,2,4] merges into adjacent 4s; only the NEXT move may
        // combine them — never the same pass.
        let (once, score) = collapse_line(&[1, 1, 2, 0]);
        assert_eq!(once, [2, 2, 0, 0]);
        assert_eq!(score, 4);
        let (next_move, score) = collapse_line(&once);
        assert_eq!(next_move, [3, 0, 0, 0]);
        assert_eq!(score, 8);
    }

    // ── move_board ──

    #[test]
    fn move_left_compaction_only() {
        // Mixed board where no merges occur: moved=true, score 0
        let b = Board::from_rows([
            [0, 0, 0, 4],
            [0, 0, 3, 0],
            [0, 2, 0, 0],
            [1, 2, 3, 4],
        ]);
        let r = move_board(&b, Direction::Left);
        assert!(r.moved);
        assert_eq!(r.score_gained, 0);
        assert_eq!(
            r.board,
            Board::from_rows([
                [4, 0, 0, 0],
                [3, 0, 0, 0],
                [2, 0, 0, 0],
                [1, 2, 3, 4],
            ])
        );
    }

    #[test]
    fn move_in_each_direction() {
        let b = Board::from_rows([
            [1, 0, 0, 1],
            [0, 2, 2, 0],
            [0, 0, 0, 0],
            [1, 0, 0, 1],
        ]);

        let left = move_board(&b, Direction::Left);
        assert_eq!(
            left.board,
            Board::from_rows([
                [2, 0, 0, 0],
                [3, 0, 0, 0],
                [0, 0, 0, 0],
                [2, 0, 0, 0],
            ])
        );
        assert_eq!(left.score_gained, 4 + 8 + 4);

        let right = move_board(&b, Direction::Right);
        assert_eq!(
            right.board,
            Board::from_rows([
                [0, 0, 0, 2],
                [0, 0, 0, 3],
                [0, 0, 0, 0],
                [0, 0, 0, 2],
            ])
        );

        let up = move_board(&b, Direction::Up);
        assert_eq!(
            up.board,
            Board::from_rows([
                [2, 2, 2, 2],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ])
        );
        assert_eq!(up.score_gained, 8);

        let down = move_board(&b, Direction::Down);
        assert_eq!(
            down.board,
            Board::from_rows([
                [0, 0, 0, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
                [2, 2, 2, 2],
            ])
        );
    }

    #[test]
    fn move_right_is_mirrored_left() {
        let b = Board::from_rows([
            [1, 1, 2, 0],
            [0, 3, 0, 3],
            [2, 0, 1, 1],
            [4, 3, 2, 1],
        ]);
        let right = move_board(&b, Direction::Right);
        let mirrored = move_board(&b.inverted(), Direction::Left);
        assert_eq!(right.board, mirrored.board.inverted());
        assert_eq!(right.score_gained, mirrored.score_gained);
        assert_eq!(right.moved, mirrored.moved);
    }

    #[test]
    fn move_on_settled_board_reports_unmoved() {
        let b = Board::from_rows([
            [1, 2, 3, 4],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let first = move_board(&b, Direction::Left);
        assert!(!first.moved);
        assert_eq!(first.board, b);
        // Idempotence: a second identical move is also a no-op
        let second = move_board(&first.board, Direction::Left);
        assert!(!second.moved);
        assert_eq!(second.score_gained, 0);
    }

    #[test]
    fn move_never_loses_value() {
        // Sum of displayed values is preserved by every move
        let b = Board::from_rows([
            [1, 1, 2, 2],
            [3, 0, 3, 0],
            [0, 4, 0, 4],
            [5, 5, 5, 5],
        ]);
        let total = |b: &Board| -> u32 {
            b.rows().iter().flatten().map(|&v| tile_value(v)).sum()
        };
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let r = move_board(&b, dir);
            assert_eq!(total(&r.board), total(&b), "direction {:?}", dir);
            assert!(tile_count(&r.board) <= tile_count(&b));
        }
    }

    // ── is_terminal ──

    #[test]
    fn terminal_checkerboard() {
        // Full, no adjacent equals anywhere
        let b = Board::from_rows([
            [1, 2, 1, 2],
            [2, 1, 2, 1],
            [1, 2, 1, 2],
            [2, 1, 2, 1],
        ]);
        assert!(b.is_terminal());
    }

    #[test]
    fn not_terminal_with_adjacent_pair() {
        // Same board with one horizontal pair introduced
        let b = Board::from_rows([
            [1, 1, 1, 2],
            [2, 1, 2, 1],
            [1, 2, 1, 2],
            [2, 1, 2, 1],
        ]);
        assert!(!b.is_terminal());
        // And one vertical pair
        let b = Board::from_rows([
            [1, 2, 1, 2],
            [1, 1, 2, 1],
            [2, 2, 1, 2],
            [1, 1, 2, 1],
        ]);
        assert!(!b.is_terminal());
    }

    #[test]
    fn not_terminal_with_empty_cell() {
        let b = Board::from_rows([
            [1, 2, 1, 2],
            [2, 1, 2, 1],
            [1, 2, 1, 2],
            [2, 1, 2, 0],
        ]);
        assert!(!b.is_terminal());
    }

    // ── add_random_tile ──

    #[test]
    fn spawn_fills_then_fails() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut b = Board::new();
        for _ in 0..SIZE * SIZE {
            b.add_random_tile(&mut rng).unwrap();
        }
        assert!(b.empty_cells().is_empty());
        assert!(b.add_random_tile(&mut rng).is_err());
    }

    #[test]
    fn spawn_levels_are_one_or_two() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut b = Board::new();
        for _ in 0..10 {
            b.add_random_tile(&mut rng).unwrap();
        }
        for &v in b.rows().iter().flatten() {
            assert!(v <= 2);
        }
        assert_eq!(tile_count(&b), 10);
    }

    #[test]
    fn spawn_is_deterministic_under_seed() {
        let mut a = Board::new();
        let mut b = Board::new();
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        for _ in 0..6 {
            a.add_random_tile(&mut rng_a).unwrap();
            b.add_random_tile(&mut rng_b).unwrap();
        }
        assert_eq!(a, b);
    }

    #[test]
    fn tile_values() {
        assert_eq!(tile_value(0), 0);
        assert_eq!(tile_value(1), 2);
        assert_eq!(tile_value(5), 32);
        assert_eq!(tile_value(11), 2048);
    }
}
