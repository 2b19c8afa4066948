use rustc_hash::{FxHashMap, FxHashSet};

mod grid;
mod hex;
mod moves;
mod notation;
mod paths;
mod piece;
mod zobrist;

pub use grid::CellGrid;
pub use hex::{HexCoord, BOARD_SIZE, CELLS};
pub use moves::HiveMove;
pub use notation::{move_from_string, move_to_string};
pub use piece::{Color, HiveBug, HivePiece};

use moves::{
    ant_moves, bee_moves, beetle_moves, grasshopper_moves, ladybug_moves, mosquito_moves,
    pillbug_throws, spider_moves,
};
use paths::pinned_cells;
use piece::PieceSupply;
use zobrist::ZobristTable;

// the third sighting of a position ends the game
const REPEAT_LIMIT: u8 = 3;
// the bee must hit the board by each side's fourth turn
const BEE_DEADLINE_ROUND: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    WhiteWins,
    BlackWins,
    Draw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Journal {
    mv: HiveMove,
    last_moved: Option<HexCoord>,
}

// the whole game state: cell stacks, unplaced pieces, and the caches kept
// current after every apply/undo (availability lives inside the grid)
#[derive(Clone, PartialEq)]
pub struct HiveGame {
    grid: CellGrid,
    supplies: [PieceSupply; 2],
    bees: [Option<HexCoord>; 2],

    pinned: FxHashSet<HexCoord>,
    last_moved: Option<HexCoord>,
    ply: usize,

    zobrist: ZobristTable,
    hash: u64,
    repetitions: FxHashMap<u64, u8>,

    journal: Vec<Journal>,
    outcome: Outcome,
}

impl HiveGame {
    pub fn new() -> Self {
        HiveGame {
            grid: CellGrid::new(),
            supplies: [PieceSupply::new(Color::White), PieceSupply::new(Color::Black)],
            bees: [None, None],
            pinned: FxHashSet::default(),
            last_moved: None,
            ply: 0,
            zobrist: ZobristTable::new(),
            hash: 0,
            repetitions: FxHashMap::default(),
            journal: Vec::new(),
            outcome: Outcome::Ongoing,
        }
    }

    pub fn to_move(&self) -> Color {
        if self.ply % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn ply(&self) -> usize {
        self.ply
    }

    pub fn round(&self) -> usize {
        self.ply / 2
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome != Outcome::Ongoing
    }

    pub fn bee(&self, color: Color) -> Option<HexCoord> {
        self.bees[color.idx()]
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn render(&self) -> String {
        format!(
            "round {}, {:?} to move\n{}",
            self.round(),
            self.to_move(),
            self.grid.render()
        )
    }

    pub(crate) fn supply(&self, color: Color) -> &PieceSupply {
        &self.supplies[color.idx()]
    }

    // a piece may leave its cell if nothing rests on it, it is not the one
    // piece the opponent just moved, and lifting it keeps the hive whole;
    // stacked cells stay connected through the piece underneath
    fn movable(&self, c: HexCoord) -> bool {
        if self.last_moved == Some(c) {
            return false;
        }
        self.grid.height(c) > 1 || !self.pinned.contains(&c)
    }

    pub fn legal_moves(&self) -> Vec<HiveMove> {
        let mut moves = Vec::new();
        if self.outcome == Outcome::Ongoing {
            self.placement_moves(&mut moves);
            self.movement_moves(&mut moves);
        }
        if moves.is_empty() {
            moves.push(HiveMove::Pass);
        }
        moves
    }

    fn placement_moves(&self, moves: &mut Vec<HiveMove>) {
        let mover = self.to_move();
        let supply = self.supply(mover);

        // opening seeds: the center cell, then its ring for the reply
        if self.ply == 0 {
            for bug in HiveBug::ALL {
                if supply.has(bug) {
                    moves.push(HiveMove::Place {
                        bug,
                        to: HexCoord::START,
                    });
                }
            }
            return;
        }
        if self.ply == 1 {
            for bug in HiveBug::ALL {
                if !supply.has(bug) {
                    continue;
                }
                for to in self.grid.neighbor_space(HexCoord::START) {
                    moves.push(HiveMove::Place { bug, to });
                }
            }
            return;
        }

        let bee_only = self.round() >= BEE_DEADLINE_ROUND && supply.has(HiveBug::Bee);
        for &to in self.grid.available(mover) {
            for bug in HiveBug::ALL {
                if !supply.has(bug) {
                    continue;
                }
                if bee_only && bug != HiveBug::Bee {
                    continue;
                }
                moves.push(HiveMove::Place { bug, to });
            }
        }
    }

    fn movement_moves(&self, moves: &mut Vec<HiveMove>) {
        let mover = self.to_move();
        if !self.supply(mover).bee_placed() {
            return;
        }

        let own: Vec<HexCoord> = self
            .grid
            .occupied()
            .iter()
            .copied()
            .filter(|&c| self.grid.top(c).map(|p| p.color) == Some(mover))
            .collect();

        let mut needs_dedup = false;
        for c in own {
            let p = self.grid.top(c).unwrap();
            let stacked = self.grid.height(c) > 1;

            // throwing works even for a pinned pillbug, but not for one that
            // was itself just moved, and not from the top of a stack
            let throws_here = !stacked
                && (p.bug == HiveBug::Pillbug
                    || (p.bug == HiveBug::Mosquito
                        && self.grid.neighbor_pieces(c).any(|n| n.bug == HiveBug::Pillbug)));
            if throws_here && self.last_moved != Some(c) {
                pillbug_throws(&self.grid, c, &self.pinned, self.last_moved, moves);
                needs_dedup = true;
            }

            if !self.movable(c) {
                continue;
            }

            match p.bug {
                HiveBug::Bee | HiveBug::Pillbug => bee_moves(&self.grid, c, moves),
                HiveBug::Beetle => beetle_moves(&self.grid, c, moves),
                HiveBug::Ant => ant_moves(&self.grid, c, moves),
                HiveBug::Grasshopper => grasshopper_moves(&self.grid, c, moves),
                HiveBug::Spider => spider_moves(&self.grid, c, moves),
                HiveBug::Ladybug => ladybug_moves(&self.grid, c, moves),
                HiveBug::Mosquito => {
                    mosquito_moves(&self.grid, c, moves);
                    needs_dedup = true;
                }
            }
        }

        if needs_dedup {
            moves.sort_unstable();
            moves.dedup();
        }
    }

    pub fn apply(&mut self, mv: HiveMove) {
        debug_assert!(self.legal_moves().contains(&mv), "illegal move {:?}", mv);

        let mover = self.to_move();
        match mv {
            HiveMove::Pass => {}
            HiveMove::Place { bug, to } => {
                let piece = self.supplies[mover.idx()].take(bug);
                self.grid.place(to, piece);
                self.supplies[mover.idx()].set_coord(bug, piece.ord, Some(to));
                if bug == HiveBug::Bee {
                    self.bees[mover.idx()] = Some(to);
                }
                let level = self.grid.height(to) - 1;
                self.hash ^= self.zobrist.key(piece.color, bug, to, level);
            }
            HiveMove::Shift { from, to } => {
                let level = self.grid.height(from) - 1;
                let piece = self.grid.remove_top(from);
                self.hash ^= self.zobrist.key(piece.color, piece.bug, from, level);

                self.grid.place(to, piece);
                let level = self.grid.height(to) - 1;
                self.hash ^= self.zobrist.key(piece.color, piece.bug, to, level);

                self.supplies[piece.color.idx()].set_coord(piece.bug, piece.ord, Some(to));
                if piece.bug == HiveBug::Bee {
                    self.bees[piece.color.idx()] = Some(to);
                }
            }
        }

        self.journal.push(Journal {
            mv,
            last_moved: self.last_moved,
        });
        self.last_moved = mv.dest();
        self.ply += 1;
        self.pinned = pinned_cells(&self.grid);
        *self.repetitions.entry(self.hash).or_insert(0) += 1;
        self.refresh_outcome();
    }

    // strict inverse of the most recent apply; anything else is a caller bug
    pub fn undo(&mut self, mv: HiveMove) {
        let entry = self.journal.pop().expect("undo without a matching apply");
        assert_eq!(entry.mv, mv, "undo out of order");

        let seen = self.repetitions.get_mut(&self.hash).expect("hash history desynced");
        *seen -= 1;
        if *seen == 0 {
            self.repetitions.remove(&self.hash);
        }

        self.ply -= 1;
        match mv {
            HiveMove::Pass => {}
            HiveMove::Place { bug, to } => {
                let level = self.grid.height(to) - 1;
                let piece = self.grid.remove_top(to);
                assert_eq!(piece.bug, bug, "undo does not match the board");
                self.hash ^= self.zobrist.key(piece.color, bug, to, level);
                self.supplies[piece.color.idx()].put_back(piece);
                if bug == HiveBug::Bee {
                    self.bees[piece.color.idx()] = None;
                }
            }
            HiveMove::Shift { from, to } => {
                let level = self.grid.height(to) - 1;
                let piece = self.grid.remove_top(to);
                self.hash ^= self.zobrist.key(piece.color, piece.bug, to, level);

                self.grid.place(from, piece);
                let level = self.grid.height(from) - 1;
                self.hash ^= self.zobrist.key(piece.color, piece.bug, from, level);

                self.supplies[piece.color.idx()].set_coord(piece.bug, piece.ord, Some(from));
                if piece.bug == HiveBug::Bee {
                    self.bees[piece.color.idx()] = Some(from);
                }
            }
        }

        self.last_moved = entry.last_moved;
        self.pinned = pinned_cells(&self.grid);
        self.refresh_outcome();
    }

    fn surrounded(&self, c: HexCoord) -> bool {
        c.neighbors().all(|n| !self.grid.is_empty(n))
    }

    fn refresh_outcome(&mut self) {
        let white_trapped = self.bees[0].is_some_and(|c| self.surrounded(c));
        let black_trapped = self.bees[1].is_some_and(|c| self.surrounded(c));

        self.outcome = match (white_trapped, black_trapped) {
            (true, true) => Outcome::Draw,
            (true, false) => Outcome::BlackWins,
            (false, true) => Outcome::WhiteWins,
            (false, false) => {
                if self.repetitions.get(&self.hash).copied().unwrap_or(0) >= REPEAT_LIMIT {
                    Outcome::Draw
                } else {
                    Outcome::Ongoing
                }
            }
        };
    }

    #[cfg(test)]
    fn full_hash(&self) -> u64 {
        let mut h = 0;
        for &c in self.grid.occupied() {
            for (level, p) in self.grid.stack(c).iter().enumerate() {
                h ^= self.zobrist.key(p.color, p.bug, c, level);
            }
        }
        h
    }
}

impl Default for HiveGame {
    fn default() -> Self {
        Self::new()
    }
}
