use rustc_hash::FxHashSet;

use super::grid::CellGrid;
use super::hex::{opposite, HexCoord, CELLS};
use super::paths::{climb_gate_open, next_slide, slidable};
use super::piece::{HiveBug, BUG_KINDS};

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum HiveMove {
    Pass,
    Place { bug: HiveBug, to: HexCoord },
    Shift { from: HexCoord, to: HexCoord },
}

const PLACE_BASE: u32 = 1;
const SHIFT_BASE: u32 = PLACE_BASE + (BUG_KINDS * CELLS) as u32;

impl HiveMove {
    pub fn is_pass(&self) -> bool {
        matches!(self, HiveMove::Pass)
    }

    pub fn is_place(&self) -> bool {
        matches!(self, HiveMove::Place { .. })
    }

    pub fn dest(&self) -> Option<HexCoord> {
        match self {
            HiveMove::Pass => None,
            HiveMove::Place { to, .. } => Some(*to),
            HiveMove::Shift { to, .. } => Some(*to),
        }
    }

    // compact injective encoding for search front ends
    pub fn encode(&self) -> u32 {
        match self {
            HiveMove::Pass => 0,
            HiveMove::Place { bug, to } => {
                PLACE_BASE + (bug.index() * CELLS + to.index()) as u32
            }
            HiveMove::Shift { from, to } => {
                SHIFT_BASE + (from.index() * CELLS + to.index()) as u32
            }
        }
    }

    pub fn decode(code: u32) -> Option<HiveMove> {
        if code == 0 {
            return Some(HiveMove::Pass);
        }
        if code < SHIFT_BASE {
            let v = (code - PLACE_BASE) as usize;
            return Some(HiveMove::Place {
                bug: HiveBug::from_index(v / CELLS)?,
                to: HexCoord::from_index(v % CELLS),
            });
        }
        let v = (code - SHIFT_BASE) as usize;
        if v >= CELLS * CELLS {
            return None;
        }
        Some(HiveMove::Shift {
            from: HexCoord::from_index(v / CELLS),
            to: HexCoord::from_index(v % CELLS),
        })
    }
}

// --- per-kind destination generators ---
//
// each walks the board for the top piece at `at` and appends shifts; the
// caller has already settled whether that piece may move at all

pub(crate) fn bee_moves(grid: &CellGrid, at: HexCoord, moves: &mut Vec<HiveMove>) {
    for d in 0..6 {
        if slidable(grid, at, d, None) {
            moves.push(HiveMove::Shift {
                from: at,
                to: at.neighbor(d),
            });
        }
    }
}

pub(crate) fn beetle_moves(grid: &CellGrid, at: HexCoord, moves: &mut Vec<HiveMove>) {
    let elevated = grid.height(at) > 1;
    for d in 0..6 {
        let to = at.neighbor(d);
        let ok = if grid.is_empty(to) {
            // dropping off a stack is unrestricted, ground steps must slide
            if elevated {
                true
            } else {
                slidable(grid, at, d, None)
            }
        } else {
            climb_gate_open(grid, at, d)
        };
        if ok {
            moves.push(HiveMove::Shift { from: at, to });
        }
    }
}

pub(crate) fn grasshopper_moves(grid: &CellGrid, at: HexCoord, moves: &mut Vec<HiveMove>) {
    for d in 0..6 {
        let mut cur = at.neighbor(d);
        if grid.is_empty(cur) {
            continue;
        }
        // vault the contiguous run and land on the first gap
        while !grid.is_empty(cur) {
            cur = cur.neighbor(d);
        }
        moves.push(HiveMove::Shift { from: at, to: cur });
    }
}

pub(crate) fn ant_moves(grid: &CellGrid, at: HexCoord, moves: &mut Vec<HiveMove>) {
    let ignore = Some(at);
    let mut visited = FxHashSet::default();
    visited.insert(at);

    let mut frontier = vec![at];
    while let Some(cur) = frontier.pop() {
        for d in 0..6 {
            if !slidable(grid, cur, d, ignore) {
                continue;
            }
            let n = cur.neighbor(d);
            if visited.insert(n) {
                frontier.push(n);
            }
        }
    }

    for c in visited {
        if c != at {
            moves.push(HiveMove::Shift { from: at, to: c });
        }
    }
}

pub(crate) fn spider_moves(grid: &CellGrid, at: HexCoord, moves: &mut Vec<HiveMove>) {
    let ignore = Some(at);

    // the ring is entered at its first slidable edge in either rotation,
    // then walked two more steps without doubling back
    let entry_cw = (0..6).find(|&d| slidable(grid, at, d, ignore));
    let entry_ccw = [0, 5, 4, 3, 2, 1]
        .into_iter()
        .find(|&d| slidable(grid, at, d, ignore));

    let mut entries = [entry_cw, entry_ccw];
    if entries[0] == entries[1] {
        entries[1] = None;
    }

    let mut dests = FxHashSet::default();
    for entry in entries.into_iter().flatten() {
        for clockwise in [true, false] {
            if let Some(dest) = walk_three(grid, at, entry, clockwise) {
                if dest != at {
                    dests.insert(dest);
                }
            }
        }
    }

    for to in dests {
        moves.push(HiveMove::Shift { from: at, to });
    }
}

fn walk_three(grid: &CellGrid, origin: HexCoord, entry: usize, clockwise: bool) -> Option<HexCoord> {
    let mut cur = origin.neighbor(entry);
    let mut came = entry;
    for _ in 0..2 {
        let d = next_slide(grid, cur, opposite(came), clockwise, Some(origin))?;
        came = d;
        cur = cur.neighbor(d);
    }
    Some(cur)
}

pub(crate) fn ladybug_moves(grid: &CellGrid, at: HexCoord, moves: &mut Vec<HiveMove>) {
    let mut dests = FxHashSet::default();
    for n1 in grid.neighbor_cells(at) {
        for n2 in grid.neighbor_cells(n1).filter(|&c| c != at) {
            for n3 in grid.neighbor_space(n2) {
                dests.insert(n3);
            }
        }
    }

    for to in dests {
        moves.push(HiveMove::Shift { from: at, to });
    }
}

pub(crate) fn mosquito_moves(grid: &CellGrid, at: HexCoord, moves: &mut Vec<HiveMove>) {
    // atop a stack the mosquito is stuck in beetle mode
    if grid.height(at) > 1 {
        beetle_moves(grid, at, moves);
        return;
    }

    let mut seen = [false; BUG_KINDS];
    for p in grid.neighbor_pieces(at) {
        seen[p.bug.index()] = true;
    }
    // another mosquito lends nothing
    seen[HiveBug::Mosquito.index()] = false;

    if seen[HiveBug::Ant.index()] {
        ant_moves(grid, at, moves);
    } else if seen[HiveBug::Bee.index()] || seen[HiveBug::Pillbug.index()] {
        // plain steps are a strict subset of the ant walk
        bee_moves(grid, at, moves);
    }
    if seen[HiveBug::Beetle.index()] {
        beetle_moves(grid, at, moves);
    }
    if seen[HiveBug::Grasshopper.index()] {
        grasshopper_moves(grid, at, moves);
    }
    if seen[HiveBug::Spider.index()] {
        spider_moves(grid, at, moves);
    }
    if seen[HiveBug::Ladybug.index()] {
        ladybug_moves(grid, at, moves);
    }
}

// the pillbug (or a mosquito borrowing it) relocates an adjacent ground
// piece onto one of its own empty neighbors; the victim must not hold the
// hive together and must not be the piece the opponent just moved
pub(crate) fn pillbug_throws(
    grid: &CellGrid,
    at: HexCoord,
    pinned: &FxHashSet<HexCoord>,
    last_moved: Option<HexCoord>,
    moves: &mut Vec<HiveMove>,
) {
    let landings: Vec<HexCoord> = grid.neighbor_space(at).collect();
    if landings.is_empty() {
        return;
    }

    for victim in grid.neighbor_cells(at) {
        if grid.height(victim) != 1 {
            continue;
        }
        if pinned.contains(&victim) || last_moved == Some(victim) {
            continue;
        }
        for &to in &landings {
            moves.push(HiveMove::Shift { from: victim, to });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hive::piece::{Color, HivePiece};

    fn put(grid: &mut CellGrid, c: HexCoord, bug: HiveBug) {
        grid.place(
            c,
            HivePiece {
                color: Color::Black,
                bug,
                ord: 0,
            },
        );
    }

    fn dests(moves: &[HiveMove], from: HexCoord) -> FxHashSet<HexCoord> {
        moves
            .iter()
            .filter_map(|m| match m {
                HiveMove::Shift { from: f, to } if *f == from => Some(*to),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn bee_steps_along_the_edge() {
        let mut grid = CellGrid::new();
        let c = HexCoord::START;
        put(&mut grid, c, HiveBug::Bee);
        put(&mut grid, c.neighbor(2), HiveBug::Ant);

        let mut moves = Vec::new();
        bee_moves(&grid, c, &mut moves);
        let expect: FxHashSet<_> = [c.neighbor(1), c.neighbor(3)].into_iter().collect();
        assert_eq!(dests(&moves, c), expect);
    }

    #[test]
    fn grasshopper_vaults_the_row() {
        let mut grid = CellGrid::new();
        let c = HexCoord::START;
        put(&mut grid, c, HiveBug::Grasshopper);
        put(&mut grid, c.neighbor(2), HiveBug::Ant);
        put(&mut grid, c.neighbor(2).neighbor(2), HiveBug::Ant);

        let mut moves = Vec::new();
        grasshopper_moves(&grid, c, &mut moves);
        let landing = c.neighbor(2).neighbor(2).neighbor(2);
        let expect: FxHashSet<_> = [landing].into_iter().collect();
        assert_eq!(dests(&moves, c), expect);
    }

    #[test]
    fn ant_circles_the_hive() {
        let mut grid = CellGrid::new();
        let c = HexCoord::START;
        let p1 = c.neighbor(2);
        let p2 = p1.neighbor(2);
        put(&mut grid, c, HiveBug::Ant);
        put(&mut grid, p1, HiveBug::Ant);
        put(&mut grid, p2, HiveBug::Ant);

        let mut moves = Vec::new();
        ant_moves(&grid, c, &mut moves);
        // every empty cell on the two-piece perimeter
        let mut expect = FxHashSet::default();
        for n in p1.neighbors().chain(p2.neighbors()) {
            if grid.is_empty(n) && n != c {
                expect.insert(n);
            }
        }
        assert_eq!(dests(&moves, c), expect);
    }

    #[test]
    fn spider_takes_exactly_three_steps() {
        let mut grid = CellGrid::new();
        let c = HexCoord::START.neighbor(5);
        let p1 = c.neighbor(2);
        let p2 = p1.neighbor(2);
        put(&mut grid, c, HiveBug::Spider);
        put(&mut grid, p1, HiveBug::Ant);
        put(&mut grid, p2, HiveBug::Ant);

        let mut moves = Vec::new();
        spider_moves(&grid, c, &mut moves);
        // three steps along either side of the row
        let upper = p2.neighbor(1);
        let lower = p2.neighbor(3);
        let expect: FxHashSet<_> = [upper, lower].into_iter().collect();
        assert_eq!(dests(&moves, c), expect);
    }

    #[test]
    fn spider_rounds_a_lone_piece() {
        let mut grid = CellGrid::new();
        let c = HexCoord::START;
        let p = c.neighbor(2);
        put(&mut grid, c, HiveBug::Spider);
        put(&mut grid, p, HiveBug::Ant);

        let mut moves = Vec::new();
        spider_moves(&grid, c, &mut moves);
        // both rotations end on the far side
        let expect: FxHashSet<_> = [p.neighbor(2)].into_iter().collect();
        assert_eq!(dests(&moves, c), expect);
    }

    #[test]
    fn beetle_climbs_but_not_through_towers() {
        let mut grid = CellGrid::new();
        let c = HexCoord::START;
        put(&mut grid, c, HiveBug::Beetle);
        put(&mut grid, c.neighbor(2), HiveBug::Ant);
        for _ in 0..2 {
            put(&mut grid, c.neighbor(1), HiveBug::Beetle);
            put(&mut grid, c.neighbor(3), HiveBug::Beetle);
        }

        let mut moves = Vec::new();
        beetle_moves(&grid, c, &mut moves);
        let got = dests(&moves, c);
        // the east cell is walled off by the two towers
        assert!(!got.contains(&c.neighbor(2)));
        // but the towers themselves can be mounted
        assert!(got.contains(&c.neighbor(1)));
        assert!(got.contains(&c.neighbor(3)));
    }

    #[test]
    fn elevated_beetle_steps_anywhere() {
        let mut grid = CellGrid::new();
        let c = HexCoord::START;
        put(&mut grid, c, HiveBug::Ant);
        put(&mut grid, c, HiveBug::Beetle);
        put(&mut grid, c.neighbor(2), HiveBug::Ant);

        let mut moves = Vec::new();
        beetle_moves(&grid, c, &mut moves);
        assert_eq!(dests(&moves, c).len(), 6);
    }

    #[test]
    fn ladybug_two_up_one_down() {
        let mut grid = CellGrid::new();
        let c = HexCoord::START.neighbor(5);
        let p1 = c.neighbor(2);
        let p2 = p1.neighbor(2);
        put(&mut grid, c, HiveBug::Ladybug);
        put(&mut grid, p1, HiveBug::Ant);
        put(&mut grid, p2, HiveBug::Ant);

        let mut moves = Vec::new();
        ladybug_moves(&grid, c, &mut moves);
        let expect: FxHashSet<_> = p2.neighbors().filter(|&n| grid.is_empty(n)).collect();
        assert_eq!(dests(&moves, c), expect);
    }

    #[test]
    fn mosquito_next_to_mosquito_is_stuck() {
        let mut grid = CellGrid::new();
        let c = HexCoord::START;
        put(&mut grid, c, HiveBug::Mosquito);
        put(&mut grid, c.neighbor(2), HiveBug::Mosquito);

        let mut moves = Vec::new();
        mosquito_moves(&grid, c, &mut moves);
        assert!(moves.is_empty());
    }

    #[test]
    fn mosquito_borrows_the_hopper() {
        let mut grid = CellGrid::new();
        let c = HexCoord::START;
        put(&mut grid, c, HiveBug::Mosquito);
        put(&mut grid, c.neighbor(2), HiveBug::Grasshopper);

        let mut moves = Vec::new();
        mosquito_moves(&grid, c, &mut moves);
        let expect: FxHashSet<_> = [c.neighbor(2).neighbor(2)].into_iter().collect();
        assert_eq!(dests(&moves, c), expect);
    }

    #[test]
    fn throws_move_the_neighbor_not_the_pillbug() {
        let mut grid = CellGrid::new();
        let c = HexCoord::START;
        let victim = c.neighbor(2);
        put(&mut grid, c, HiveBug::Pillbug);
        put(&mut grid, victim, HiveBug::Ant);

        let mut moves = Vec::new();
        pillbug_throws(&grid, c, &FxHashSet::default(), None, &mut moves);
        assert_eq!(moves.len(), 5);
        assert!(moves.iter().all(|m| matches!(m, HiveMove::Shift { from, .. } if *from == victim)));

        // a freshly moved piece may not be flung straight back
        moves.clear();
        pillbug_throws(&grid, c, &FxHashSet::default(), Some(victim), &mut moves);
        assert!(moves.is_empty());
    }

    #[test]
    fn codec_round_trip() {
        let samples = [
            HiveMove::Pass,
            HiveMove::Place {
                bug: HiveBug::Pillbug,
                to: HexCoord::START,
            },
            HiveMove::Shift {
                from: HexCoord::START,
                to: HexCoord::START.neighbor(4),
            },
        ];
        let mut codes = FxHashSet::default();
        for m in samples {
            let code = m.encode();
            assert_eq!(HiveMove::decode(code), Some(m));
            assert!(codes.insert(code));
        }
    }
}
