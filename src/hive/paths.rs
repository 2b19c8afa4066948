use rustc_hash::FxHashSet;

use super::grid::CellGrid;
use super::hex::{HexCoord, CELLS};

// a slide from `from` towards `dir` must land on an empty cell and squeeze
// past exactly one occupied flank: two occupied flanks is a blocked gate,
// zero means losing contact with the hive. `ignore` treats the moving
// piece's own cell as vacant while walking multi-step paths.
pub fn slidable(grid: &CellGrid, from: HexCoord, dir: usize, ignore: Option<HexCoord>) -> bool {
    let empty = |c: HexCoord| grid.is_empty(c) || Some(c) == ignore;

    let to = from.neighbor(dir);
    if !empty(to) {
        return false;
    }

    let (l, r) = from.flanks(dir);
    empty(l) != empty(r)
}

// first legal slide out of `at`, scanning the ring from the direction we
// came in, in the given rotational sense
pub fn next_slide(
    grid: &CellGrid,
    at: HexCoord,
    back: usize,
    clockwise: bool,
    ignore: Option<HexCoord>,
) -> Option<usize> {
    (1..6)
        .map(|k| {
            if clockwise {
                (back + k) % 6
            } else {
                (back + 6 - k) % 6
            }
        })
        .find(|&d| slidable(grid, at, d, ignore))
}

// climbers step between stack heights instead of sliding; the step is shut
// only when both flanking stacks rise above the higher of the two ends
pub fn climb_gate_open(grid: &CellGrid, from: HexCoord, dir: usize) -> bool {
    let to = from.neighbor(dir);
    let barrier = grid.height(from).saturating_sub(1).max(grid.height(to));
    let (l, r) = from.flanks(dir);
    !(grid.height(l) > barrier && grid.height(r) > barrier)
}

// articulation points of the occupied-cell graph: one depth-first pass
// recording discovery order and the lowest order reachable through a single
// back edge; a non-root cell whose subtree cannot reach above it is pinned,
// the root is pinned iff it has several subtrees
pub fn pinned_cells(grid: &CellGrid) -> FxHashSet<HexCoord> {
    struct Walk<'a> {
        grid: &'a CellGrid,
        num: [u16; CELLS],
        low: [u16; CELLS],
        next: u16,
        pinned: FxHashSet<HexCoord>,
    }

    fn dfs(w: &mut Walk, c: HexCoord, parent: Option<HexCoord>) {
        let ci = c.index();
        w.num[ci] = w.next;
        w.low[ci] = w.next;
        w.next += 1;

        let mut children = 0;
        for n in c.neighbors() {
            if w.grid.is_empty(n) || Some(n) == parent {
                continue;
            }

            let ni = n.index();
            if w.num[ni] != 0 {
                w.low[ci] = w.low[ci].min(w.num[ni]);
            } else {
                dfs(w, n, Some(c));
                w.low[ci] = w.low[ci].min(w.low[ni]);
                if w.low[ni] >= w.num[ci] && parent.is_some() {
                    w.pinned.insert(c);
                }
                children += 1;
            }
        }

        if parent.is_none() && children > 1 {
            w.pinned.insert(c);
        }
    }

    let mut walk = Walk {
        grid,
        num: [0; CELLS],
        low: [0; CELLS],
        next: 1,
        pinned: FxHashSet::default(),
    };

    if let Some(&root) = grid.occupied().iter().next() {
        dfs(&mut walk, root, None);
    }

    walk.pinned
}
