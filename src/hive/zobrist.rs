use std::hash::{DefaultHasher, Hasher};

use super::hex::{HexCoord, CELLS, STACK_LIMIT};
use super::piece::{Color, HiveBug, BUG_KINDS};

const SEED: u64 = 2346;

// one random constant per (color, bug kind, cell, stack level); the running
// board hash is the xor of the constants of every piece on the board
#[derive(Clone, Debug)]
pub struct ZobristTable {
    keys: Vec<u64>,
}

impl ZobristTable {
    pub fn new() -> Self {
        let len = 2 * BUG_KINDS * CELLS * STACK_LIMIT;
        let mut keys = Vec::with_capacity(len);
        let mut hasher = DefaultHasher::new();
        hasher.write_u64(SEED);
        for i in 0..len {
            hasher.write_usize(i);
            keys.push(hasher.finish());
        }
        ZobristTable { keys }
    }

    pub fn key(&self, color: Color, bug: HiveBug, at: HexCoord, level: usize) -> u64 {
        let i = ((color.idx() * BUG_KINDS + bug.index()) * CELLS + at.index()) * STACK_LIMIT + level;
        self.keys[i]
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}

// every table is derived from the same fixed seed
impl PartialEq for ZobristTable {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Eq for ZobristTable {}
