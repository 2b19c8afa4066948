use super::hex::{opposite, HexCoord};
use super::moves::HiveMove;
use super::piece::{Color, HiveBug, HivePiece};
use super::HiveGame;

// direction marks around a reference piece; directions 1..3 trail the
// token, the rest lead it:
//    \x  x/
//   -x      x-
//    /x  x\
const DIR_MARKS: [char; 6] = ['\\', '/', '-', '\\', '/', '-'];

fn dir_token(reference: &HivePiece, dir: usize) -> String {
    let mark = DIR_MARKS[dir];
    if dir == 0 || dir > 3 {
        format!("{}{}", mark, reference)
    } else {
        format!("{}{}", reference, mark)
    }
}

/// Renders a legal move the way game records write them: `wG1`,
/// `bA2 /wG1`, `wB1 bQ` for climbing onto a stack, or `pass`.
pub fn move_to_string(game: &HiveGame, mv: HiveMove) -> String {
    let (piece, from, to) = match mv {
        HiveMove::Pass => return "pass".to_string(),
        HiveMove::Place { bug, to } => {
            let mover = game.to_move();
            let piece = HivePiece {
                color: mover,
                bug,
                ord: game.supply(mover).next_ord(bug),
            };
            (piece, None, to)
        }
        HiveMove::Shift { from, to } => {
            let piece = game.grid().top(from).expect("shift from an empty cell");
            (piece, Some(from), to)
        }
    };

    let token = piece.to_string();
    if game.grid().occupied().is_empty() {
        return token;
    }

    // landing on a stack names the piece underneath
    if let Some(carrier) = game.grid().top(to) {
        return format!("{} {}", token, carrier);
    }

    // otherwise name an occupied neighbor and the edge pointing back
    for d in 0..6 {
        let r = to.neighbor(d);
        let reference = if Some(r) == from {
            // a mover that stays adjacent to its own cell only counts as a
            // landmark when it leaves a stack behind
            let h = game.grid().height(r);
            if h > 1 {
                game.grid().stack(r).get(h - 2).copied()
            } else {
                None
            }
        } else {
            game.grid().top(r)
        };
        if let Some(rp) = reference {
            return format!("{} {}", token, dir_token(&rp, opposite(d)));
        }
    }

    token
}

fn parse_piece(tok: &str) -> Option<HivePiece> {
    let mut chars = tok.chars();
    let color = Color::from_letter(chars.next()?)?;
    let bug = HiveBug::from_letter(chars.next()?)?;
    let ord = match chars.next() {
        None => 0,
        Some(c) => {
            let n = c.to_digit(10)?;
            if n == 0 || n > bug.quota() as u32 {
                return None;
            }
            (n - 1) as u8
        }
    };
    if chars.next().is_some() {
        return None;
    }
    if bug.quota() > 1 && tok.len() == 2 {
        return None;
    }
    Some(HivePiece { color, bug, ord })
}

fn parse_reference(tok: &str) -> Option<(Option<usize>, HivePiece)> {
    let lead = tok.chars().next()?;
    let trail = tok.chars().last()?;
    if let Some(d) = match lead {
        '\\' => Some(0),
        '/' => Some(4),
        '-' => Some(5),
        _ => None,
    } {
        return Some((Some(d), parse_piece(&tok[1..])?));
    }
    if let Some(d) = match trail {
        '/' => Some(1),
        '-' => Some(2),
        '\\' => Some(3),
        _ => None,
    } {
        return Some((Some(d), parse_piece(&tok[..tok.len() - 1])?));
    }
    // bare piece: climb onto it
    Some((None, parse_piece(tok)?))
}

/// Inverse of [`move_to_string`] against the same position.
pub fn move_from_string(game: &HiveGame, s: &str) -> Option<HiveMove> {
    let s = s.trim();
    if s == "pass" {
        return Some(HiveMove::Pass);
    }

    let mut parts = s.split_whitespace();
    let piece = parse_piece(parts.next()?)?;
    let from = game.supply(piece.color).coord(piece.bug, piece.ord);

    let to = match parts.next() {
        None => {
            // a bare token only makes sense on an empty board
            if !game.grid().occupied().is_empty() {
                return None;
            }
            HexCoord::START
        }
        Some(tok) => {
            let (dir, reference) = parse_reference(tok)?;
            let anchor = game
                .supply(reference.color)
                .coord(reference.bug, reference.ord)?;
            match dir {
                Some(d) => anchor.neighbor(d),
                None => anchor,
            }
        }
    };
    if parts.next().is_some() {
        return None;
    }

    match from {
        Some(from) => Some(HiveMove::Shift { from, to }),
        None => {
            // an unplaced piece must be the next of its kind out of the box
            if piece.ord != game.supply(piece.color).next_ord(piece.bug) {
                return None;
            }
            Some(HiveMove::Place {
                bug: piece.bug,
                to,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn first_move_is_a_bare_token() {
        let game = HiveGame::new();
        let mv = HiveMove::Place {
            bug: HiveBug::Grasshopper,
            to: HexCoord::START,
        };
        assert_eq!(move_to_string(&game, mv), "wG1");
        assert_eq!(move_from_string(&game, "wG1"), Some(mv));
    }

    #[test]
    fn reply_names_the_landmark() {
        let mut game = HiveGame::new();
        game.apply(HiveMove::Place {
            bug: HiveBug::Grasshopper,
            to: HexCoord::START,
        });

        let mv = HiveMove::Place {
            bug: HiveBug::Beetle,
            to: HexCoord::START.neighbor(2),
        };
        // the new beetle sits east of the grasshopper
        assert_eq!(move_to_string(&game, mv), "bB1 wG1-");
        assert_eq!(move_from_string(&game, "bB1 wG1-"), Some(mv));
    }

    #[test]
    fn climbing_names_the_carrier() {
        let mut game = HiveGame::new();
        let wq = HexCoord::START;
        let bq = wq.neighbor(2);
        let beetle = bq.neighbor(2);
        game.apply(HiveMove::Place { bug: HiveBug::Bee, to: wq });
        game.apply(HiveMove::Place { bug: HiveBug::Bee, to: bq });
        game.apply(HiveMove::Place { bug: HiveBug::Ant, to: wq.neighbor(5) });
        game.apply(HiveMove::Place { bug: HiveBug::Beetle, to: beetle });
        game.apply(HiveMove::Place { bug: HiveBug::Ant, to: wq.neighbor(5).neighbor(5) });

        // black's beetle mounts the black bee
        let mv = HiveMove::Shift { from: beetle, to: bq };
        assert_eq!(move_to_string(&game, mv), "bB1 bQ");
        assert_eq!(move_from_string(&game, "bB1 bQ"), Some(mv));
    }

    #[test]
    fn all_prefix_and_suffix_marks_round_trip() {
        let mut game = HiveGame::new();
        game.apply(HiveMove::Place {
            bug: HiveBug::Grasshopper,
            to: HexCoord::START,
        });

        for d in 0..6 {
            let mv = HiveMove::Place {
                bug: HiveBug::Ant,
                to: HexCoord::START.neighbor(d),
            };
            let s = move_to_string(&game, mv);
            assert_eq!(move_from_string(&game, &s), Some(mv), "token {:?}", s);
        }
    }

    #[test]
    fn notation_round_trips_along_a_game() {
        let mut rng = StdRng::seed_from_u64(53);
        let mut game = HiveGame::new();
        for _ in 0..80 {
            if game.is_terminal() {
                break;
            }
            let moves = game.legal_moves();
            for &mv in &moves {
                let s = move_to_string(&game, mv);
                assert_eq!(move_from_string(&game, &s), Some(mv), "token {:?}", s);
            }
            let mv = moves[rng.random_range(0..moves.len())];
            game.apply(mv);
        }
    }
}
