use clap::Parser;

use hexhive::hive::{move_to_string, HiveGame, Outcome};

/// Seeded random self-play against the hexhive rules engine.
#[derive(Parser)]
struct Args {
    /// number of games to play
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// hard cap on plies per game
    #[arg(long, default_value_t = 300)]
    max_plies: u32,

    /// seed for the move picker
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// print every move and the resulting board
    #[arg(long)]
    show: bool,
}

fn splitmix(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e3779b97f4a7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

fn main() {
    let args = Args::parse();
    let mut rng = args.seed;

    for g in 0..args.games {
        let mut game = HiveGame::new();
        let mut plies = 0;

        while !game.is_terminal() && plies < args.max_plies {
            let moves = game.legal_moves();
            let mv = moves[(splitmix(&mut rng) % moves.len() as u64) as usize];
            if args.show {
                println!("{:>3}: {}", game.ply(), move_to_string(&game, mv));
            }
            game.apply(mv);
            if args.show {
                println!("{}", game.render());
            }
            plies += 1;
        }

        let verdict = match game.outcome() {
            Outcome::WhiteWins => "white wins",
            Outcome::BlackWins => "black wins",
            Outcome::Draw => "draw",
            Outcome::Ongoing => "unfinished",
        };
        println!("game {}: {} after {} plies", g + 1, verdict, plies);
    }
}
