#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use broadside::{
    init_logging, init_logging_with, play_duel, random_fleet, AbilityKind, AbilityPayload, Axis,
    Board, Coord, GameEvent, GameId, HeatSeeker, Lobby, LobbyConfig, RecordingSink, ShotRecord,
    ShotResult, BOARD_SIZE,
};
#[cfg(feature = "std")]
use clap::{Parser, Subcommand};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    /// Log at debug level regardless of BROADSIDE_LOG.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Generate and print a random valid fleet.
    Fleet {
        #[arg(long, help = "Fix RNG seed for reproducible output (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Let two bots play each other.
    Duel {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 1)]
        rounds: u32,
        /// Print one JSON summary per game.
        #[arg(long)]
        json: bool,
    },
    /// Play against the bot on this terminal.
    Play {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

#[cfg(feature = "std")]
fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        init_logging_with(log::LevelFilter::Debug);
    } else {
        init_logging();
    }

    match cli.command {
        Commands::Fleet { seed } => {
            let mut rng = make_rng(seed);
            let (board, ships) = random_fleet::<BOARD_SIZE, _>(&mut rng)?;
            println!("{}", board.render(true));
            for ship in ships {
                println!(
                    "size {} at ({}, {}) {:?}",
                    ship.size, ship.x, ship.y, ship.orientation
                );
            }
        }
        Commands::Duel { seed, rounds, json } => {
            for round in 0..rounds {
                let mut rng = make_rng(seed.map(|s| s.wrapping_add(u64::from(round))));
                let summary = play_duel::<BOARD_SIZE, _, _>(
                    GameId(u64::from(round) + 1),
                    &mut HeatSeeker,
                    &mut HeatSeeker,
                    &mut rng,
                )?;
                if json {
                    println!("{}", serde_json::to_string(&summary)?);
                } else {
                    let winner = summary.winner.as_deref().unwrap_or("nobody");
                    println!("game {}: {} wins after {} turns", summary.game, winner, summary.turns);
                    for seat in &summary.seats {
                        println!(
                            "  {:<6} shots {:>3}  hits {:>2}  sunk {:>2}  abilities {}",
                            seat.name,
                            seat.shots,
                            seat.hits,
                            seat.sunk,
                            seat.ability_usage.total()
                        );
                    }
                }
            }
        }
        Commands::Play { seed } => run_play(seed).await?,
    }
    Ok(())
}

#[cfg(feature = "std")]
enum Command {
    Fire(Coord),
    Ability(AbilityKind, AbilityPayload),
    Board,
    Quit,
}

#[cfg(feature = "std")]
fn parse_command(line: &str) -> Option<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let num = |i: usize| words.get(i).and_then(|w| w.parse::<usize>().ok());
    match words.first().map(|w| w.to_ascii_lowercase()).as_deref() {
        Some("quit") | Some("q") => Some(Command::Quit),
        Some("board") => Some(Command::Board),
        Some("splatter") => Some(Command::Ability(AbilityKind::Splatter, AbilityPayload::default())),
        Some("plane") => {
            let axis = match words.get(1).copied() {
                Some("col") => Axis::Col,
                Some("row") => Axis::Row,
                _ => return None,
            };
            let index = words.get(2)?.parse::<i64>().ok()?;
            Some(Command::Ability(AbilityKind::Plane, AbilityPayload::plane(axis, index)))
        }
        Some("comb") => Some(Command::Ability(
            AbilityKind::Comb,
            AbilityPayload::comb(Coord::new(num(1)?, num(2)?)),
        )),
        Some(_) => Some(Command::Fire(Coord::new(num(0)?, num(1)?))),
        None => None,
    }
}

/// Fog-of-war grid built from a shot log.
#[cfg(feature = "std")]
fn render_shots(shots: &[ShotRecord]) -> String {
    let mut grid = [['.'; BOARD_SIZE]; BOARD_SIZE];
    for s in shots {
        if s.x < BOARD_SIZE && s.y < BOARD_SIZE {
            grid[s.y][s.x] = match s.result {
                ShotResult::Hit | ShotResult::Sunk => 'X',
                ShotResult::Miss => 'o',
                ShotResult::Already => grid[s.y][s.x],
            };
        }
    }
    let mut out = String::from("   ");
    for x in 0..BOARD_SIZE {
        out.push_str(&format!("{:>2}", x));
    }
    out.push('\n');
    for (y, row) in grid.iter().enumerate() {
        out.push_str(&format!("{:>2} ", y));
        for c in row {
            out.push(' ');
            out.push(*c);
        }
        out.push('\n');
    }
    out
}

#[cfg(feature = "std")]
fn print_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::ShotFired { player, x, y, result, .. } => {
                println!("{} fires at ({}, {}): {}", player.name, x, y, result)
            }
            GameEvent::ShipSunk { player, size, .. } => {
                println!("{} sank a ship of size {}", player.name, size)
            }
            GameEvent::TurnChanged { next, .. } => println!("turn: {}", next.name),
            GameEvent::GameStarted { current, .. } => println!("game started, {} moves first", current.name),
            GameEvent::GameFinished { winner, .. } => println!("game over, {} wins", winner.name),
            GameEvent::GameAborted { .. } => println!("the game was abandoned"),
            _ => {}
        }
    }
}

#[cfg(feature = "std")]
async fn run_play(seed: Option<u64>) -> anyhow::Result<()> {
    let lobby = Lobby::new(
        LobbyConfig {
            seed,
            ..LobbyConfig::default()
        },
        RecordingSink::new(),
    );
    let (game, me) = lobby.create_bot_match("You").await?;
    lobby.random_fleet(game, me.id).await?;
    print_events(&lobby.sink().drain().await);
    println!("commands: `x y`, `plane row|col i`, `comb x y`, `splatter`, `board`, `quit`");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let view = lobby.state(game, me.id).await?;
        if view.winner.is_some() {
            break;
        }
        if !view.player.is_turn {
            // bot stopped at its action cap
            if lobby.sync(game).await?.is_none() {
                println!("the bot has no move left");
                break;
            }
            print_events(&lobby.sink().drain().await);
            continue;
        }
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let outcome = match parse_command(&line) {
            None => {
                println!("unrecognised command");
                continue;
            }
            Some(Command::Quit) => {
                lobby.leave(game, me.id).await?;
                break;
            }
            Some(Command::Board) => {
                let own: Board = view.player.board;
                println!("your fleet:\n{}", own.render(true));
                println!("your shots:\n{}", render_shots(&view.shots.player));
                println!(
                    "abilities left: plane {} splatter {} comb {}",
                    view.player.ability_usage.remaining(AbilityKind::Plane),
                    view.player.ability_usage.remaining(AbilityKind::Splatter),
                    view.player.ability_usage.remaining(AbilityKind::Comb),
                );
                continue;
            }
            Some(Command::Fire(at)) => lobby.shoot(game, me.id, at).await,
            Some(Command::Ability(kind, payload)) => lobby.use_ability(game, me.id, kind, &payload).await,
        };
        if let Err(e) = outcome {
            println!("rejected: {}", e);
            continue;
        }
        print_events(&lobby.sink().drain().await);
    }
    Ok(())
}
