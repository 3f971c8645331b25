// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

use std::fmt::Display;
use std::fs::File;
use std::io;
use std::process;
use std::time::Instant;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use csv::ReaderBuilder;

use pecker::notation;
use pecker::{
    perft, GameState, Language, LichessRecord, MoveGenerator, Position, PromotionPolicy,
    PuzzleLine, PuzzleSession,
};

#[derive(Serialize)]
struct ReplayReport {
    id: String,
    rating: Option<u32>,
    themes: Vec<String>,
    solution: String,
    solved: bool,
    final_state: GameState,
}

fn main() {
    env_logger::init();
    let fen_arg = || {
        Arg::with_name("FEN")
            .help("FEN string for a board position")
            .required(true)
            .index(1)
    };

    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("language")
                .help("Piece letters for rendered moves")
                .short("l")
                .long("language")
                .value_name("LANG")
                .possible_values(&["en", "de"])
                .default_value("en")
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("perft")
                .about("PERFT analysis of board positions")
                .arg(fen_arg())
                .arg(
                    Arg::with_name("depth")
                        .help("Depth of move tree to search")
                        .value_name("DEPTH")
                        .short("d")
                        .long("depth")
                        .default_value("3")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("moves")
                .about("Lists the legal moves in a board position")
                .arg(fen_arg()),
        )
        .subcommand(
            SubCommand::with_name("notation")
                .about("Resolves move tokens played from a board position")
                .arg(fen_arg())
                .arg(
                    Arg::with_name("TOKENS")
                        .help("Move tokens, in order")
                        .required(true)
                        .multiple(true)
                        .index(2),
                ),
        )
        .subcommand(
            SubCommand::with_name("replay")
                .about("Replays the puzzles of a Lichess puzzle CSV file")
                .arg(
                    Arg::with_name("FILE")
                        .help("CSV file of puzzles")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("themes")
                        .help("Only replay puzzles tagged with all of these themes")
                        .long("themes")
                        .value_name("THEMES")
                        .use_delimiter(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("min-rating")
                        .help("Only replay puzzles rated at least this")
                        .long("min-rating")
                        .value_name("RATING")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("max-rating")
                        .help("Only replay puzzles rated at most this")
                        .long("max-rating")
                        .value_name("RATING")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("limit")
                        .help("Stop after this many puzzles")
                        .long("limit")
                        .value_name("N")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("no-headers")
                        .help("The file has no header row")
                        .long("no-headers"),
                )
                .arg(
                    Arg::with_name("json")
                        .help("Print one JSON object per puzzle")
                        .long("json"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("perft", Some(matches)) => run_perft(matches),
        ("moves", Some(matches)) => run_moves(matches),
        ("notation", Some(matches)) => run_notation(matches),
        ("replay", Some(matches)) => run_replay(matches),
        _ => unreachable!("clap requires a subcommand"),
    }
}

fn fail<E: Display>(context: &str, err: E) -> ! {
    error!("{}: {}", context, err);
    eprintln!("{}: {}", context, err);
    process::exit(1);
}

fn language(matches: &ArgMatches) -> Language {
    value_t!(matches, "language", Language).unwrap_or_else(|e| e.exit())
}

fn position(matches: &ArgMatches) -> Position {
    let fen = matches.value_of("FEN").unwrap_or_default();
    Position::from_fen(fen).unwrap_or_else(|err| fail("invalid fen", err))
}

fn run_perft(matches: &ArgMatches) -> ! {
    let depth = value_t_or_exit!(matches, "depth", u32);
    let pos = position(matches);

    println!("fen:   {}", pos.as_fen());
    println!("depth: {}", depth);
    println!();
    println!("{}", pos);
    println!();
    for i in 1..depth + 1 {
        let start = Instant::now();
        let results = perft(&pos, i);
        let duration = start.elapsed();
        println!("perft({}) = {} ({} ms)", i, results, duration.as_millis());
    }

    process::exit(0);
}

fn run_moves(matches: &ArgMatches) -> ! {
    let lang = language(matches);
    let pos = position(matches);

    println!("{}", pos);
    println!();
    println!("state: {:?}", pos.game_state());
    if let Some(king) = pos.king_square(pos.side_to_move()) {
        for checker in pos.squares_attacking(pos.side_to_move().opponent(), king).iter() {
            println!("check from {}", checker);
        }
    }

    let moves = MoveGenerator::new().legal_moves(&pos, pos.side_to_move(), PromotionPolicy::All);
    for &mv in moves.iter() {
        let text = notation::render_move(&pos, mv, lang)
            .unwrap_or_else(|err| fail("cannot render move", err));
        println!("{:<6} {}", mv, text);
    }

    println!("{} legal moves", moves.len());
    process::exit(0);
}

fn run_notation(matches: &ArgMatches) -> ! {
    let lang = language(matches);
    let pos = position(matches);
    let tokens: Vec<&str> = matches
        .values_of("TOKENS")
        .map(|values| values.collect())
        .unwrap_or_default();

    let moves =
        notation::parse_line(&pos, &tokens).unwrap_or_else(|err| fail("cannot read line", err));
    let rendered = notation::render_line(&pos, &moves, lang)
        .unwrap_or_else(|err| fail("cannot render line", err));

    let mut end = pos.clone();
    for ((token, mv), text) in tokens.iter().zip(&moves).zip(&rendered) {
        println!("{:<10} {:<6} {}", token, mv, text);
        end.apply_move(*mv, true)
            .unwrap_or_else(|err| fail("cannot apply move", err));
    }

    println!();
    println!("{}", end);
    println!("fen:   {}", end.as_fen());
    println!("state: {:?}", end.game_state());
    process::exit(0);
}

fn run_replay(matches: &ArgMatches) -> ! {
    let lang = language(matches);
    let path = matches.value_of("FILE").unwrap_or_default();
    let themes: Vec<&str> = matches
        .values_of("themes")
        .map(|values| values.collect())
        .unwrap_or_default();
    let optional = |name: &str| {
        if matches.is_present(name) {
            Some(value_t_or_exit!(matches, name, u32))
        } else {
            None
        }
    };
    let limit = optional("limit").map(|limit| limit as usize);
    let (min_rating, max_rating) = (optional("min-rating"), optional("max-rating"));
    let json = matches.is_present("json");

    let file = File::open(path).unwrap_or_else(|err| fail(path, err));
    let mut reader = ReaderBuilder::new()
        .has_headers(!matches.is_present("no-headers"))
        .flexible(true)
        .from_reader(file);

    let (mut replayed, mut rejected) = (0usize, 0usize);
    for result in reader.deserialize::<LichessRecord>() {
        if limit.map_or(false, |limit| replayed >= limit) {
            break;
        }

        let record = result.unwrap_or_else(|err| fail(path, err));
        let line = match PuzzleLine::from_lichess_record(&record) {
            Ok(line) => line,
            Err(err) => {
                warn!("skipping puzzle {}: {}", record.puzzle_id, err);
                rejected += 1;
                continue;
            }
        };

        if !line.has_themes(&themes) || !line.is_rated_within(min_rating, max_rating) {
            continue;
        }

        let report = replay(&line, lang).unwrap_or_else(|err| fail(&record.puzzle_id, err));
        replayed += 1;
        if json {
            serde_json::to_writer(io::stdout(), &report)
                .unwrap_or_else(|err| fail("cannot write report", err));
            println!();
        } else {
            println!(
                "{:<8} {:>5} {:<12} {}",
                report.id,
                report.rating.map(|r| r.to_string()).unwrap_or_default(),
                format!("{:?}", report.final_state),
                report.solution
            );
        }
    }

    info!("replayed {} puzzles, rejected {}", replayed, rejected);
    process::exit(0);
}

// Plays the whole line, the solver always choosing the recorded move.
fn replay(line: &PuzzleLine, lang: Language) -> Result<ReplayReport, Box<dyn std::error::Error>> {
    let mut session = PuzzleSession::new(line)?;
    let mut solved = true;
    while let Some(expected) = session.expected_move() {
        if !session.try_move(expected)? {
            solved = false;
            break;
        }

        session.play_reply()?;
    }

    let setup = if line.moves().is_empty() { 0 } else { 1 };
    Ok(ReplayReport {
        id: line.id().unwrap_or_default().to_string(),
        rating: line.rating(),
        themes: line.themes().to_vec(),
        solution: line.notation(setup, line.moves().len(), lang)?,
        solved,
        final_state: session.position().game_state(),
    })
}
