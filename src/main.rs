#![allow(non_snake_case)]
use RustedGraphDots::Utils::logger::init_logger;
use RustedGraphDots::game::game_round::{EXPRESSION_SLOTS, GameRound};
use RustedGraphDots::game::settings::GameSettings;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Plays one round of graph dots: every expression is traced and scored against the dots.
#[derive(Parser, Debug)]
#[command(name = "RustedGraphDots", version)]
struct Args {
    /// Settings document (sections tracer, layout, game).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error or off.
    #[arg(long)]
    log: Option<String>,

    /// Expressions in x, one per slot.
    #[arg(num_args = 0..=EXPRESSION_SLOTS)]
    expressions: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logger(args.log.as_deref(), None) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    let settings = match &args.settings {
        Some(path) => match GameSettings::from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => GameSettings::default(),
    };
    let expressions = if args.expressions.is_empty() {
        vec!["2*x+1".to_string(), "sin(x)*5".to_string()]
    } else {
        args.expressions
    };

    let mut round = GameRound::generate(&settings);
    for (slot, text) in expressions.iter().enumerate() {
        round.set_expression(slot, text);
    }
    println!("Dots\n");
    for dot in &round.dots {
        println!("{:>5} ({:.2}, {:.2})", dot.kind, dot.x, dot.y);
    }
    let result = round.play(&settings);
    println!("\n{}", result.table());
    println!("score: {}", result.score);
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_flags_and_expressions() {
        let args = Args::try_parse_from([
            "RustedGraphDots",
            "--settings",
            "game.txt",
            "--log",
            "debug",
            "x^2",
            "1/x",
        ])
        .unwrap();
        assert_eq!(args.settings, Some(PathBuf::from("game.txt")));
        assert_eq!(args.log.as_deref(), Some("debug"));
        assert_eq!(args.expressions, vec!["x^2", "1/x"]);
    }

    #[test]
    fn test_settings_flag_without_value_is_an_error() {
        assert!(Args::try_parse_from(["RustedGraphDots", "x", "--settings"]).is_err());
    }

    #[test]
    fn test_too_many_expressions_is_an_error() {
        let mut argv = vec!["RustedGraphDots"];
        argv.extend(["x"; EXPRESSION_SLOTS + 1]);
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_no_arguments() {
        let args = Args::try_parse_from(["RustedGraphDots"]).unwrap();
        assert!(args.settings.is_none() && args.expressions.is_empty());
    }
}
