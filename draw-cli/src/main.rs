use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use draw_core::{
    Board, BracketComposer, BracketStyle, DrawConfig, DrawError, DrawSerializer, EnergyModel,
    EnergyWeights, Initializer, Optimizer, TimeGrid,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Generates a quiz-meet prelim draw plus bracket schedule and prints the
/// resulting quiz records as JSON (spec.md §6 "CLI surface of the core").
///
/// Everything upstream of this — roster files, cloud-spreadsheet upload,
/// scoresheet templates, credential parsing — is out of scope: this binary
/// assumes its inputs are already reduced to team counts and (optionally) a
/// team-name list.
#[derive(Debug, Parser)]
#[command(name = "quizdraw", version, about)]
struct Args {
    /// Number of teams.
    #[arg(long)]
    teams: u32,
    /// Quizzes per team.
    #[arg(long)]
    qpt: u32,
    /// Number of rooms.
    #[arg(long)]
    rooms: u32,
    /// Fraction of the way through the schedule the day-break falls, in
    /// `[0, 1]` (values `>= 1` push the break past the last slot, i.e. no
    /// break).
    #[arg(long = "break-loc", default_value_t = 1.1)]
    break_loc: f64,
    /// Override the number of blank padding quizzes (defaults to whatever
    /// fills out the `slots × rooms` rectangle).
    #[arg(long)]
    blanks: Option<u32>,

    #[arg(long, value_enum, default_value_t = Mode::Anneal)]
    mode: Mode,

    #[arg(long = "anneal-steps", default_value_t = 10_000)]
    anneal_steps: usize,
    #[arg(long = "kt-max", default_value_t = 5.0)]
    kt_max: f64,
    #[arg(long = "kt-min", default_value_t = 1e-3)]
    kt_min: f64,
    /// Use a log10 temperature schedule instead of linear.
    #[arg(long = "log-schedule")]
    log_schedule: bool,

    #[arg(long = "thermalize-steps", default_value_t = 10_000)]
    thermalize_steps: usize,
    /// `kT` for the warm thermalize pass (randomizing).
    #[arg(long = "kt-warm", default_value_t = 0.1)]
    kt_warm: f64,
    /// `kT` for the cold thermalize pass (settling).
    #[arg(long = "kt-cold", default_value_t = 1e-3)]
    kt_cold: f64,

    /// Probability of proposing a quiz-swap over a team-swap.
    #[arg(long, default_value_t = 0.3)]
    alpha: f64,

    #[arg(long = "bracket-style", value_enum, default_value_t = CliBracketStyle::Full)]
    bracket_style: CliBracketStyle,
    /// Comma-separated finals-repeat counts, one per bracket (e.g. `2,1`).
    #[arg(long = "finals-repeats", value_delimiter = ',')]
    finals_repeats: Vec<u32>,
    #[arg(long = "round-robin-fallback")]
    round_robin_fallback: bool,

    /// PRNG seed; omit for a nondeterministic run.
    #[arg(long)]
    seed: Option<u64>,
    /// Fail with exit code 3 if the final energy exceeds this value.
    #[arg(long = "energy-threshold", default_value_t = f64::INFINITY)]
    energy_threshold: f64,

    /// Comma-separated team names, in token order. Defaults to `Team1..N`.
    #[arg(long = "team-names", value_delimiter = ',')]
    team_names: Vec<String>,

    #[arg(long = "slots-on-friday", default_value_t = 8)]
    slots_on_friday: u32,
    #[arg(long = "slots-before-lunch", default_value_t = 3)]
    slots_before_lunch: u32,
    #[arg(long = "minutes-per-quiz", default_value_t = 20)]
    minutes_per_quiz: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Anneal,
    Thermalize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliBracketStyle {
    Full,
    Condensed,
    FinalsOnly,
    None,
}

impl From<CliBracketStyle> for BracketStyle {
    fn from(value: CliBracketStyle) -> Self {
        match value {
            CliBracketStyle::Full => BracketStyle::Full,
            CliBracketStyle::Condensed => BracketStyle::Condensed,
            CliBracketStyle::FinalsOnly => BracketStyle::FinalsOnly,
            CliBracketStyle::None => BracketStyle::None,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Config(err)) => {
            log::error!("{err}");
            ExitCode::from(2)
        }
        Err(CliError::Unsatisfiable { energy, threshold }) => {
            log::error!("draw is unsatisfiable: final energy {energy:.3} exceeds threshold {threshold:.3}");
            ExitCode::from(3)
        }
        Err(CliError::Other(err)) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug)]
enum CliError {
    Config(DrawError),
    Unsatisfiable { energy: f64, threshold: f64 },
    Other(anyhow::Error),
}

impl From<anyhow::Error> for CliError {
    fn from(value: anyhow::Error) -> Self {
        CliError::Other(value)
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = DrawConfig::new(args.teams, args.qpt, args.rooms, args.break_loc, args.blanks)
        .map_err(CliError::Config)?;

    let team_names = resolve_team_names(&args.team_names, config.teams)?;

    let weights = EnergyWeights::default();
    let energy = EnergyModel::new(weights);
    let mut board = Board::new(config);
    Initializer::initialize(&mut board, &energy)
        .context("initializing the prelim draw")?;

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let optimizer = Optimizer::new(energy);
    let final_energy = match args.mode {
        Mode::Anneal => optimizer.anneal(
            &mut board,
            args.anneal_steps,
            args.kt_max,
            args.kt_min,
            args.alpha,
            args.log_schedule,
            &mut rng,
        ),
        Mode::Thermalize => {
            optimizer.thermalize(&mut board, args.thermalize_steps, args.kt_warm, args.alpha, &mut rng);
            optimizer.thermalize(&mut board, args.thermalize_steps, args.kt_cold, args.alpha, &mut rng)
        }
    };

    let stats = optimizer.statistics(&board);
    log::info!(
        "final energy {:.4} ({} currently-quizzing conflicts, {} back-to-backs, {} hat-tricks)",
        final_energy,
        stats.currently_quizzing_conflicts.len(),
        stats.back_to_back.len(),
        stats.hat_tricks.len(),
    );

    if final_energy > args.energy_threshold {
        return Err(CliError::Unsatisfiable {
            energy: final_energy,
            threshold: args.energy_threshold,
        });
    }

    let bracket_records = BracketComposer::compose(
        config.teams,
        args.bracket_style.into(),
        &args.finals_repeats,
        args.round_robin_fallback,
    );

    let time_grid = TimeGrid {
        slots_on_friday: args.slots_on_friday,
        slots_before_lunch: args.slots_before_lunch,
        minutes_per_quiz: args.minutes_per_quiz,
        ..TimeGrid::default()
    };

    let records = DrawSerializer::serialize(&board, &team_names, &bracket_records, &time_grid);

    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &records)
        .context("writing quiz-record JSON to stdout")?;
    println!();

    Ok(())
}

fn resolve_team_names(supplied: &[String], teams: u32) -> Result<Vec<String>, CliError> {
    if supplied.is_empty() {
        return Ok((1..=teams).map(|i| format!("Team{i}")).collect());
    }
    if supplied.len() as u32 != teams {
        return Err(CliError::Config(DrawError::ConfigError(format!(
            "--team-names supplied {} names but --teams is {}",
            supplied.len(),
            teams
        ))));
    }
    Ok(supplied.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_team_names_are_one_indexed() {
        let names = resolve_team_names(&[], 3).unwrap();
        assert_eq!(names, vec!["Team1", "Team2", "Team3"]);
    }

    #[test]
    fn supplied_team_names_pass_through_in_order() {
        let supplied = vec!["Eagles".to_string(), "Falcons".to_string()];
        let names = resolve_team_names(&supplied, 2).unwrap();
        assert_eq!(names, supplied);
    }

    #[test]
    fn mismatched_team_name_count_is_a_config_error() {
        let supplied = vec!["Eagles".to_string()];
        let err = resolve_team_names(&supplied, 2).unwrap_err();
        assert!(matches!(err, CliError::Config(DrawError::ConfigError(_))));
    }

    #[test]
    fn bracket_style_conversion_round_trips_variants() {
        assert_eq!(BracketStyle::from(CliBracketStyle::Full), BracketStyle::Full);
        assert_eq!(BracketStyle::from(CliBracketStyle::Condensed), BracketStyle::Condensed);
        assert_eq!(BracketStyle::from(CliBracketStyle::FinalsOnly), BracketStyle::FinalsOnly);
        assert_eq!(BracketStyle::from(CliBracketStyle::None), BracketStyle::None);
    }
}
