use std::collections::HashMap;

use rand::Rng;

use crate::board::Board;
use crate::energy::EnergyModel;
use crate::mutate::Mutator;
use crate::token::TeamToken;

/// Which temperature regime a run uses (spec.md §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureSchedule {
    /// Constant `kT` for the whole run.
    Constant,
    /// Linear interpolation from `kt_max` down to `kt_min`.
    Linear,
    /// Interpolation in log10 space from `kt_max` down to `kt_min`.
    Log10,
}

/// Metropolis-Hastings acceptance probability. `delta <= 0` always accepts;
/// `kt <= 0.0` always rejects an uphill move; a non-finite result (e.g. an
/// `exp` overflow from a huge negative `delta` at a tiny `kT`) is clamped to
/// reject rather than silently accepting via `NaN < x` falling through.
fn acceptance_probability(delta: f64, kt: f64) -> f64 {
    if delta <= 0.0 {
        return 1.0;
    }
    if kt <= 0.0 {
        return 0.0;
    }
    let p = (-delta / kt).exp();
    if !p.is_finite() {
        0.0
    } else {
        p.min(1.0)
    }
}

fn kt_at_step(step: usize, steps: usize, kt_max: f64, kt_min: f64, schedule: TemperatureSchedule) -> f64 {
    if steps <= 1 {
        return kt_max;
    }
    let frac = step as f64 / (steps - 1) as f64;
    match schedule {
        TemperatureSchedule::Constant => kt_max,
        TemperatureSchedule::Linear => kt_max + (kt_min - kt_max) * frac,
        TemperatureSchedule::Log10 => {
            let lo = kt_max.log10();
            let hi = kt_min.log10();
            10f64.powf(lo + (hi - lo) * frac)
        }
    }
}

/// Per-team and structural health report produced after a run (spec.md
/// §4.7 "statistics pass").
#[derive(Debug, Clone)]
pub struct DrawStatistics {
    pub total_energy: f64,
    pub room_counts: HashMap<TeamToken, HashMap<usize, u32>>,
    pub opponent_counts: HashMap<(TeamToken, TeamToken), u32>,
    pub currently_quizzing_conflicts: Vec<(TeamToken, usize)>,
    pub back_to_back: Vec<(TeamToken, usize)>,
    pub hat_tricks: Vec<(TeamToken, usize)>,
    pub strictly_valid: bool,
}

/// Drives the board toward low energy via Metropolis-Hastings local search
/// (spec.md §4.6), and reports on the result (spec.md §4.7).
pub struct Optimizer {
    energy: EnergyModel,
}

impl Optimizer {
    pub fn new(energy: EnergyModel) -> Self {
        Self { energy }
    }

    /// One pass at a single fixed `kT` (spec.md §4.6 "thermalize").
    pub fn thermalize<R: Rng + ?Sized>(
        &self,
        board: &mut Board,
        steps: usize,
        kt: f64,
        alpha: f64,
        rng: &mut R,
    ) -> f64 {
        self.run(board, steps, alpha, rng, |_step, _steps| kt)
    }

    /// A full run with `kT` decaying from `kt_max` to `kt_min` (spec.md §4.6
    /// "anneal"). `log_schedule` selects log10 interpolation over the
    /// default linear one.
    pub fn anneal<R: Rng + ?Sized>(
        &self,
        board: &mut Board,
        steps: usize,
        kt_max: f64,
        kt_min: f64,
        alpha: f64,
        log_schedule: bool,
        rng: &mut R,
    ) -> f64 {
        let schedule = if log_schedule {
            TemperatureSchedule::Log10
        } else {
            TemperatureSchedule::Linear
        };
        self.run(board, steps, alpha, rng, move |step, total_steps| {
            kt_at_step(step, total_steps, kt_max, kt_min, schedule)
        })
    }

    fn run<R: Rng + ?Sized>(
        &self,
        board: &mut Board,
        steps: usize,
        alpha: f64,
        rng: &mut R,
        kt_for_step: impl Fn(usize, usize) -> f64,
    ) -> f64 {
        let mut energy = self.energy.total(board);
        let report_every = (steps / 20).max(1);

        for step in 0..steps {
            let kt = kt_for_step(step, steps);
            let Some(mv) = Mutator::propose(board, alpha, rng) else {
                continue;
            };
            Mutator::apply(board, mv).expect("proposed move always targets occupied placements");
            let candidate_energy = self.energy.total(board);
            let delta = candidate_energy - energy;
            let p = acceptance_probability(delta, kt);

            if rng.gen::<f64>() < p {
                energy = candidate_energy;
            } else {
                Mutator::revert(board, mv).expect("revert mirrors a move just applied");
            }

            if step % report_every == 0 {
                log::info!("step {step}/{steps}: kT={kt:.4} energy={energy:.4}");
            }
        }

        energy
    }

    /// Computes the post-run health report (spec.md §4.7). `board` is cloned
    /// internally, so the caller's board is left untouched.
    pub fn statistics(&self, board: &Board) -> DrawStatistics {
        let mut scratch = board.clone();
        let total_energy = self.energy.total(&mut scratch);

        let mut room_counts: HashMap<TeamToken, HashMap<usize, u32>> = HashMap::new();
        let mut opponent_counts: HashMap<(TeamToken, TeamToken), u32> = HashMap::new();
        let mut currently_quizzing_conflicts = Vec::new();
        let mut back_to_back = Vec::new();
        let mut hat_tricks = Vec::new();

        for team in board.teams() {
            for &placement in board.placements_of(team) {
                *room_counts
                    .entry(team)
                    .or_default()
                    .entry(placement.room)
                    .or_insert(0) += 1;
            }
        }

        for slot in 0..board.slot_count() {
            let mut seen_this_slot: HashMap<TeamToken, u32> = HashMap::new();
            for room in 0..board.rooms_in_slot(slot) {
                let cell = board.cell(crate::token::Placement::new(slot, room));
                let tokens = cell.tokens();
                for (i, &a) in tokens.iter().enumerate() {
                    *seen_this_slot.entry(a).or_insert(0) += 1;
                    for &b in &tokens[i + 1..] {
                        let key = if a < b { (a, b) } else { (b, a) };
                        *opponent_counts.entry(key).or_insert(0) += 1;
                    }
                }
            }
            for (&team, &count) in &seen_this_slot {
                if count > 1 {
                    currently_quizzing_conflicts.push((team, slot));
                }
            }
        }

        let break_index = board.config().break_index;
        for team in board.teams() {
            let occupied: Vec<bool> = (0..board.slot_count())
                .map(|s| board.quizzing_in_slot(team, s))
                .collect();
            for slot in 1..occupied.len() {
                if occupied[slot] && occupied[slot - 1] && slot != break_index {
                    back_to_back.push((team, slot));
                }
            }
            for slot in 2..occupied.len() {
                if occupied[slot] && occupied[slot - 1] && occupied[slot - 2] && slot != break_index {
                    hat_tricks.push((team, slot));
                }
            }
        }

        let strictly_valid = currently_quizzing_conflicts.is_empty()
            && opponent_counts.values().all(|&c| c <= 1);

        DrawStatistics {
            total_energy,
            room_counts,
            opponent_counts,
            currently_quizzing_conflicts,
            back_to_back,
            hat_tricks,
            strictly_valid,
        }
    }
}
