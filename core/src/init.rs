use crate::board::Board;
use crate::energy::EnergyModel;
use crate::error::DrawResult;
use crate::token::TeamToken;

/// Deterministic greedy placement seeding a legal(ish) starting board
/// (spec.md §4.4).
///
/// For each round `0..qpt`, for each team in fixed order (team index 0..T),
/// the team is placed at the open position with the lowest insertion
/// energy, ties broken by iteration order. This does not guarantee
/// constraint-feasibility — it can leave `currently_quizzing` penalties
/// non-zero when the layout is tight — but it is fully deterministic given
/// its inputs, which the optimizer then repairs.
pub struct Initializer;

impl Initializer {
    pub fn initialize(board: &mut Board, energy: &EnergyModel) -> DrawResult<()> {
        let qpt = board.config().qpt;
        let teams: Vec<TeamToken> = board.teams().collect();

        for _round in 0..qpt {
            for &team in &teams {
                let open = board.open_positions();
                let best = open
                    .iter()
                    .copied()
                    .map(|p| (p, energy.quiz_energy(board, team, p)))
                    .min_by(|a, b| a.1.partial_cmp(&b.1).expect("energy is never NaN"))
                    .map(|(p, _)| p);

                let Some(placement) = best else {
                    return Err(crate::error::DrawError::InvariantViolation(
                        "no open position left for a team during initialization".into(),
                    ));
                };
                board.push(team, placement)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DrawConfig;
    use crate::energy::EnergyWeights;

    #[test]
    fn initializer_is_deterministic() {
        let config = DrawConfig::new(9, 3, 3, 1.1, None).unwrap();
        let model = EnergyModel::new(EnergyWeights::default());

        let mut board_a = Board::new(config);
        Initializer::initialize(&mut board_a, &model).unwrap();

        let mut board_b = Board::new(config);
        Initializer::initialize(&mut board_b, &model).unwrap();

        for team in board_a.teams() {
            assert_eq!(
                board_a.placements_of(team),
                board_b.placements_of(team),
                "team {team} placed differently across identical runs"
            );
        }
    }

    #[test]
    fn every_team_reaches_full_qpt_placements() {
        let config = DrawConfig::new(9, 3, 3, 1.1, None).unwrap();
        let model = EnergyModel::new(EnergyWeights::default());
        let mut board = Board::new(config);
        Initializer::initialize(&mut board, &model).unwrap();

        for team in board.teams() {
            assert_eq!(board.placements_of(team).len() as u32, config.qpt);
        }
    }

    #[test]
    fn s1_tiny_valid_scenario_has_no_team_sharing_more_than_one_quiz() {
        // S1 from spec.md §8: T=6, qpt=3, R=1 — after initialization alone
        // (no thermalization needed for this tiny case) every team appears
        // exactly 3 times, one per quiz, six quizzes total.
        let config = DrawConfig::new(6, 3, 1, 1.1, None).unwrap();
        let model = EnergyModel::new(EnergyWeights::default());
        let mut board = Board::new(config);
        Initializer::initialize(&mut board, &model).unwrap();

        for team in board.teams() {
            assert_eq!(board.placements_of(team).len(), 3);
        }
        // 6 quizzes holding 3 teams each => 18 total seats filled.
        let filled: usize = (0..board.slot_count())
            .flat_map(|s| board.slot_cells(s).iter())
            .map(|c| c.len())
            .sum();
        assert_eq!(filled, 18);
    }
}
