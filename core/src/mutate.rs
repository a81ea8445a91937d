use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::board::Board;
use crate::error::DrawResult;
use crate::token::{Placement, TeamToken};

/// A single proposed move, carrying everything needed to revert it without
/// recomputation (spec.md §4.5 "self-inverse moves").
#[derive(Debug, Clone, Copy)]
pub enum Move {
    /// Swap which team occupies `placement_a` and `placement_b` (one team
    /// each). Applying the same `TeamSwap` twice is the identity.
    TeamSwap {
        team_a: TeamToken,
        placement_a: Placement,
        team_b: TeamToken,
        placement_b: Placement,
    },
    /// Swap the entire contents of two quizzes (cells). Applying the same
    /// `QuizSwap` twice is the identity.
    QuizSwap {
        placement_a: Placement,
        placement_b: Placement,
    },
}

/// Proposes and applies/reverts moves over a [`Board`] (spec.md §4.5).
///
/// Both move kinds are self-inverse: calling [`Mutator::revert`] with the
/// exact [`Move`] returned by [`Mutator::propose`]'s apply step restores the
/// touched cells' contents exactly. Team `team_placements` order is not
/// guaranteed to be restored — a touched team's entry moves to the back of
/// its list on revert, mirroring the original algorithm's behavior; callers
/// must not depend on placement order, only on placement-set membership.
pub struct Mutator;

impl Mutator {
    /// Proposes a move: with probability `alpha`, a quiz-swap; otherwise a
    /// team-swap (spec.md §4.5). Returns `None` if the board has fewer than
    /// two occupied positions to pick from.
    pub fn propose<R: Rng + ?Sized>(board: &Board, alpha: f64, rng: &mut R) -> Option<Move> {
        if rng.gen::<f64>() < alpha {
            Self::propose_quiz_swap(board, rng)
        } else {
            Self::propose_team_swap(board, rng)
        }
    }

    fn all_placements(board: &Board) -> Vec<Placement> {
        let mut out = Vec::new();
        for slot in 0..board.slot_count() {
            for room in 0..board.rooms_in_slot(slot) {
                out.push(Placement::new(slot, room));
            }
        }
        out
    }

    /// Samples two distinct `(slot, room)` cells from the *entire* grid,
    /// blanks region included — a cell can be empty or partially filled, in
    /// which case swapping is a no-op on contents but still consumes an
    /// attempt (spec.md §9, preserved verbatim).
    fn propose_quiz_swap<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Move> {
        let candidates = Self::all_placements(board);
        if candidates.len() < 2 {
            return None;
        }
        let dist = Uniform::from(0..candidates.len());
        let i = dist.sample(rng);
        let mut j = dist.sample(rng);
        while j == i {
            j = dist.sample(rng);
        }
        Some(Move::QuizSwap {
            placement_a: candidates[i],
            placement_b: candidates[j],
        })
    }

    fn propose_team_swap<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Move> {
        let teams: Vec<TeamToken> = board.teams().collect();
        if teams.len() < 2 {
            return None;
        }
        let team_dist = Uniform::from(0..teams.len());

        let team_a = teams[team_dist.sample(rng)];
        let placements_a = board.placements_of(team_a);
        if placements_a.is_empty() {
            return None;
        }
        let placement_a = placements_a[Uniform::from(0..placements_a.len()).sample(rng)];

        let mut team_b = teams[team_dist.sample(rng)];
        while team_b == team_a {
            team_b = teams[team_dist.sample(rng)];
        }
        let placements_b = board.placements_of(team_b);
        if placements_b.is_empty() {
            return None;
        }
        let placement_b = placements_b[Uniform::from(0..placements_b.len()).sample(rng)];

        if placement_a == placement_b {
            return None;
        }

        // Either team may already be quizzing in the other's destination
        // cell (the common case, since every cell holds 3 of T teams) —
        // moving it there would duplicate a token in that cell. Treat this
        // as a no-op rather than attempting a push the board will reject.
        if board.cell(placement_b).contains(team_a) || board.cell(placement_a).contains(team_b) {
            return None;
        }

        Some(Move::TeamSwap {
            team_a,
            placement_a,
            team_b,
            placement_b,
        })
    }

    /// Applies `mv` to `board`.
    pub fn apply(board: &mut Board, mv: Move) -> DrawResult<()> {
        match mv {
            Move::TeamSwap {
                team_a,
                placement_a,
                team_b,
                placement_b,
            } => {
                board.pop(team_a, placement_a)?;
                board.pop(team_b, placement_b)?;
                board.push(team_a, placement_b)?;
                board.push(team_b, placement_a)?;
                Ok(())
            }
            Move::QuizSwap {
                placement_a,
                placement_b,
            } => Self::swap_cells(board, placement_a, placement_b),
        }
    }

    /// Reverts `mv`, which must be the exact move previously returned by
    /// [`Mutator::apply`]'s call. Both move kinds are their own inverse, so
    /// reverting is applying again.
    pub fn revert(board: &mut Board, mv: Move) -> DrawResult<()> {
        match mv {
            Move::TeamSwap {
                team_a,
                placement_a,
                team_b,
                placement_b,
            } => {
                // team_a now sits at placement_b, team_b at placement_a.
                board.pop(team_a, placement_b)?;
                board.pop(team_b, placement_a)?;
                board.push(team_a, placement_a)?;
                board.push(team_b, placement_b)?;
                Ok(())
            }
            Move::QuizSwap {
                placement_a,
                placement_b,
            } => Self::swap_cells(board, placement_a, placement_b),
        }
    }

    /// Exchanges the full contents of two cells by popping every token out
    /// of both and pushing them back into the other's slot. Self-inverse:
    /// swapping twice restores the original assignment.
    fn swap_cells(board: &mut Board, a: Placement, b: Placement) -> DrawResult<()> {
        let tokens_a: Vec<TeamToken> = board.cell(a).tokens().to_vec();
        let tokens_b: Vec<TeamToken> = board.cell(b).tokens().to_vec();

        for &t in &tokens_a {
            board.pop(t, a)?;
        }
        for &t in &tokens_b {
            board.pop(t, b)?;
        }
        for &t in &tokens_a {
            board.push(t, b)?;
        }
        for &t in &tokens_b {
            board.push(t, a)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DrawConfig;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn board_with(config: DrawConfig, placements: &[(usize, usize, u32)]) -> Board {
        let mut board = Board::new(config);
        for &(slot, room, team) in placements {
            board
                .push(TeamToken::new(team), Placement::new(slot, room))
                .unwrap();
        }
        board
    }

    #[test]
    fn team_swap_apply_then_revert_restores_cell_contents() {
        let config = DrawConfig::new(9, 3, 3, 1.1, None).unwrap();
        let mut board = board_with(config, &[(0, 0, 1), (0, 1, 2)]);
        let mv = Move::TeamSwap {
            team_a: TeamToken::new(1),
            placement_a: Placement::new(0, 0),
            team_b: TeamToken::new(2),
            placement_b: Placement::new(0, 1),
        };
        Mutator::apply(&mut board, mv).unwrap();
        assert!(board.cell(Placement::new(0, 0)).contains(TeamToken::new(2)));
        assert!(board.cell(Placement::new(0, 1)).contains(TeamToken::new(1)));

        Mutator::revert(&mut board, mv).unwrap();
        assert!(board.cell(Placement::new(0, 0)).contains(TeamToken::new(1)));
        assert!(board.cell(Placement::new(0, 1)).contains(TeamToken::new(2)));
    }

    #[test]
    fn team_swap_is_rejected_rather_than_applied_when_destination_already_holds_the_team() {
        // team 1 and team 2 both sit together in two different quizzes, the
        // normal case once a board is mostly full (every cell holds 3 of T
        // teams). Swapping them would duplicate one of them in a cell it's
        // already in — propose_team_swap must reject this, not hand back a
        // move that panics `Board::push` inside `Mutator::apply`.
        let config = DrawConfig::new(9, 3, 3, 1.1, None).unwrap();
        let board = board_with(
            config,
            &[
                (0, 0, 1),
                (0, 0, 2),
                (0, 0, 3),
                (1, 0, 1),
                (1, 0, 2),
                (1, 0, 4),
            ],
        );

        // Exhaustively confirm the specific conflicting pair is never
        // proposed, regardless of which placement of each team is sampled.
        assert!(board.cell(Placement::new(1, 0)).contains(TeamToken::new(1)));
        assert!(board.cell(Placement::new(0, 0)).contains(TeamToken::new(2)));

        for seed in 0..200u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            if let Some(mv @ Move::TeamSwap { .. }) = Mutator::propose_team_swap(&board, &mut rng) {
                let mut scratch = board.clone();
                Mutator::apply(&mut scratch, mv)
                    .expect("propose_team_swap must never hand back a move that conflicts");
                Mutator::revert(&mut scratch, mv).unwrap();
            }
        }
    }

    #[test]
    fn quiz_swap_apply_then_revert_restores_cell_contents() {
        let config = DrawConfig::new(9, 3, 3, 1.1, None).unwrap();
        let mut board = board_with(
            config,
            &[(0, 0, 1), (0, 0, 2), (1, 0, 3), (1, 0, 4), (1, 0, 5)],
        );
        let a = Placement::new(0, 0);
        let b = Placement::new(1, 0);
        let before_a: Vec<_> = board.cell(a).tokens().to_vec();
        let before_b: Vec<_> = board.cell(b).tokens().to_vec();

        let mv = Move::QuizSwap {
            placement_a: a,
            placement_b: b,
        };
        Mutator::apply(&mut board, mv).unwrap();
        assert_eq!(board.cell(a).tokens(), before_b.as_slice());
        assert_eq!(board.cell(b).tokens(), before_a.as_slice());

        Mutator::revert(&mut board, mv).unwrap();
        assert_eq!(board.cell(a).tokens(), before_a.as_slice());
        assert_eq!(board.cell(b).tokens(), before_b.as_slice());
    }

    #[test]
    fn revert_restores_placement_set_membership_even_if_not_list_order() {
        let config = DrawConfig::new(9, 3, 3, 1.1, None).unwrap();
        let mut board = board_with(config, &[(0, 0, 1), (1, 1, 1), (0, 1, 2)]);
        let mv = Move::TeamSwap {
            team_a: TeamToken::new(1),
            placement_a: Placement::new(0, 0),
            team_b: TeamToken::new(2),
            placement_b: Placement::new(0, 1),
        };
        Mutator::apply(&mut board, mv).unwrap();
        Mutator::revert(&mut board, mv).unwrap();

        let mut team1: Vec<_> = board.placements_of(TeamToken::new(1)).to_vec();
        team1.sort();
        assert_eq!(team1, vec![Placement::new(0, 0), Placement::new(1, 1)]);
    }

    #[test]
    fn propose_is_seed_reproducible() {
        let config = DrawConfig::new(9, 3, 3, 1.1, None).unwrap();
        let board = board_with(config, &[(0, 0, 1), (0, 1, 2), (1, 0, 3)]);

        let mut rng_a = SmallRng::seed_from_u64(42);
        let mut rng_b = SmallRng::seed_from_u64(42);
        let a = Mutator::propose(&board, 0.5, &mut rng_a);
        let b = Mutator::propose(&board, 0.5, &mut rng_b);
        match (a, b) {
            (Some(Move::TeamSwap { .. }), Some(Move::TeamSwap { .. })) => {}
            (Some(Move::QuizSwap { .. }), Some(Move::QuizSwap { .. })) => {}
            other => panic!("expected matching move kinds from identical seeds: {other:?}"),
        }
    }
}
