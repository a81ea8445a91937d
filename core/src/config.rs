use crate::error::{DrawError, DrawResult};

fn ceil_div(a: u32, b: u32) -> u32 {
    (a + b - 1) / b
}

/// Structural parameters of a draw (spec.md §3 "Config").
///
/// Weights live separately in [`crate::energy::EnergyWeights`] (spec.md §9:
/// "do not hide them in process-wide state").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawConfig {
    pub teams: u32,
    pub qpt: u32,
    pub rooms: u32,
    pub quizzes: u32,
    pub blanks: u32,
    pub slots: u32,
    pub break_index: usize,
}

impl DrawConfig {
    /// Builds a config the way the original `Draw.__init__` does: validating
    /// the structural preconditions, then deriving `Q`, default `B`, `S`,
    /// and `break_index` from `teams`/`qpt`/`rooms`/`break_loc`.
    pub fn new(
        teams: u32,
        qpt: u32,
        rooms: u32,
        break_loc: f64,
        blanks: Option<u32>,
    ) -> DrawResult<Self> {
        if teams == 0 || qpt == 0 || rooms == 0 {
            return Err(DrawError::ConfigError(
                "teams, qpt, and rooms must all be positive".into(),
            ));
        }
        if teams / 3 < rooms {
            return Err(DrawError::ConfigError(format!(
                "too many rooms: teams/3 ({}) < rooms ({})",
                teams / 3,
                rooms
            )));
        }
        if qpt % 3 != 0 && teams % 3 != 0 {
            return Err(DrawError::ConfigError(
                "either teams or qpt must be divisible by 3".into(),
            ));
        }

        let product = teams as u64 * qpt as u64;
        let quizzes = (product / 3) as u32;

        let initial_slots = ceil_div(quizzes, rooms);
        let blanks = blanks.unwrap_or_else(|| initial_slots * rooms - quizzes);
        let slots = ceil_div(quizzes + blanks, rooms);
        let break_index = (slots as f64 * break_loc).round() as i64;
        let break_index = break_index.max(0) as usize;

        Ok(Self {
            teams,
            qpt,
            rooms,
            quizzes,
            blanks,
            slots,
            break_index,
        })
    }

    /// Builds a config directly from already-known structural values,
    /// bypassing the derivation in [`DrawConfig::new`]. Used by
    /// [`crate::board::Board::from_text`], which recovers these numbers from
    /// the text itself rather than from caller-supplied parameters.
    pub(crate) fn from_parts(
        teams: u32,
        qpt: u32,
        rooms: u32,
        quizzes: u32,
        blanks: u32,
        slots: u32,
        break_index: usize,
    ) -> Self {
        Self {
            teams,
            qpt,
            rooms,
            quizzes,
            blanks,
            slots,
            break_index,
        }
    }

    /// Number of slots that belong to the prelim region proper, i.e. the
    /// region the Initializer is allowed to place teams into (spec.md
    /// §4.2/§4.4 and the "initializer excludes blanks" open question).
    pub fn prelim_slots(&self) -> u32 {
        ceil_div(self.quizzes, self.rooms)
    }
}
