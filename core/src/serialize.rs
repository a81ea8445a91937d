use serde::Serialize;

use crate::board::Board;
use crate::bracket::{BracketKind, BracketRecord, BracketRef};
use crate::token::Placement;

/// One emitted quiz record (spec.md §6 "Quiz record JSON").
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuizRecord {
    pub quiz_num: String,
    pub slot_num: String,
    pub room_num: String,
    pub slot_time: String,
    pub team1: String,
    pub team2: String,
    pub team3: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// The day/hour grid used to label `slot_time` (spec.md §4.8), grounded in
/// `manager.py`'s `generate_draw_from_roster`: a Friday start, a per-slot
/// duration, a lunch break past `slots_before_lunch`, a day cutover at
/// `slots_on_friday`, and an extra break before the first non-prelim quiz.
#[derive(Debug, Clone, Copy)]
pub struct TimeGrid {
    pub slots_on_friday: u32,
    pub slots_before_lunch: u32,
    /// `(hour, minute)` in 24h time.
    pub friday_start: (u32, u32),
    pub saturday_start: (u32, u32),
    pub lunch_break: (u32, u32),
    pub prelim_semi_break: (u32, u32),
    pub minutes_per_quiz: u32,
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self {
            slots_on_friday: 8,
            slots_before_lunch: 3,
            friday_start: (18, 20),
            saturday_start: (9, 0),
            lunch_break: (1, 0),
            prelim_semi_break: (0, 20),
            minutes_per_quiz: 20,
        }
    }
}

impl TimeGrid {
    /// Labels a 1-indexed `slot` (`is_prelim` distinguishes the
    /// prelim-to-semi break, which only applies past the prelim region).
    pub fn label(&self, slot: u32, is_prelim: bool) -> String {
        let (day, (mut h, mut m)) = if slot <= self.slots_on_friday {
            let m = self.friday_start.1 + self.minutes_per_quiz * (slot - 1);
            let h = self.friday_start.0;
            ("Fri", (h, m))
        } else {
            let adj_slot = slot - self.slots_on_friday;
            let mut m = self.saturday_start.1 + self.minutes_per_quiz * (adj_slot - 1);
            let mut h = self.saturday_start.0;
            if adj_slot > self.slots_before_lunch {
                h += self.lunch_break.0;
                m += self.lunch_break.1;
            }
            if !is_prelim {
                h += self.prelim_semi_break.0;
                m += self.prelim_semi_break.1;
            }
            ("Sat", (h, m))
        };

        h += m / 60;
        m %= 60;
        let am_pm = if h >= 12 { "PM" } else { "AM" };
        let h12 = 1 + (h.saturating_sub(1)) % 12;
        format!("{day} {h12}:{m:0>2} {am_pm}")
    }
}

/// Emits the finished quiz sequence: prelims from the board, then bracket
/// records with their symbolic team refs (spec.md §4.8).
pub struct DrawSerializer;

impl DrawSerializer {
    pub fn serialize(
        board: &Board,
        team_names: &[String],
        bracket_records: &[BracketRecord],
        time_grid: &TimeGrid,
    ) -> Vec<QuizRecord> {
        let mut out = Vec::new();
        let mut quiz_num = 1u32;

        for slot in 0..board.slot_count() {
            for room in 0..board.rooms_in_slot(slot) {
                let placement = Placement::new(slot, room);
                let cell = board.cell(placement);
                if cell.is_empty() {
                    continue;
                }
                let names: Vec<&str> = cell
                    .tokens()
                    .iter()
                    .map(|t| team_names[t.index()].as_str())
                    .collect();
                let slot_num = (slot + 1) as u32;
                out.push(QuizRecord {
                    quiz_num: quiz_num.to_string(),
                    slot_num: slot_num.to_string(),
                    room_num: (room + 1).to_string(),
                    slot_time: time_grid.label(slot_num, true),
                    team1: names.get(0).copied().unwrap_or("").to_string(),
                    team2: names.get(1).copied().unwrap_or("").to_string(),
                    team3: names.get(2).copied().unwrap_or("").to_string(),
                    url: String::new(),
                    kind: "P".to_string(),
                });
                quiz_num += 1;
            }
        }

        let prelim_slots = board.slot_count() as u32;
        for record in bracket_records {
            let slot_num = prelim_slots + record.slot_offset as u32;
            out.push(QuizRecord {
                quiz_num: record.quiz_num.clone(),
                slot_num: slot_num.to_string(),
                room_num: (record.room_index + 1).to_string(),
                slot_time: time_grid.label(slot_num, false),
                team1: resolve_ref(record.refs[0]),
                team2: resolve_ref(record.refs[1]),
                team3: resolve_ref(record.refs[2]),
                url: String::new(),
                kind: record.kind.type_char().to_string(),
            });
        }

        out
    }
}

/// Stringifies a symbolic ref per spec.md §6's grammar: `P_i` for a prelim
/// rank, `<letter>_i` for a prior quiz's i-th placer (tagged with that
/// quiz's bracket suffix, e.g. `B3_1`, when it belongs to bracket instance
/// other than the first). These are left symbolic — actual standings only
/// exist once the event's results are in.
fn resolve_ref(r: BracketRef) -> String {
    match r {
        BracketRef::Prelim(i) => format!("P_{i}"),
        BracketRef::Quiz(letter, i, None) => format!("{letter}_{i}"),
        BracketRef::Quiz(letter, i, Some(suffix)) => format!("{letter}{suffix}_{i}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::{BracketComposer, BracketStyle};
    use crate::config::DrawConfig;
    use crate::token::TeamToken;

    fn names(n: u32) -> Vec<String> {
        (0..n).map(|i| format!("Team{i}")).collect()
    }

    #[test]
    fn prelim_records_are_row_major_and_one_indexed() {
        let config = DrawConfig::new(9, 3, 3, 1.1, None).unwrap();
        let mut board = Board::new(config);
        board.push(TeamToken::new(0), Placement::new(0, 0)).unwrap();
        board.push(TeamToken::new(1), Placement::new(0, 0)).unwrap();
        board.push(TeamToken::new(2), Placement::new(0, 0)).unwrap();

        let grid = TimeGrid::default();
        let records = DrawSerializer::serialize(&board, &names(9), &[], &grid);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].quiz_num, "1");
        assert_eq!(records[0].slot_num, "1");
        assert_eq!(records[0].room_num, "1");
        assert_eq!(records[0].team1, "Team0");
        assert_eq!(records[0].kind, "P");
    }

    #[test]
    fn bracket_records_use_symbolic_refs() {
        let config = DrawConfig::new(9, 3, 3, 1.1, None).unwrap();
        let board = Board::new(config);
        let bracket = BracketComposer::compose(9, BracketStyle::Full, &[], false);
        let grid = TimeGrid::default();
        let records = DrawSerializer::serialize(&board, &names(9), &bracket, &grid);

        let a = records.iter().find(|r| r.quiz_num == "A").unwrap();
        assert_eq!(a.team1, "P_1");
        assert_eq!(a.team2, "P_4");
        assert_eq!(a.kind, "S");

        let d = records.iter().find(|r| r.quiz_num == "D").unwrap();
        assert_eq!(d.team1, "A_1");
        assert_eq!(d.team2, "B_1");
    }

    #[test]
    fn second_bracket_quiz_refs_resolve_with_bracket_suffix() {
        // S5 from spec.md §8: N=18, condensed — bracket 2's "D2" must
        // resolve against bracket 2's own "A2"/"B2"/"C2", not bracket 1's.
        let config = DrawConfig::new(18, 3, 3, 1.1, None).unwrap();
        let board = Board::new(config);
        let bracket = BracketComposer::compose(18, BracketStyle::Condensed, &[], false);
        let grid = TimeGrid::default();
        let records = DrawSerializer::serialize(&board, &names(18), &bracket, &grid);

        let d2 = records.iter().find(|r| r.quiz_num == "D2").unwrap();
        assert_eq!(d2.team1, "A2_1");
        assert_eq!(d2.team2, "B2_1");

        let d1 = records.iter().find(|r| r.quiz_num == "D1").unwrap();
        assert_eq!(d1.team1, "A1_1");
        assert_eq!(d1.team2, "B1_1");
    }

    #[test]
    fn slot_time_crosses_into_saturday_with_lunch_and_semi_break() {
        let grid = TimeGrid::default();
        let friday_label = grid.label(1, true);
        assert!(friday_label.starts_with("Fri"));

        let saturday_label = grid.label(grid.slots_on_friday + 1, true);
        assert!(saturday_label.starts_with("Sat"));
    }
}
