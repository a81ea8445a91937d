use std::collections::HashMap;

use crate::cell::QuizCell;
use crate::config::DrawConfig;
use crate::error::{DrawError, DrawResult};
use crate::token::{Placement, TeamToken};

/// Alphabet used by the text board format (spec.md §6), carried over from
/// the original draw's single-utf-8-character team names.
pub const TOKEN_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// The `(slots × rooms)` grid of [`QuizCell`]s plus the inverted
/// team→placements index (spec.md §3/§4.2).
#[derive(Debug, Clone)]
pub struct Board {
    config: DrawConfig,
    draw: Vec<Vec<QuizCell>>,
    team_placements: HashMap<TeamToken, Vec<Placement>>,
}

impl Board {
    pub fn new(config: DrawConfig) -> Self {
        let total = config.quizzes + config.blanks;
        let mut draw = Vec::with_capacity(config.slots as usize);
        let mut placed = 0u32;
        for _ in 0..config.slots {
            let room_count = total.saturating_sub(placed).min(config.rooms);
            draw.push(vec![QuizCell::new(); room_count as usize]);
            placed += room_count;
        }

        let mut team_placements = HashMap::with_capacity(config.teams as usize);
        for i in 0..config.teams {
            team_placements.insert(TeamToken::new(i), Vec::with_capacity(config.qpt as usize));
        }

        Self {
            config,
            draw,
            team_placements,
        }
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn teams(&self) -> impl Iterator<Item = TeamToken> + '_ {
        (0..self.config.teams).map(TeamToken::new)
    }

    pub fn slot_count(&self) -> usize {
        self.draw.len()
    }

    pub fn rooms_in_slot(&self, slot: usize) -> usize {
        self.draw.get(slot).map_or(0, Vec::len)
    }

    pub fn cell(&self, placement: Placement) -> &QuizCell {
        &self.draw[placement.slot][placement.room]
    }

    pub fn slot_cells(&self, slot: usize) -> &[QuizCell] {
        &self.draw[slot]
    }

    pub fn placements_of(&self, token: TeamToken) -> &[Placement] {
        self.team_placements
            .get(&token)
            .map_or(&[], Vec::as_slice)
    }

    /// Whether `token` occupies any cell of slot `slot`.
    pub fn quizzing_in_slot(&self, token: TeamToken, slot: usize) -> bool {
        self.draw
            .get(slot)
            .map_or(false, |cells| cells.iter().any(|c| c.contains(token)))
    }

    /// Pushes `token` into `(slot, room)`, updating the cell and the
    /// inverted index atomically (spec.md §4.2).
    pub fn push(&mut self, token: TeamToken, placement: Placement) -> DrawResult<()> {
        let cell = &mut self.draw[placement.slot][placement.room];
        if cell.contains(token) {
            return Err(DrawError::InvariantViolation(format!(
                "{token} already present in cell {placement}"
            )));
        }
        cell.push(token)?;
        self.team_placements
            .entry(token)
            .or_default()
            .push(placement);
        Ok(())
    }

    /// Pops `token` from `(slot, room)`, updating the cell and the inverted
    /// index atomically. Fails with [`DrawError::MissingPlacement`] if the
    /// token is not actually there.
    pub fn pop(&mut self, token: TeamToken, placement: Placement) -> DrawResult<()> {
        self.draw[placement.slot][placement.room].pop_value(token)?;
        let list = self
            .team_placements
            .get_mut(&token)
            .ok_or(DrawError::MissingPlacement)?;
        let idx = list
            .iter()
            .position(|&p| p == placement)
            .ok_or(DrawError::MissingPlacement)?;
        list.remove(idx);
        Ok(())
    }

    /// Every `(slot, room)` whose cell is not full, restricted to the first
    /// `⌈Q/R⌉` slots — the blanks region is not considered during
    /// initialization (spec.md §4.2, and the open question in §9 preserving
    /// this exclusion even though the mutator may later touch blank cells).
    pub fn open_positions(&self) -> Vec<Placement> {
        let prelim_slots = self.config.prelim_slots() as usize;
        let mut out = Vec::new();
        for slot in 0..prelim_slots.min(self.draw.len()) {
            for (room, cell) in self.draw[slot].iter().enumerate() {
                if !cell.full() {
                    out.push(Placement::new(slot, room));
                }
            }
        }
        out
    }

    /// Renders the board to the line-oriented text format (spec.md §6).
    pub fn to_text(&self) -> String {
        let alphabet: Vec<char> = TOKEN_ALPHABET.chars().collect();
        let mut lines = Vec::with_capacity(self.draw.len() + 1);
        for slot in &self.draw {
            let row = slot
                .iter()
                .map(|cell| {
                    let mut seats = [' '; 3];
                    for i in 0..3 {
                        seats[i] = cell
                            .tokens()
                            .get(i)
                            .and_then(|t| alphabet.get(t.index()))
                            .copied()
                            .unwrap_or('_');
                    }
                    seats.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(",")
                })
                .collect::<Vec<_>>()
                .join(";");
            lines.push(row);
        }
        let insert_at = self.config.break_index.min(lines.len());
        lines.insert(insert_at, String::new());
        lines.join("\n")
    }

    /// Reconstructs a board (and the config it implies) from the text format
    /// produced by [`Board::to_text`]. Round-trips the placement map and
    /// token set (spec.md §8 property 6), though not necessarily the exact
    /// floating-point `break_loc` that produced the original `break_index`.
    pub fn from_text(text: &str) -> DrawResult<(DrawConfig, Board)> {
        let lines: Vec<&str> = text.lines().collect();
        let break_index = lines
            .iter()
            .position(|l| l.is_empty())
            .ok_or_else(|| DrawError::ConfigError("text has no break marker line".into()))?;

        let rows: Vec<&str> = lines
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != break_index)
            .map(|(_, l)| *l)
            .collect();

        if rows.is_empty() {
            return Err(DrawError::ConfigError("text has no slot rows".into()));
        }

        let alphabet: Vec<char> = TOKEN_ALPHABET.chars().collect();
        let mut grid: Vec<Vec<[char; 3]>> = Vec::with_capacity(rows.len());
        let rooms = rows[0].split(';').count();
        let mut max_team_index = None;
        let mut qpt_count = 0u32;
        let mut blank_count = 0u32;

        for row in &rows {
            let mut cells = Vec::with_capacity(rooms);
            for cell_text in row.split(';') {
                let mut seats = ['_'; 3];
                for (i, tok) in cell_text.split(',').enumerate().take(3) {
                    let ch = tok.chars().next().unwrap_or('_');
                    seats[i] = ch;
                    if ch == '_' {
                        blank_count += 1;
                    } else if ch == alphabet[0] {
                        qpt_count += 1;
                    }
                    if ch != '_' {
                        let idx = alphabet
                            .iter()
                            .position(|&a| a == ch)
                            .ok_or_else(|| DrawError::ConfigError(format!("unknown token `{ch}`")))?;
                        max_team_index = Some(max_team_index.map_or(idx, |m: usize| m.max(idx)));
                    }
                }
                cells.push(seats);
            }
            grid.push(cells);
        }

        let teams = max_team_index.map_or(0, |m| m as u32 + 1);
        let quizzes = rows.len() as u32 * rooms as u32 - blank_count / 3;
        let slots = rows.len() as u32;
        let config = DrawConfig::from_parts(
            teams,
            qpt_count,
            rooms as u32,
            quizzes,
            blank_count / 3,
            slots,
            break_index,
        );

        let mut board = Board::new(config);
        for (slot, cells) in grid.into_iter().enumerate() {
            for (room, seats) in cells.into_iter().enumerate() {
                for ch in seats {
                    if ch == '_' {
                        continue;
                    }
                    let idx = alphabet.iter().position(|&a| a == ch).unwrap();
                    board.push(TeamToken::new(idx as u32), Placement::new(slot, room))?;
                }
            }
        }

        Ok((config, board))
    }
}
