use itertools::Itertools;

/// A symbolic reference to a team slot in a post-prelim record (spec.md §6
/// "symbolic grammar").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketRef {
    /// The `i`-th prelim-ranked team (1-indexed), within this bracket's
    /// slice of the overall ranking.
    Prelim(u32),
    /// The `i`-th placer (1-indexed) out of a prior quiz, identified by its
    /// letter and, once composed for a specific bracket instance, that
    /// bracket's numeric suffix (so e.g. bracket 2's `D2` correctly refs
    /// `A2`/`B2`/`C2` rather than bracket 1's `A`/`B`/`C`).
    Quiz(char, u32, Option<usize>),
}

/// Which of the three concurrent brackets a slot belongs to (spec.md §4.7:
/// "bracket offset b ∈ {0,1,2} tags the bracket as S, A, B").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Semi,
    ConA,
    ConB,
    /// Round-robin sub-schedule for leftover teams that don't fill a full
    /// bracket (spec.md §4.7's "round-robin fallback"). Not one of the
    /// spec's named S/A/B kinds; see DESIGN.md for this extension.
    RoundRobin,
}

impl BracketKind {
    pub fn type_char(self) -> char {
        match self {
            BracketKind::Semi => 'S',
            BracketKind::ConA => 'A',
            BracketKind::ConB => 'B',
            BracketKind::RoundRobin => 'R',
        }
    }

    fn for_bracket_index(b: usize) -> Self {
        match b % 3 {
            0 => BracketKind::Semi,
            1 => BracketKind::ConA,
            _ => BracketKind::ConB,
        }
    }
}

/// One templated slot of a [`BracketTable`]: a letter, its position relative
/// to the prelim schedule's last slot, a room index local to one bracket's
/// room allotment, and the three symbolic refs that feed it.
#[derive(Debug, Clone, Copy)]
pub struct BracketSlot {
    pub letter: char,
    pub slot_offset: usize,
    pub room_index: usize,
    pub refs: [BracketRef; 3],
    /// Whether `finals_repeats` applies to this slot (the bracket's final).
    pub is_finals: bool,
}

/// A style's fixed `(letter → (slot_offset, room_index))` template (spec.md
/// §4.7).
#[derive(Debug, Clone)]
pub struct BracketTable {
    pub slots: Vec<BracketSlot>,
    /// How many local room indices a single bracket instance spans, used to
    /// compute the next free room for a round-robin fallback.
    pub rooms_per_bracket: usize,
}

/// Selects one of the four fixed-table styles (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketStyle {
    Full,
    Condensed,
    FinalsOnly,
    None,
}

fn q(letter: char, i: u32) -> BracketRef {
    BracketRef::Quiz(letter, i, None)
}
fn p(i: u32) -> BracketRef {
    BracketRef::Prelim(i)
}

/// The default `full` table, grounded in `original_source/gen.py`'s worked
/// 9-team bracket: three first-round quizzes (A/B/C) seeded directly from
/// prelim rank, cascading through D/E/F, G/H, I, down to the finals J.
pub fn full_table() -> BracketTable {
    BracketTable {
        rooms_per_bracket: 3,
        slots: vec![
            BracketSlot { letter: 'A', slot_offset: 1, room_index: 0, refs: [p(1), p(4), p(7)], is_finals: false },
            BracketSlot { letter: 'B', slot_offset: 1, room_index: 1, refs: [p(2), p(5), p(8)], is_finals: false },
            BracketSlot { letter: 'C', slot_offset: 1, room_index: 2, refs: [p(3), p(6), p(9)], is_finals: false },
            BracketSlot { letter: 'D', slot_offset: 2, room_index: 0, refs: [q('A', 1), q('B', 1), q('C', 1)], is_finals: false },
            BracketSlot { letter: 'E', slot_offset: 2, room_index: 1, refs: [q('A', 2), q('B', 2), q('C', 2)], is_finals: false },
            BracketSlot { letter: 'F', slot_offset: 2, room_index: 2, refs: [q('A', 3), q('B', 3), q('C', 3)], is_finals: false },
            BracketSlot { letter: 'G', slot_offset: 3, room_index: 0, refs: [q('D', 2), q('D', 3), q('E', 1)], is_finals: false },
            BracketSlot { letter: 'H', slot_offset: 3, room_index: 1, refs: [q('E', 2), q('E', 3), q('F', 1)], is_finals: false },
            BracketSlot { letter: 'I', slot_offset: 4, room_index: 0, refs: [q('G', 2), q('G', 3), q('H', 1)], is_finals: false },
            BracketSlot { letter: 'J', slot_offset: 5, room_index: 0, refs: [q('D', 1), q('G', 1), q('I', 1)], is_finals: true },
        ],
    }
}

/// The `condensed` table: same cascade as [`full_table`], but folded down to
/// two local rooms per bracket so two brackets can share a 3-room block
/// (spec.md §4.7: "pairs of brackets share rooms... occupying 2 rooms
/// each"). No condensed example survives in `original_source/`; room index
/// 2 (the table's third room, used by C/F) is folded onto local room 1. See
/// DESIGN.md for this Open Question resolution.
pub fn condensed_table() -> BracketTable {
    let mut table = full_table();
    table.rooms_per_bracket = 2;
    for slot in &mut table.slots {
        slot.room_index = slot.room_index.min(1);
    }
    table
}

/// A single "K" quiz seating prelim ranks 1-3 (spec.md §4.7).
pub fn finals_only_table() -> BracketTable {
    BracketTable {
        rooms_per_bracket: 1,
        slots: vec![BracketSlot {
            letter: 'K',
            slot_offset: 1,
            room_index: 0,
            refs: [p(1), p(2), p(3)],
            is_finals: true,
        }],
    }
}

fn table_for(style: BracketStyle) -> BracketTable {
    match style {
        BracketStyle::Full => full_table(),
        BracketStyle::Condensed => condensed_table(),
        BracketStyle::FinalsOnly => finals_only_table(),
        BracketStyle::None => BracketTable { slots: Vec::new(), rooms_per_bracket: 0 },
    }
}

/// One composed post-prelim record, still carrying symbolic refs — the
/// serializer resolves these against the finished prelim ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketRecord {
    pub quiz_num: String,
    pub slot_offset: usize,
    pub room_index: usize,
    pub refs: [BracketRef; 3],
    pub kind: BracketKind,
}

/// Expands `(N, style, finals_repeats, round_robin_fallback)` into a
/// deterministic sequence of [`BracketRecord`]s (spec.md §4.7). Pure: the
/// same inputs always produce the same output (spec.md §4.9 "composer
/// purity").
pub struct BracketComposer;

impl BracketComposer {
    pub fn compose(
        teams: u32,
        style: BracketStyle,
        finals_repeats: &[u32],
        round_robin_fallback: bool,
    ) -> Vec<BracketRecord> {
        if style == BracketStyle::None {
            return Vec::new();
        }

        let template = table_for(style);
        let num_brackets = (teams / 9) as usize;
        let mut out = Vec::new();
        let mut max_slot_offset = 0usize;

        for b in 0..num_brackets {
            let kind = BracketKind::for_bracket_index(b);
            let room_shift = match style {
                BracketStyle::Full => 3 * b,
                BracketStyle::Condensed => 3 * (b / 2),
                _ => 0,
            };
            let suffix = if num_brackets > 1 {
                Some(b + 1)
            } else {
                None
            };
            let prelim_offset = (b * 9) as u32;

            for slot in &template.slots {
                let letter_tag = |letter: char| match suffix {
                    Some(n) => format!("{letter}{n}"),
                    None => letter.to_string(),
                };
                // Quiz refs must carry this bracket's suffix too: bracket 2's
                // `D2` references `A2`/`B2`/`C2`, not bracket 1's bare
                // `A`/`B`/`C` (manager.py's `load_draw`: "`B3_1` means
                // whoever took first in quiz `B3`").
                let refs = slot.refs.map(|r| match r {
                    BracketRef::Prelim(i) => BracketRef::Prelim(prelim_offset + i),
                    BracketRef::Quiz(l, i, _) => BracketRef::Quiz(l, i, suffix),
                });
                let quiz_num = letter_tag(slot.letter);
                let room_index = slot.room_index + room_shift;
                max_slot_offset = max_slot_offset.max(slot.slot_offset);

                out.push(BracketRecord {
                    quiz_num,
                    slot_offset: slot.slot_offset,
                    room_index,
                    refs,
                    kind,
                });

                if slot.is_finals {
                    let repeats = finals_repeats.get(b).copied().unwrap_or(1).max(1);
                    for k in 2..=repeats {
                        out.push(BracketRecord {
                            quiz_num: format!("{}({k})", letter_tag(slot.letter)),
                            slot_offset: slot.slot_offset + (k as usize - 1),
                            room_index,
                            refs: slot.refs.map(|r| match r {
                                BracketRef::Prelim(i) => BracketRef::Prelim(prelim_offset + i),
                                BracketRef::Quiz(l, i, _) => BracketRef::Quiz(l, i, suffix),
                            }),
                            kind,
                        });
                    }
                }
            }
        }

        let leftover = teams % 9;
        if leftover >= 3 && round_robin_fallback {
            let extra_room = num_brackets * template.rooms_per_bracket.max(1);
            let start_rank = (num_brackets as u32) * 9 + 1;
            let ranks: Vec<u32> = (0..leftover).map(|i| start_rank + i).collect();
            for (idx, combo) in ranks.iter().combinations(3).enumerate() {
                out.push(BracketRecord {
                    quiz_num: format!("RR{}", idx + 1),
                    slot_offset: max_slot_offset + 1 + idx,
                    room_index: extra_room,
                    refs: [
                        BracketRef::Prelim(*combo[0]),
                        BracketRef::Prelim(*combo[1]),
                        BracketRef::Prelim(*combo[2]),
                    ],
                    kind: BracketKind::RoundRobin,
                });
            }
        }

        out
    }
}
