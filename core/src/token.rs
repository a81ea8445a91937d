use std::fmt;

/// Opaque team identifier, represented as a small integer index rather than
/// the single utf-8 characters the source draw used (spec.md §9: "keeps the
/// energy inner loop branch-free").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TeamToken(pub u32);

impl TeamToken {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TeamToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

impl From<u32> for TeamToken {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A slot/room coordinate identifying one quiz cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Placement {
    pub slot: usize,
    pub room: usize,
}

impl Placement {
    pub const fn new(slot: usize, room: usize) -> Self {
        Self { slot, room }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(s{}, r{})", self.slot, self.room)
    }
}
