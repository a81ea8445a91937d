use tinyvec::TinyVec;

use crate::error::{DrawError, DrawResult};
use crate::token::TeamToken;

/// A single 3-slot seat container (spec.md §4.1).
///
/// Tokens are stored in insertion order; `pop` locates by index modulo 3,
/// wrapping out-of-range indices rather than panicking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizCell {
    tokens: TinyVec<[TeamToken; 3]>,
}

impl QuizCell {
    pub const CAPACITY: usize = 3;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn full(&self) -> bool {
        self.tokens.len() >= Self::CAPACITY
    }

    pub fn contains(&self, token: TeamToken) -> bool {
        self.tokens.contains(&token)
    }

    pub fn tokens(&self) -> &[TeamToken] {
        &self.tokens
    }

    pub fn push(&mut self, token: TeamToken) -> DrawResult<()> {
        if self.full() {
            return Err(DrawError::CapacityExceeded);
        }
        self.tokens.push(token);
        Ok(())
    }

    /// Removes and returns the token at `index % 3`. Fails if that position
    /// does not currently hold a token.
    pub fn pop(&mut self, index: usize) -> DrawResult<TeamToken> {
        let idx = index % Self::CAPACITY;
        if idx >= self.tokens.len() {
            return Err(DrawError::MissingPlacement);
        }
        Ok(self.tokens.remove(idx))
    }

    /// Removes and returns the token equal to `token`, wherever it sits.
    pub fn pop_value(&mut self, token: TeamToken) -> DrawResult<TeamToken> {
        let idx = self
            .tokens
            .iter()
            .position(|&t| t == token)
            .ok_or(DrawError::MissingPlacement)?;
        self.pop(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_pop_by_index_wraps_modulo_3() {
        let mut cell = QuizCell::new();
        cell.push(TeamToken::new(1)).unwrap();
        cell.push(TeamToken::new(2)).unwrap();
        cell.push(TeamToken::new(3)).unwrap();
        assert!(cell.full());

        // index 4 wraps to 1
        let popped = cell.pop(4).unwrap();
        assert_eq!(popped, TeamToken::new(2));
        assert_eq!(cell.tokens(), &[TeamToken::new(1), TeamToken::new(3)]);
    }

    #[test]
    fn fourth_push_fails_with_capacity_exceeded() {
        let mut cell = QuizCell::new();
        for i in 0..3 {
            cell.push(TeamToken::new(i)).unwrap();
        }
        let err = cell.push(TeamToken::new(99)).unwrap_err();
        assert!(matches!(err, DrawError::CapacityExceeded));
    }

    #[test]
    fn pop_missing_position_errors() {
        let mut cell = QuizCell::new();
        cell.push(TeamToken::new(1)).unwrap();
        let err = cell.pop(1).unwrap_err();
        assert!(matches!(err, DrawError::MissingPlacement));
    }

    #[test]
    fn pop_value_locates_by_value_not_position() {
        let mut cell = QuizCell::new();
        cell.push(TeamToken::new(5)).unwrap();
        cell.push(TeamToken::new(7)).unwrap();
        cell.push(TeamToken::new(9)).unwrap();
        let popped = cell.pop_value(TeamToken::new(7)).unwrap();
        assert_eq!(popped, TeamToken::new(7));
        assert_eq!(cell.tokens(), &[TeamToken::new(5), TeamToken::new(9)]);
    }
}
