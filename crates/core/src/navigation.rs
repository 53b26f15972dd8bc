//! Position tracking inside a question set.
//!
//! Movement past either end is a no-op rather than an error; every mutating
//! method reports whether the cursor actually moved.

use crate::model::NavigationTopology;

/// Group index plus question index within that group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub group: usize,
    pub question: usize,
}

impl Cursor {
    #[must_use]
    pub const fn new(group: usize, question: usize) -> Self {
        Self { group, question }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    topology: NavigationTopology,
    sizes: Vec<usize>,
    cursor: Cursor,
}

impl Navigator {
    /// Create a cursor at the first question of the first non-empty group.
    #[must_use]
    pub fn new(topology: NavigationTopology, group_sizes: Vec<usize>) -> Self {
        let first = group_sizes.iter().position(|len| *len > 0).unwrap_or(0);
        Self {
            topology,
            sizes: group_sizes,
            cursor: Cursor::new(first, 0),
        }
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[must_use]
    pub fn topology(&self) -> NavigationTopology {
        self.topology
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.sizes.len()
    }

    /// Total number of questions across groups.
    #[must_use]
    pub fn total(&self) -> usize {
        self.sizes.iter().sum()
    }

    /// Zero-based position of the cursor in the flattened question order.
    #[must_use]
    pub fn flat_index(&self) -> usize {
        self.sizes[..self.cursor.group].iter().sum::<usize>() + self.cursor.question
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.peek_prev().is_none()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.peek_next().is_none()
    }

    /// Advance one step. No wraparound.
    pub fn next(&mut self) -> bool {
        self.step(self.peek_next())
    }

    /// Step back one position. No wraparound.
    pub fn prev(&mut self) -> bool {
        self.step(self.peek_prev())
    }

    /// Jump directly to a `(group, question)` pair.
    ///
    /// Out-of-range targets leave the cursor untouched. Part-based navigation
    /// only accepts question index 0.
    pub fn jump_to(&mut self, group: usize, question: usize) -> bool {
        if !self.is_valid(group, question) {
            return false;
        }
        self.step(Some(Cursor::new(group, question)))
    }

    /// Jump to the n-th question of the flattened order.
    pub fn jump_to_index(&mut self, index: usize) -> bool {
        let mut remaining = index;
        for (group, len) in self.sizes.iter().enumerate() {
            if remaining < *len {
                return self.jump_to(group, remaining);
            }
            remaining -= len;
        }
        false
    }

    fn is_valid(&self, group: usize, question: usize) -> bool {
        let Some(len) = self.sizes.get(group) else {
            return false;
        };
        match self.topology {
            NavigationTopology::Parts => question == 0,
            NavigationTopology::Sectioned | NavigationTopology::Flat => question < *len,
        }
    }

    fn step(&mut self, target: Option<Cursor>) -> bool {
        match target {
            Some(cursor) if cursor != self.cursor => {
                self.cursor = cursor;
                true
            }
            _ => false,
        }
    }

    fn peek_next(&self) -> Option<Cursor> {
        let Cursor { group, question } = self.cursor;
        if self.topology != NavigationTopology::Parts
            && question + 1 < self.sizes.get(group).copied().unwrap_or(0)
        {
            return Some(Cursor::new(group, question + 1));
        }
        let next_group = (group + 1..self.sizes.len()).find(|g| self.sizes[*g] > 0)?;
        Some(Cursor::new(next_group, 0))
    }

    fn peek_prev(&self) -> Option<Cursor> {
        let Cursor { group, question } = self.cursor;
        if self.topology != NavigationTopology::Parts && question > 0 {
            return Some(Cursor::new(group, question - 1));
        }
        let prev_group = (0..group).rev().find(|g| self.sizes[*g] > 0)?;
        let question = match self.topology {
            NavigationTopology::Parts => 0,
            NavigationTopology::Sectioned | NavigationTopology::Flat => self.sizes[prev_group] - 1,
        };
        Some(Cursor::new(prev_group, question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sectioned(sizes: &[usize]) -> Navigator {
        Navigator::new(NavigationTopology::Sectioned, sizes.to_vec())
    }

    #[test]
    fn next_crosses_group_boundary_and_stops_at_end() {
        let mut nav = sectioned(&[2, 2]);
        assert!(nav.next());
        assert_eq!(nav.cursor(), Cursor::new(0, 1));
        assert!(nav.next());
        assert_eq!(nav.cursor(), Cursor::new(1, 0));
        assert!(nav.next());
        assert_eq!(nav.cursor(), Cursor::new(1, 1));
        assert!(!nav.next());
        assert_eq!(nav.cursor(), Cursor::new(1, 1));
        assert!(nav.is_last());
    }

    #[test]
    fn prev_is_noop_at_start() {
        let mut nav = sectioned(&[3]);
        assert!(nav.is_first());
        assert!(!nav.prev());
        assert_eq!(nav.cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn next_then_prev_returns_to_origin_everywhere_but_the_end() {
        let sizes = [3, 1, 4];
        let total: usize = sizes.iter().sum();
        for index in 0..total - 1 {
            let mut nav = sectioned(&sizes);
            assert!(nav.jump_to_index(index));
            let origin = nav.cursor();
            assert!(nav.next());
            assert!(nav.prev());
            assert_eq!(nav.cursor(), origin, "index {index}");
        }
    }

    #[test]
    fn jump_then_prev_lands_on_last_question_of_previous_group() {
        let mut nav = sectioned(&[5, 3]);
        assert!(nav.jump_to(1, 0));
        assert!(nav.prev());
        assert_eq!(nav.cursor(), Cursor::new(0, 4));
    }

    #[test]
    fn invalid_jump_is_noop() {
        let mut nav = sectioned(&[2, 2]);
        assert!(!nav.jump_to(2, 0));
        assert!(!nav.jump_to(0, 2));
        assert!(!nav.jump_to_index(4));
        assert_eq!(nav.cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn parts_move_by_whole_groups() {
        let mut nav = Navigator::new(NavigationTopology::Parts, vec![1, 4, 3]);
        assert!(nav.next());
        assert_eq!(nav.cursor(), Cursor::new(1, 0));
        assert!(nav.next());
        assert_eq!(nav.cursor(), Cursor::new(2, 0));
        assert!(!nav.next());
        assert!(nav.prev());
        assert_eq!(nav.cursor(), Cursor::new(1, 0));
        assert!(!nav.jump_to(1, 2));
    }

    #[test]
    fn flat_index_tracks_cursor() {
        let mut nav = Navigator::new(NavigationTopology::Flat, vec![10]);
        assert!(nav.jump_to_index(7));
        assert_eq!(nav.flat_index(), 7);
        assert_eq!(nav.total(), 10);
    }

    #[test]
    fn empty_groups_are_skipped() {
        let mut nav = sectioned(&[0, 1, 0, 2]);
        assert_eq!(nav.cursor(), Cursor::new(1, 0));
        assert!(nav.next());
        assert_eq!(nav.cursor(), Cursor::new(3, 0));
        assert!(nav.prev());
        assert_eq!(nav.cursor(), Cursor::new(1, 0));
        assert!(!nav.prev());
    }
}
