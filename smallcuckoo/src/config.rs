/// Number of even/odd displacement rounds tried before the slot table doubles.
pub const MAX_DISPLACEMENT_ROUNDS: usize = 20;

/// Construction parameters for a [`SmallCuckoo`](crate::SmallCuckoo)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Expected number of entries, used to pre-size both backing arrays (default: 0)
    pub capacity_hint: usize,

    /// Displacement rounds per placement attempt before growing (default: 20)
    pub max_displacement_rounds: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity_hint: 0,
            max_displacement_rounds: MAX_DISPLACEMENT_ROUNDS,
        }
    }
}

impl Config {
    pub fn with_capacity_hint(mut self, capacity_hint: usize) -> Self {
        self.capacity_hint = capacity_hint;
        self
    }

    pub fn with_max_displacement_rounds(mut self, rounds: usize) -> Self {
        self.max_displacement_rounds = rounds;
        self
    }

    /// Rounds actually used by the eviction loop; at least one.
    pub(crate) fn rounds(&self) -> usize {
        self.max_displacement_rounds.max(1)
    }
}
