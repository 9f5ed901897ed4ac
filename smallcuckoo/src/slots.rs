use crate::byte_store::VecStore;
use crate::fixed_buffers::FixedVec;

/// Largest slot table the growth controller will allocate.
pub const MAX_TABLE_SIZE: usize = 1 << 24;

/// Slot table size for `count` expected entries: twice the next power of
/// two, never fewer than 2 slots.
pub fn table_size_for(count: usize) -> usize {
    count.next_power_of_two().saturating_mul(2).max(2)
}

/// Power-of-two array of 16-bit entry indices; 0 marks an empty slot.
pub struct SlotTable {
    slots: FixedVec<u16, VecStore>,
}

impl SlotTable {
    /// Zeroed table of `size` slots
    pub fn new(size: usize) -> Self {
        debug_assert!(size.is_power_of_two() && size >= 2);
        Self {
            slots: FixedVec::new(VecStore::zeroed(size * size_of::<u16>())),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.capacity()
    }

    #[inline]
    pub fn get(&self, slot: usize) -> u16 {
        self.slots[slot]
    }

    /// Puts `index` into `slot` and hands back whatever was there.
    #[inline]
    pub fn swap(&mut self, slot: usize, index: u16) -> u16 {
        std::mem::replace(&mut self.slots[slot], index)
    }

    /// First occupied slot at or after `from`
    pub fn next_occupied(&self, from: usize) -> Option<usize> {
        self.slots
            .get(from..)?
            .iter()
            .position(|&index| index != 0)
            .map(|offset| from + offset)
    }

    /// Occupied entry indices in slot order
    pub fn occupied(&self) -> impl Iterator<Item = u16> + '_ {
        self.slots.iter().copied().filter(|&index| index != 0)
    }
}
