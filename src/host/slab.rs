use std::fmt::{self, Display, Formatter};

/// Handle to a slab slot, valid for one occupancy only.
///
/// The generation is bumped every time a slot is vacated, so a key kept
/// after removal never resolves to whatever reuses the slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SlabKey {
    index: u32,
    generation: u32,
}

impl Display for SlabKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

enum Slot<T> {
    Vacant { generation: u32 },
    Occupied { generation: u32, item: T },
}

pub(crate) struct Slab<T> {
    items: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Slab<T> {
    pub(crate) fn new(size: usize) -> Self {
        let items = (0..size).map(|_| Slot::Vacant { generation: 0 }).collect();
        // Reversed so the lowest index is handed out first.
        let free = (0..size).rev().collect();

        Self {
            items,
            free,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn insert(&mut self, item: T) -> SlabKey {
        let index = if let Some(i) = self.free.pop() {
            i
        } else {
            let len = self.items.len();
            let new_len = if len == 0 { 1 } else { 2 * len };

            self.items
                .extend((len..new_len).map(|_| Slot::Vacant { generation: 0 }));
            self.free.extend(((len + 1)..new_len).rev());

            len
        };

        let generation = match self.items[index] {
            Slot::Vacant { generation } => generation,
            Slot::Occupied { .. } => unreachable!("free list pointed at an occupied slot"),
        };

        self.items[index] = Slot::Occupied { generation, item };
        self.len += 1;

        SlabKey {
            index: index as u32,
            generation,
        }
    }

    #[cfg(test)]
    pub(crate) fn get(&self, key: SlabKey) -> Option<&T> {
        match self.items.get(key.index as usize) {
            Some(Slot::Occupied { generation, item }) if *generation == key.generation => {
                Some(item)
            }
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, key: SlabKey) -> bool {
        self.get(key).is_some()
    }

    /// Removes the item behind `key`, or returns `None` if the key is stale.
    pub(crate) fn remove(&mut self, key: SlabKey) -> Option<T> {
        let index = key.index as usize;

        match self.items.get(index) {
            Some(Slot::Occupied { generation, .. }) if *generation == key.generation => {}
            _ => return None,
        }

        let next = key.generation.wrapping_add(1);
        let slot = std::mem::replace(&mut self.items[index], Slot::Vacant { generation: next });
        self.free.push(index);
        self.len -= 1;

        match slot {
            Slot::Occupied { item, .. } => Some(item),
            Slot::Vacant { .. } => None,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (SlabKey, &T)> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Occupied { generation, item } => Some((
                    SlabKey {
                        index: index as u32,
                        generation: *generation,
                    },
                    item,
                )),
                Slot::Vacant { .. } => None,
            })
    }

    /// Removes every item, keeping the allocated slots for reuse.
    pub(crate) fn drain(&mut self) -> Vec<T> {
        let keys: Vec<SlabKey> = self.iter().map(|(key, _)| key).collect();

        keys.into_iter().filter_map(|key| self.remove(key)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_key_does_not_alias_reused_slot() {
        let mut slab = Slab::new(1);

        let first = slab.insert("first");
        assert_eq!(slab.remove(first), Some("first"));

        let second = slab.insert("second");
        assert_ne!(first, second);
        assert_eq!(slab.get(first), None);
        assert_eq!(slab.remove(first), None);
        assert_eq!(slab.get(second), Some(&"second"));
    }

    #[test]
    fn test_grows_past_initial_size() {
        let mut slab = Slab::new(0);
        let keys: Vec<SlabKey> = (0..10).map(|i| slab.insert(i)).collect();

        assert_eq!(slab.len(), 10);
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(slab.get(*key), Some(&i));
        }
    }

    #[test]
    fn test_drain_empties_and_reuses() {
        let mut slab = Slab::new(2);
        slab.insert('a');
        slab.insert('b');

        let mut drained = slab.drain();
        drained.sort();
        assert_eq!(drained, vec!['a', 'b']);
        assert_eq!(slab.len(), 0);

        slab.insert('c');
        assert_eq!(slab.len(), 1);
    }
}
