//! Generational slot arena
//!
//! Dense slot vector plus a free list. A handle is `(index, generation)`;
//! removing an entry bumps the slot's generation, so a stale handle can never
//! resolve to a newer occupant and no handle is ever reissued.
//! Iteration is in slot order, which is deterministic for a given sequence of
//! inserts and removes.

use serde::{Deserialize, Serialize};

/// Stable handle into an [`Arena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    index: u32,
    generation: u32,
}

impl Key {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
    /// Total inserts over the arena's lifetime
    inserted: u64,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            inserted: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> Key {
        self.insert_with(|_| value)
    }

    /// Insert a value that needs to know its own key (e.g. to stamp it into
    /// collider back-references).
    pub fn insert_with(&mut self, make: impl FnOnce(Key) -> T) -> Key {
        self.len += 1;
        self.inserted += 1;

        // Reuse freed slots in LIFO order
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            let key = Key {
                index,
                generation: slot.generation,
            };
            slot.value = Some(make(key));
            return key;
        }

        let key = Key {
            index: self.slots.len() as u32,
            generation: 0,
        };
        self.slots.push(Slot {
            generation: 0,
            value: Some(make(key)),
        });
        key
    }

    pub fn remove(&mut self, key: Key) -> Option<T> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        let value = slot.value.take()?;
        self.len -= 1;
        // A slot whose generation is exhausted is retired, never reused
        match slot.generation.checked_add(1) {
            Some(next) => {
                slot.generation = next;
                self.free.push(key.index);
            }
            None => log::debug!("arena slot {} retired", key.index),
        }
        Some(value)
    }

    pub fn get(&self, key: Key) -> Option<&T> {
        self.slots
            .get(key.index as usize)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, key: Key) -> Option<&mut T> {
        self.slots
            .get_mut(key.index as usize)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of inserts ever made (never decreases)
    pub fn inserted(&self) -> u64 {
        self.inserted
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    Key {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Key, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value.as_mut().map(|value| {
                (
                    Key {
                        index: index as u32,
                        generation,
                    },
                    value,
                )
            })
        })
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| slot.value.as_ref())
    }

    /// Snapshot of live keys, safe to hold while mutating the arena
    pub fn keys(&self) -> Vec<Key> {
        self.iter().map(|(key, _)| key).collect()
    }

    /// Remove and return every entry in slot order
    pub fn drain(&mut self) -> Vec<(Key, T)> {
        let keys = self.keys();
        keys.into_iter()
            .filter_map(|key| self.remove(key).map(|value| (key, value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.remove(a), Some("a"));
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.remove(a), None);
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_stale_key_never_resolves() {
        let mut arena = Arena::new();
        let old = arena.insert(1);
        arena.remove(old);
        let new = arena.insert(2);
        // Same slot reused, different generation
        assert_eq!(old.index(), new.index());
        assert_ne!(old, new);
        assert_eq!(arena.get(old), None);
        assert_eq!(arena.get(new), Some(&2));
    }

    #[test]
    fn test_exhausted_slot_is_retired() {
        let mut arena = Arena::new();
        let first = arena.insert('a');
        arena.slots[first.index() as usize].generation = u32::MAX - 1;
        arena.remove(Key {
            index: first.index(),
            generation: u32::MAX - 1,
        });

        let last = arena.insert('b');
        assert_eq!(last.index(), first.index());
        assert_eq!(last.generation(), u32::MAX);
        arena.remove(last);

        // The slot is not handed out again; a fresh one is appended
        let next = arena.insert('c');
        assert_ne!(next.index(), first.index());
        assert_eq!(arena.get(last), None);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.iter().count(), 1);
    }

    #[test]
    fn test_inserted_is_monotonic() {
        let mut arena = Arena::new();
        let k = arena.insert(());
        arena.remove(k);
        arena.insert(());
        assert_eq!(arena.inserted(), 2);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_insert_with_sees_own_key() {
        let mut arena = Arena::new();
        let key = arena.insert_with(|k| k);
        assert_eq!(arena.get(key), Some(&key));
    }

    #[test]
    fn test_iteration_is_slot_ordered() {
        let mut arena = Arena::new();
        let keys: Vec<_> = (0..5).map(|i| arena.insert(i)).collect();
        arena.remove(keys[1]);
        arena.remove(keys[3]);
        let values: Vec<_> = arena.values().copied().collect();
        assert_eq!(values, vec![0, 2, 4]);
    }

    #[test]
    fn test_drain_empties() {
        let mut arena = Arena::new();
        arena.insert(1);
        arena.insert(2);
        let drained = arena.drain();
        assert_eq!(drained.len(), 2);
        assert!(arena.is_empty());
    }
}
