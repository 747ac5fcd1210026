//! Circular membership list with the owner as sentinel.
//!
//! Members are linked through a map keyed by handle instead of raw pointers:
//! insertion always happens right after the head, removal relinks the two
//! neighbours, and a walk from the head yields members newest first.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot<K> {
    Head,
    Member(K),
}

#[derive(Debug, Clone, Copy)]
struct Links<K> {
    prev: Slot<K>,
    next: Slot<K>,
}

#[derive(Debug, Clone)]
pub struct Ring<K> {
    head: Links<K>,
    members: HashMap<K, Links<K>>,
}

impl<K: Copy + Eq + Hash> Ring<K> {
    pub fn new() -> Self {
        Self {
            head: Links {
                prev: Slot::Head,
                next: Slot::Head,
            },
            members: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.members.contains_key(key)
    }

    /// Links `key` directly after the head. Returns false if already a member.
    pub fn push_front(&mut self, key: K) -> bool {
        if self.members.contains_key(&key) {
            return false;
        }
        let next = self.head.next;
        self.set_prev(next, Slot::Member(key));
        self.head.next = Slot::Member(key);
        self.members.insert(
            key,
            Links {
                prev: Slot::Head,
                next,
            },
        );
        true
    }

    /// Unlinks `key`. Returns false if it was not a member.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(links) = self.members.remove(key) else {
            return false;
        };
        self.set_next(links.prev, links.next);
        self.set_prev(links.next, links.prev);
        true
    }

    /// Members from most to least recently inserted.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            ring: self,
            cursor: self.head.next,
        }
    }

    fn set_prev(&mut self, slot: Slot<K>, prev: Slot<K>) {
        match slot {
            Slot::Head => self.head.prev = prev,
            Slot::Member(key) => {
                if let Some(links) = self.members.get_mut(&key) {
                    links.prev = prev;
                }
            }
        }
    }

    fn set_next(&mut self, slot: Slot<K>, next: Slot<K>) {
        match slot {
            Slot::Head => self.head.next = next,
            Slot::Member(key) => {
                if let Some(links) = self.members.get_mut(&key) {
                    links.next = next;
                }
            }
        }
    }
}

impl<K: Copy + Eq + Hash> Default for Ring<K> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Iter<'a, K> {
    ring: &'a Ring<K>,
    cursor: Slot<K>,
}

impl<K: Copy + Eq + Hash> Iterator for Iter<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        match self.cursor {
            Slot::Head => None,
            Slot::Member(key) => {
                self.cursor = self
                    .ring
                    .members
                    .get(&key)
                    .map_or(Slot::Head, |links| links.next);
                Some(key)
            }
        }
    }
}
