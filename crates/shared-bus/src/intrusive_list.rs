//! # Intrusive Linked List
//!
//! Membership registry for shared elements, identified by address.
//!
//! The list does not embed link fields in the element. Links live in an
//! arena of slots owned by the list, and an address index maps each member
//! to its slot, so `insert`, `remove` and `contains` are all O(1) while
//! iteration still walks members in insertion order.
//!
//! Each member is held through an `Arc` clone, so its address cannot be
//! reused by another allocation for as long as it stays registered.
//!
//! The list has no locking of its own. Callers serialize mutation and
//! iteration themselves (see [`crate::publisher::MessageBus`]).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

const NIL: usize = usize::MAX;

struct Link<T> {
    item: Arc<T>,
    prev: usize,
    next: usize,
}

/// Doubly-linked membership list keyed by element identity.
pub struct IntrusiveLinkedList<T> {
    slots: Vec<Option<Link<T>>>,
    free_slots: Vec<usize>,
    index: HashMap<usize, usize>,
    head: usize,
    tail: usize,
}

impl<T> IntrusiveLinkedList<T> {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_slots: Vec::new(),
            index: HashMap::new(),
            head: NIL,
            tail: NIL,
        }
    }

    fn address(item: &Arc<T>) -> usize {
        Arc::as_ptr(item) as usize
    }

    /// Append `item` at the tail.
    ///
    /// Returns `false` without touching the list if `item` is already a
    /// member.
    pub fn insert(&mut self, item: &Arc<T>) -> bool {
        let address = Self::address(item);
        if self.index.contains_key(&address) {
            return false;
        }

        let link = Link {
            item: Arc::clone(item),
            prev: self.tail,
            next: NIL,
        };
        let slot = match self.free_slots.pop() {
            Some(slot) => {
                self.slots[slot] = Some(link);
                slot
            }
            None => {
                self.slots.push(Some(link));
                self.slots.len() - 1
            }
        };

        match self.slots.get_mut(self.tail).and_then(Option::as_mut) {
            Some(tail) => tail.next = slot,
            None => self.head = slot,
        }
        self.tail = slot;
        self.index.insert(address, slot);
        true
    }

    /// Unlink `item`.
    ///
    /// Returns `false` without touching the list if `item` is not a member.
    pub fn remove(&mut self, item: &Arc<T>) -> bool {
        let Some(slot) = self.index.remove(&Self::address(item)) else {
            return false;
        };
        let Some(link) = self.slots[slot].take() else {
            return false;
        };

        match self.slots.get_mut(link.prev).and_then(Option::as_mut) {
            Some(prev) => prev.next = link.next,
            None => self.head = link.next,
        }
        match self.slots.get_mut(link.next).and_then(Option::as_mut) {
            Some(next) => next.prev = link.prev,
            None => self.tail = link.prev,
        }
        self.free_slots.push(slot);
        true
    }

    /// Whether `item` is currently a member.
    #[must_use]
    pub fn contains(&self, item: &Arc<T>) -> bool {
        self.index.contains_key(&Self::address(item))
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the list has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterate members in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }
}

impl<T> Default for IntrusiveLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for IntrusiveLinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntrusiveLinkedList")
            .field("len", &self.len())
            .finish()
    }
}

/// Forward iterator over an [`IntrusiveLinkedList`].
pub struct Iter<'a, T> {
    list: &'a IntrusiveLinkedList<T>,
    cursor: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a Arc<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.list.slots.get(self.cursor)?.as_ref()?;
        self.cursor = link.next;
        Some(&link.item)
    }
}

impl<'a, T> IntoIterator for &'a IntrusiveLinkedList<T> {
    type Item = &'a Arc<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
