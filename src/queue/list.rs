//! Handle-based intrusive ordered list over a slab arena
//!
//! Each queue is a doubly linked list whose prev/next links live inside the
//! arena entries themselves, so linking and unlinking never allocate. The
//! list stores handles (`GroupKey`) rather than pointers; the arena owns all
//! entry storage, the list only relinks.
//!
//! Operations are O(1) for tail insertion and for removal at any position,
//! which is what the pairing scan relies on when it pulls two nodes
//! discovered during a single reverse traversal.

use slab::Slab;

/// Handle to an arena entry
pub type GroupKey = usize;

/// Intrusive prev/next links embedded in each arena entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Links {
    prev: Option<GroupKey>,
    next: Option<GroupKey>,
}

/// Arena entry: a value plus its list linkage
///
/// An entry is linked into at most one queue at a time; a detached entry
/// has both links cleared.
#[derive(Debug)]
pub struct Entry<T> {
    pub value: T,
    links: Links,
}

impl<T> Entry<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            links: Links::default(),
        }
    }

    /// Handle of the entry linked before this one (toward the head)
    pub fn prev(&self) -> Option<GroupKey> {
        self.links.prev
    }

    /// Handle of the entry linked after this one (toward the tail)
    pub fn next(&self) -> Option<GroupKey> {
        self.links.next
    }
}

/// One ordered queue of arena entries
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueList {
    head: Option<GroupKey>,
    tail: Option<GroupKey>,
    len: usize,
}

impl QueueList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Oldest entry (insertion order)
    pub fn head(&self) -> Option<GroupKey> {
        self.head
    }

    /// Most recently inserted entry
    pub fn tail(&self) -> Option<GroupKey> {
        self.tail
    }

    /// Link a detached entry at the tail, O(1)
    pub fn push_tail<T>(&mut self, arena: &mut Slab<Entry<T>>, key: GroupKey) {
        debug_assert_eq!(arena[key].links, Links::default());
        let old_tail = self.tail;
        arena[key].links = Links {
            prev: old_tail,
            next: None,
        };
        match old_tail {
            Some(t) => arena[t].links.next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
        self.len += 1;
    }

    /// Unlink an entry from any position, O(1)
    ///
    /// The entry must currently be linked into this queue. Its links are
    /// cleared so it can be relinked elsewhere or removed from the arena.
    pub fn unlink<T>(&mut self, arena: &mut Slab<Entry<T>>, key: GroupKey) {
        let Links { prev, next } = arena[key].links;
        match prev {
            Some(p) => arena[p].links.next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => arena[n].links.prev = prev,
            None => self.tail = prev,
        }
        arena[key].links = Links::default();
        self.len -= 1;
    }

    /// Iterate from tail toward head
    pub fn iter_rev<'a, T>(&self, arena: &'a Slab<Entry<T>>) -> RevIter<'a, T> {
        RevIter {
            arena,
            cursor: self.tail,
        }
    }
}

/// Reverse (tail-to-head) iterator over a queue
pub struct RevIter<'a, T> {
    arena: &'a Slab<Entry<T>>,
    cursor: Option<GroupKey>,
}

impl<'a, T> Iterator for RevIter<'a, T> {
    type Item = (GroupKey, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        let entry = &self.arena[key];
        self.cursor = entry.links.prev;
        Some((key, &entry.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(values: &[u32]) -> (Slab<Entry<u32>>, QueueList, Vec<GroupKey>) {
        let mut arena = Slab::new();
        let mut list = QueueList::new();
        let mut keys = Vec::new();
        for &v in values {
            let key = arena.insert(Entry::new(v));
            list.push_tail(&mut arena, key);
            keys.push(key);
        }
        (arena, list, keys)
    }

    fn collect_rev(list: &QueueList, arena: &Slab<Entry<u32>>) -> Vec<u32> {
        list.iter_rev(arena).map(|(_, v)| *v).collect()
    }

    #[test]
    fn test_push_tail_ordering() {
        let (arena, list, _) = setup(&[1, 2, 3]);
        assert_eq!(list.len(), 3);
        assert_eq!(collect_rev(&list, &arena), vec![3, 2, 1]);
    }

    #[test]
    fn test_empty_list() {
        let arena: Slab<Entry<u32>> = Slab::new();
        let list = QueueList::new();
        assert!(list.is_empty());
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
        assert_eq!(collect_rev(&list, &arena), Vec::<u32>::new());
    }

    #[test]
    fn test_unlink_middle() {
        let (mut arena, mut list, keys) = setup(&[1, 2, 3]);
        list.unlink(&mut arena, keys[1]);
        assert_eq!(collect_rev(&list, &arena), vec![3, 1]);
        assert_eq!(arena[keys[1]].prev(), None);
        assert_eq!(arena[keys[1]].next(), None);
    }

    #[test]
    fn test_unlink_head_and_tail() {
        let (mut arena, mut list, keys) = setup(&[1, 2, 3]);
        list.unlink(&mut arena, keys[0]);
        assert_eq!(list.head(), Some(keys[1]));
        list.unlink(&mut arena, keys[2]);
        assert_eq!(list.tail(), Some(keys[1]));
        assert_eq!(collect_rev(&list, &arena), vec![2]);
    }

    #[test]
    fn test_unlink_last_entry_empties_list() {
        let (mut arena, mut list, keys) = setup(&[7]);
        list.unlink(&mut arena, keys[0]);
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.tail(), None);
    }

    #[test]
    fn test_relink_after_unlink() {
        let (mut arena, mut list, keys) = setup(&[1, 2]);
        list.unlink(&mut arena, keys[0]);
        list.push_tail(&mut arena, keys[0]);
        assert_eq!(collect_rev(&list, &arena), vec![1, 2]);
    }

    #[test]
    fn test_two_removals_during_one_traversal() {
        // The pairing scan unlinks two nodes found in a single reverse pass
        let (mut arena, mut list, _) = setup(&[1, 2, 3, 4]);
        let found: Vec<GroupKey> = list
            .iter_rev(&arena)
            .filter(|(_, v)| **v % 2 == 0)
            .map(|(k, _)| k)
            .collect();
        assert_eq!(found.len(), 2);
        for key in found {
            list.unlink(&mut arena, key);
        }
        assert_eq!(collect_rev(&list, &arena), vec![3, 1]);
    }
}
