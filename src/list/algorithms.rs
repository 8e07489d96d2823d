use crate::alloc::RawAlloc;
use crate::error::{Error, Result};
use crate::list::cursor::Direction;
use crate::list::methods::Identity;
use crate::list::{write_element, List, NodeRef};
use std::hash::{Hash, Hasher};

impl<T: PartialEq, A: RawAlloc> PartialEq for List<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other)
    }
}

impl<T: Eq, A: RawAlloc> Eq for List<T, A> {}

impl<T: Hash, A: RawAlloc> Hash for List<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T, A: RawAlloc> List<T, A> {
    /// Build a copy of the list, with the same dup, free and match methods.
    ///
    /// Each value is copied with the dup method, or shared with `Clone` if
    /// none is installed (for reference-like values such as `Rc<_>` or
    /// `&_` this is a shallow copy). The copy has the same order as `self`.
    ///
    /// If a node cannot be allocated, [`Error::Alloc`] is returned; if the
    /// dup method fails, [`Error::Duplicate`] is returned. In both cases the
    /// partial copy is dropped, handing the values already copied into it to
    /// the free method. `self` is never modified.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::{Error, List};
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter(vec![String::from("a"), String::from("b")]);
    /// list.set_dup_method(|s: &String| Some(s.to_uppercase()));
    ///
    /// let copy = list.duplicate().unwrap();
    /// assert_eq!(Vec::from_iter(copy), vec!["A", "B"]);
    ///
    /// list.set_dup_method(|s: &String| if s == "b" { None } else { Some(s.clone()) });
    /// assert_eq!(list.duplicate().unwrap_err(), Error::Duplicate);
    /// assert_eq!(list.len(), 2);
    /// ```
    pub fn duplicate(&self) -> Result<List<T, A>>
    where
        T: Clone,
        A: Clone,
    {
        self.duplicate_with(|value: &T| Some(value.clone()))
    }

    /// Build a copy of the list like [`List::duplicate`], copying values with
    /// `fallback` when no dup method is installed.
    ///
    /// `T` needs no `Clone` here: with a dup method installed, `fallback` is
    /// never called. Returning `None` from `fallback` fails the copy with
    /// [`Error::Duplicate`], as a failing dup method does.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::{Error, List};
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Ticket(u32);
    ///
    /// let mut list = List::new();
    /// list.add_tail(Ticket(1)).unwrap();
    /// assert_eq!(list.duplicate_with(|_| None).unwrap_err(), Error::Duplicate);
    ///
    /// list.set_dup_method(|t: &Ticket| Some(Ticket(t.0 + 100)));
    /// let copy = list.duplicate_with(|_| None).unwrap();
    /// assert_eq!(copy.front(), Some(&Ticket(101)));
    /// ```
    pub fn duplicate_with<F>(&self, fallback: F) -> Result<List<T, A>>
    where
        F: Fn(&T) -> Option<T>,
        A: Clone,
    {
        let mut copy = List::try_new_in(self.alloc.clone())?;
        copy.methods = self.methods.clone();
        for value in self {
            // Allocate first, so a failing dup method never leaves a copied
            // value without a node to hold it.
            let node = copy.allocate_node()?;
            match self.methods.duplicate_or(value, &fallback) {
                Some(value) => unsafe {
                    write_element(node, value);
                    copy.attach_node(copy.back_node(), copy.ghost_node(), node);
                },
                None => {
                    // SAFETY: `node` was allocated by `copy` and holds no element.
                    unsafe { copy.free_node(node) };
                    return Err(Error::Duplicate);
                }
            }
        }
        Ok(copy)
    }

    /// Returns the first node, from the head, whose value matches `key`, or
    /// `None` if there is none.
    ///
    /// Values are compared with the match method if one is installed,
    /// called as `match(value, key)`. Otherwise they are compared by
    /// [`Identity`]: for pointer-like values this is address equality, not
    /// equality of what they point to.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    /// use std::rc::Rc;
    ///
    /// let (a, b) = (Rc::new("x"), Rc::new("x"));
    /// let mut list = List::new();
    /// list.add_tail(Rc::clone(&a)).unwrap();
    /// let node = list.add_tail(Rc::clone(&b)).unwrap();
    ///
    /// // Equal values, but only `b` itself is found.
    /// assert_eq!(list.search_key(&b), Some(node));
    /// assert_eq!(list.search_key(&Rc::new("x")), None);
    ///
    /// list.set_match_method(|value: &Rc<&str>, key: &Rc<&str>| value == key);
    /// assert_eq!(list.search_key(&Rc::new("x")), list.head());
    /// ```
    pub fn search_key(&self, key: &T) -> Option<NodeRef<T>>
    where
        T: Identity,
    {
        self.search_key_with(key, T::same_as)
    }

    /// Returns the first node, from the head, whose value matches `key` like
    /// [`List::search_key`], comparing with `fallback` when no match method is
    /// installed.
    ///
    /// `T` needs no [`Identity`] here, so values without one can be searched
    /// through the match method.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter(vec![String::from("a"), String::from("B")]);
    /// let key = String::from("b");
    /// assert_eq!(list.search_key_with(&key, |value, key| value == key), None);
    ///
    /// list.set_match_method(|value: &String, key: &String| value.eq_ignore_ascii_case(key));
    /// assert_eq!(list.search_key_with(&key, |_, _| false), list.tail());
    /// ```
    pub fn search_key_with<F>(&self, key: &T, fallback: F) -> Option<NodeRef<T>>
    where
        F: Fn(&T, &T) -> bool,
    {
        let mut cursor = self.cursor(Direction::Forward);
        // SAFETY: the list is borrowed during the whole search, so every
        // node the cursor reaches stays alive.
        while let Some(node) = unsafe { cursor.next_node() } {
            if self.methods.is_match_or(unsafe { self.value(node) }, key, &fallback) {
                return Some(node);
            }
        }
        None
    }

    /// Returns the node at the zero-based `index`, or `None` if it is out of
    /// bounds.
    ///
    /// Non-negative indices count from the head (`0` is the head); negative
    /// indices count from the tail (`-1` is the tail, `-2` the node before
    /// it, and so on). The list is walked from whichever end is nearer.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let list = List::from_iter([1, 2, 3]);
    /// assert_eq!(list.index(0), list.head());
    /// assert_eq!(list.index(-1), list.tail());
    /// assert_eq!(unsafe { list.value(list.index(-2).unwrap()) }, &2);
    /// assert_eq!(list.index(3), None);
    /// assert_eq!(list.index(-4), None);
    /// ```
    pub fn index(&self, index: isize) -> Option<NodeRef<T>> {
        let (steps, from_back) = if index < 0 {
            ((-(index + 1)) as usize, true)
        } else {
            (index as usize, false)
        };
        if steps >= self.len {
            return None;
        }
        let (steps, from_back) = if steps > self.len / 2 {
            (self.len - 1 - steps, !from_back)
        } else {
            (steps, from_back)
        };
        let mut node = if from_back {
            self.back_node()
        } else {
            self.front_node()
        };
        for _ in 0..steps {
            // SAFETY: `steps < len`, so the walk never goes past the ghost node.
            node = unsafe {
                if from_back {
                    node.as_ref().prev
                } else {
                    node.as_ref().next
                }
            };
        }
        self.handle(node)
    }

    /// Move the tail node to the head. Lists of zero or one element are left
    /// as they are.
    ///
    /// No node is allocated or freed, so handles stay valid.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 2, 3]);
    /// let three = list.tail().unwrap();
    /// list.rotate();
    /// assert_eq!(list.head(), Some(three));
    /// assert_eq!(Vec::from_iter(list), vec![3, 1, 2]);
    /// ```
    pub fn rotate(&mut self) {
        if self.len <= 1 {
            return;
        }
        let back = self.back_node();
        // SAFETY: the list has at least two nodes, so `back` is a real node,
        // and after unlinking it the ghost and front nodes are adjacent.
        unsafe {
            self.unlink_node(back);
            self.attach_node(self.ghost_node(), self.front_node(), back);
        }
    }

    /// Moves all nodes from `other` to the end of the list.
    ///
    /// This reuses all the nodes from `other` and moves them into `self`, so
    /// handles to them stay valid and now belong to `self`. After this
    /// operation, `other` is empty and can be used again.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list1 = List::from_iter(['a']);
    /// let mut list2 = List::from_iter(['b', 'c']);
    ///
    /// list1.join(&mut list2);
    ///
    /// let mut iter = list1.iter();
    /// assert_eq!(iter.next(), Some(&'a'));
    /// assert_eq!(iter.next(), Some(&'b'));
    /// assert_eq!(iter.next(), Some(&'c'));
    /// assert!(iter.next().is_none());
    ///
    /// assert!(list2.is_empty());
    /// assert_eq!(list2.head(), None);
    /// ```
    pub fn join(&mut self, other: &mut Self) {
        if let Some(detached) = other.detach_all_nodes() {
            // `self.back_node()` and `self.ghost_node()` are valid
            // nodes in the list and they are adjacent, so it is safe.
            unsafe { self.attach_nodes(self.back_node(), self.ghost_node(), detached) }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::alloc::tests::Budget;
    use crate::error::Error;
    use crate::list::tests::assert_links;
    use crate::List;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use std::iter::FromIterator;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};

    fn values<T: Clone, A: crate::RawAlloc>(list: &List<T, A>) -> Vec<T> {
        list.iter().cloned().collect()
    }

    #[test]
    fn list_duplicate_shares_values() {
        let shared = Rc::new(5);
        let list = List::from_iter(vec![Rc::clone(&shared), Rc::new(6)]);
        let copy = list.duplicate().unwrap();
        assert_eq!(copy, list);
        assert_eq!(Rc::strong_count(&shared), 3);
        assert!(Rc::ptr_eq(copy.front().unwrap(), &shared));
        assert_links(&copy);
    }

    #[test]
    fn list_duplicate_is_independent() {
        let mut list = List::from_iter(0..4);
        list.set_match_method(|a: &i32, b: &i32| a == b);
        let mut copy = list.duplicate().unwrap();
        assert!(copy.match_method().is_some());
        copy.rotate();
        copy.add_tail(9).unwrap();
        unsafe { copy.delete(copy.head().unwrap()) };
        assert_eq!(values(&list), vec![0, 1, 2, 3]);
        assert_eq!(values(&copy), vec![0, 1, 2, 9]);
        assert_links(&list);
        assert_links(&copy);
    }

    #[test]
    fn list_duplicate_failure_releases_copies() {
        let freed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&freed);
        let mut list = List::from_iter(1..=4);
        list.set_dup_method(|v: &i32| if *v == 3 { None } else { Some(v * 100) });
        list.set_free_method(move |v: i32| sink.lock().unwrap().push(v));

        assert_eq!(list.duplicate().unwrap_err(), Error::Duplicate);
        assert_eq!(*freed.lock().unwrap(), vec![100, 200]);
        assert_eq!(values(&list), vec![1, 2, 3, 4]);
        assert_links(&list);
    }

    #[test]
    fn list_duplicate_without_memory() {
        let freed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&freed);
        let budget = Budget::new(4);
        let mut list = List::try_new_in(&budget).unwrap();
        list.set_dup_method(|v: &u32| Some(v + 10));
        list.set_free_method(move |v: u32| sink.lock().unwrap().push(v));
        for i in 0..3 {
            list.add_tail(i).unwrap();
        }

        // Nothing left for the header of the copy.
        assert!(matches!(list.duplicate(), Err(Error::Alloc { .. })));
        assert!(freed.lock().unwrap().is_empty());

        // Header and one node, then the second node fails.
        budget.refill(2);
        assert!(matches!(list.duplicate(), Err(Error::Alloc { .. })));
        assert_eq!(*freed.lock().unwrap(), vec![10]);
        assert_eq!(values(&list), vec![0, 1, 2]);

        budget.refill(4);
        let copy = list.duplicate().unwrap();
        assert_eq!(values(&copy), vec![10, 11, 12]);
    }

    #[test]
    fn list_search_key() {
        let mut list = List::from_iter([3u32, 1, 4, 1, 5]);
        let second = list.index(1);
        assert_eq!(list.search_key(&1), second);
        assert_eq!(list.search_key(&9), None);

        list.set_match_method(|value: &u32, key: &u32| value % 2 == key % 2 && value > key);
        assert_eq!(list.search_key(&2), list.index(2));
        assert_eq!(list.search_key(&3), list.index(4));
        assert_eq!(list.search_key(&5), None);

        let empty = List::<u32>::new();
        assert_eq!(empty.search_key(&1), None);
    }

    #[test]
    fn list_duplicate_without_clone() {
        #[derive(Debug, PartialEq)]
        struct Handle(u32);

        let mut list = List::new();
        for i in 0..3 {
            list.add_tail(Handle(i)).unwrap();
        }
        assert_eq!(list.duplicate_with(|_| None).unwrap_err(), Error::Duplicate);

        list.set_dup_method(|h: &Handle| Some(Handle(h.0 * 2)));
        let copy = list.duplicate_with(|_| unreachable!()).unwrap();
        assert_eq!(copy.iter().map(|h| h.0).collect::<Vec<_>>(), vec![0, 2, 4]);
        assert_eq!(list.iter().map(|h| h.0).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_links(&copy);
    }

    #[test]
    fn list_search_key_without_identity() {
        let mut list = List::new();
        for word in ["apple", "Berry", "cherry"].iter() {
            list.add_tail(word.to_string()).unwrap();
        }
        let key = String::from("berry");
        assert_eq!(list.search_key_with(&key, |value, key| value == key), None);

        list.set_match_method(|value: &String, key: &String| value.eq_ignore_ascii_case(key));
        let found = list.search_key_with(&key, |_, _| unreachable!());
        assert_eq!(found, list.index(1));
        assert_eq!(list.search_key_with(&String::from("kiwi"), |_, _| true), None);
    }

    #[test]
    fn list_search_key_by_identity() {
        let (a, b, c) = (String::from("same"), String::from("same"), String::from("same"));
        let mut list = List::new();
        list.add_tail(&a).unwrap();
        let node_b = list.add_tail(&b).unwrap();
        assert_eq!(list.search_key(&&b), Some(node_b));
        assert_eq!(list.search_key(&&c), None);
    }

    #[test]
    fn list_index() {
        let list = List::from_iter(0..7);
        for i in 0..7isize {
            let node = list.index(i).unwrap();
            assert_eq!(unsafe { *list.value(node) }, i as i32);
            assert_eq!(list.index(i - 7), Some(node));
        }
        assert_eq!(list.index(0), list.head());
        assert_eq!(list.index(-1), list.tail());
        assert_eq!(list.index(7), None);
        assert_eq!(list.index(-8), None);
        assert_eq!(list.index(isize::MAX), None);
        assert_eq!(list.index(isize::MIN), None);

        let empty = List::<i32>::new();
        assert_eq!(empty.index(0), None);
        assert_eq!(empty.index(-1), None);
    }

    #[test]
    fn list_rotate() {
        let mut list = List::<i32>::new();
        list.rotate();
        assert!(list.is_empty());

        list.add_tail(1).unwrap();
        list.rotate();
        assert_eq!(values(&list), vec![1]);
        assert_links(&list);

        list.extend(2..=4);
        let nodes: Vec<_> = (0..4).map(|i| list.index(i).unwrap()).collect();
        list.rotate();
        assert_eq!(values(&list), vec![4, 1, 2, 3]);
        assert_eq!(list.head(), Some(nodes[3]));
        assert_eq!(list.tail(), Some(nodes[2]));
        assert_links(&list);
        for _ in 0..3 {
            list.rotate();
        }
        assert_eq!(values(&list), vec![1, 2, 3, 4]);
        assert_links(&list);
    }

    #[test]
    fn list_join() {
        fn test_list_join<I1, I2>(list: I1, other: I2)
        where
            I1: IntoIterator<Item = i32> + Clone,
            I2: IntoIterator<Item = i32> + Clone,
        {
            let mut a = List::from_iter(list.clone());
            let mut b = List::from_iter(other.clone());
            let expected: Vec<i32> = list.into_iter().chain(other).collect();
            let old_b_tail = b.tail();

            a.join(&mut b);
            assert_eq!(values(&a), expected);
            assert_eq!(a.len(), expected.len());
            assert!(b.is_empty());
            assert_eq!(b.head(), None);
            assert_eq!(b.tail(), None);
            if old_b_tail.is_some() {
                assert_eq!(a.tail(), old_b_tail);
            }
            assert_links(&a);
            assert_links(&b);

            b.add_tail(42).unwrap();
            assert_eq!(values(&b), vec![42]);
            assert_links(&b);
        }
        test_list_join(0..2, 2..4);
        test_list_join(0..2, None);
        test_list_join(None, 0..2);
        test_list_join(None, None);
        test_list_join(Some(0), Some(1));
    }

    #[test]
    fn list_join_moves_handles() {
        let mut a = List::from_iter([1, 2]);
        let mut b = List::new();
        let three = b.add_tail(3).unwrap();
        a.join(&mut b);
        assert_eq!(a.tail(), Some(three));
        unsafe { a.delete(three) };
        assert_eq!(values(&a), vec![1, 2]);
        assert_links(&a);
    }

    #[test]
    fn list_eq_and_hash() {
        fn hash_of<T: Hash>(value: &T) -> u64 {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            hasher.finish()
        }
        let a = List::from_iter(0..3);
        let b = List::from_iter(0..3);
        let c = List::from_iter(0..4);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(hash_of(&a), hash_of(&b));
    }
}
