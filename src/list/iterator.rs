//! Borrowing and owning iterators over the values of a [`List`].

use crate::alloc::{Global, RawAlloc};
use crate::list::{or_alloc_failure, List, NodeRef};
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::marker::PhantomData;

/// A double-ended iterator over the values of a [`List`], from the head.
///
/// It holds the two nodes not yet yielded at each end and the number of
/// values left between them, so it stops once both ends have met and never
/// reaches the ghost node.
pub struct Iter<'a, T> {
    front: NodeRef<T>,
    back: NodeRef<T>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new<A: RawAlloc>(list: &'a List<T, A>) -> Self {
        Self {
            front: NodeRef::new(list.front_node()),
            back: NodeRef::new(list.back_node()),
            remaining: list.len(),
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            front: self.front,
            back: self.back,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        // SAFETY: `front` is one of the `remaining + 1` nodes still to visit,
        // all alive while the list is borrowed.
        let node = unsafe { &*self.front.as_ptr().as_ptr() };
        self.front = NodeRef::new(node.next);
        Some(&node.element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        // SAFETY: as in `next`, from the other end.
        let node = unsafe { &*self.back.as_ptr().as_ptr() };
        self.back = NodeRef::new(node.prev);
        Some(&node.element)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

unsafe impl<T: Sync> Send for Iter<'_, T> {}

unsafe impl<T: Sync> Sync for Iter<'_, T> {}

/// An owning iterator over the values of a [`List`].
///
/// Values are moved out to the caller, so the free method of the list is not
/// called on them. Whatever is left when the iterator is dropped is released
/// as usual.
pub struct IntoIter<T, A: RawAlloc = Global> {
    list: List<T, A>,
}

impl<T: fmt::Debug, A: RawAlloc> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}

impl<T, A: RawAlloc> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }
}

impl<T, A: RawAlloc> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T, A: RawAlloc> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: RawAlloc> FusedIterator for IntoIter<T, A> {}

impl<T, A: RawAlloc> IntoIterator for List<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter { list: self }
    }
}

impl<'a, T, A: RawAlloc> IntoIterator for &'a List<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new();
        list.extend(iter);
        list
    }
}

/// Appends every item at the tail. Running out of memory aborts, like the
/// standard collections; use [`List::add_tail`] to handle it instead.
impl<T, A: RawAlloc> Extend<T> for List<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            or_alloc_failure(self.add_tail(item));
        }
    }
}
