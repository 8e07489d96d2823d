use crate::list::{Node, NodeRef};
use std::fmt;
use std::ptr::NonNull;

/// The direction a [`Cursor`] walks the list in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From the head to the tail.
    Forward,
    /// From the tail to the head.
    Backward,
}

/// A detached cursor over the nodes of a [`List`].
///
/// A `Cursor` does not borrow the list. It yields one [`NodeRef`] per call
/// to [`Cursor::next_node`], in its [`Direction`], until the end of the list,
/// and can be re-seated with [`List::rewind`] or [`List::rewind_tail`].
/// Dropping it has no effect on the list.
///
/// Because it does not borrow the list, the list may be modified between
/// two calls, within one rule: the node most recently returned may be
/// deleted, and no other node may be deleted. The cursor has already read
/// the link it follows next when it returns a node. Any other mutation
/// makes the cursor stale until it is re-seated.
///
/// # Examples
///
/// Deleting the odd values while walking the list:
///
/// ```
/// use hooked_list::{Direction, List};
/// use std::iter::FromIterator;
///
/// let mut list = List::from_iter(0..6);
/// let mut cursor = list.cursor(Direction::Forward);
/// while let Some(node) = unsafe { cursor.next_node() } {
///     let odd = unsafe { *list.value(node) } % 2 == 1;
///     if odd {
///         unsafe { list.delete(node) };
///     }
/// }
/// assert_eq!(Vec::from_iter(list), vec![0, 2, 4]);
/// ```
///
/// [`List`]: crate::List
/// [`List::rewind`]: crate::List::rewind
/// [`List::rewind_tail`]: crate::List::rewind_tail
pub struct Cursor<T> {
    next: Option<NodeRef<T>>,
    ghost: NonNull<Node<T>>,
    direction: Direction,
}

impl<T> Cursor<T> {
    pub(crate) fn new(
        ghost: NonNull<Node<T>>,
        next: Option<NodeRef<T>>,
        direction: Direction,
    ) -> Self {
        Self {
            next,
            ghost,
            direction,
        }
    }

    /// Returns the direction the cursor walks in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the node the next call to [`Cursor::next_node`] would yield,
    /// without moving the cursor.
    pub fn peek(&self) -> Option<NodeRef<T>> {
        self.next
    }

    /// Return the node at the cursor and move past it, or return `None`
    /// once the whole list has been walked.
    ///
    /// # Safety
    ///
    /// Since the cursor was seated, the list it was created from must still
    /// be alive, and the only node deleted from it may be the one returned
    /// by the previous call.
    pub unsafe fn next_node(&mut self) -> Option<NodeRef<T>> {
        let current = self.next?;
        let node = current.as_ptr().as_ref();
        let link = match self.direction {
            Direction::Forward => node.next,
            Direction::Backward => node.prev,
        };
        self.next = if link == self.ghost {
            None
        } else {
            Some(NodeRef::new(link))
        };
        Some(current)
    }
}

impl<T> Clone for Cursor<T> {
    fn clone(&self) -> Self {
        Self {
            next: self.next,
            ghost: self.ghost,
            direction: self.direction,
        }
    }
}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("next", &self.next)
            .field("direction", &self.direction)
            .finish()
    }
}
