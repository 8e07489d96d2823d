use std::alloc::{handle_alloc_error, Layout};
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::sync::Arc;

use crate::alloc::{Global, RawAlloc};
use crate::error::{Error, Result};
use crate::list::cursor::{Cursor, Direction};
use crate::list::methods::{DupMethod, FreeMethod, MatchMethod, Methods};
use crate::Iter;

pub mod cursor;
pub mod iterator;
pub mod methods;

mod algorithms;

/// A doubly-linked list of caller values with pluggable dup, free and match
/// methods.
///
/// Nodes are allocated through `A` one by one, and every operation that needs
/// a node reports allocation failure as [`Error::Alloc`] without modifying
/// the list. Insertion and deletion at a known node take *O*(1) time; search
/// and positional access take *O*(*n*) time.
///
/// Internally the list is cyclic: a payload-less ghost node links to the
/// first node forwards and to the last node backwards, and to itself when
/// the list is empty. The ghost is never exposed; every API that walks links
/// reports it as `None`.
///
/// # Node handles
///
/// [`add_head`], [`add_tail`], [`insert`], [`search_key`], [`index`] and the
/// [`Cursor`] hand out [`NodeRef`]s. A handle stays valid until its node is
/// deleted or the list is dropped or cleared, and moves along with the node
/// when the list is [`join`]ed into another one. Methods that take a handle
/// are `unsafe`: passing a stale handle, or one from another list, is
/// undefined behavior.
///
/// [`add_head`]: List::add_head
/// [`add_tail`]: List::add_tail
/// [`insert`]: List::insert
/// [`search_key`]: List::search_key
/// [`index`]: List::index
/// [`join`]: List::join
pub struct List<T, A: RawAlloc = Global> {
    ghost: NonNull<Ghost<T>>,
    /// the length of the list
    pub(crate) len: usize,
    pub(crate) methods: Methods<T>,
    alloc: A,
    _marker: PhantomData<Box<Node<T>>>,
}

#[repr(C)]
pub(crate) struct Node<T> {
    pub(crate) next: NonNull<Node<T>>,
    pub(crate) prev: NonNull<Node<T>>,
    pub(crate) element: T,
}

/// The ghost node: no element, but aligned like the nodes of `T`.
type Ghost<T> = Node<[T; 0]>;

/// An opaque handle to a node of a [`List`].
///
/// Handles are plain addresses: they are `Copy`, compare equal when they name
/// the same node, and do not borrow the list.
pub struct NodeRef<T> {
    ptr: NonNull<Node<T>>,
}

/// Nodes fragment detached from a list, used in joining.
///
/// When detached from a list, reading of `front.prev` and `back.next`
/// is invalid.
pub(crate) struct DetachedNodes<T> {
    pub(crate) front: NonNull<Node<T>>,
    pub(crate) back: NonNull<Node<T>>,
    pub(crate) len: usize,
}

pub(crate) unsafe fn connect<T>(prev: NonNull<Node<T>>, next: NonNull<Node<T>>) {
    (*prev.as_ptr()).next = next;
    (*next.as_ptr()).prev = prev;
}

/// Move `element` into a node whose links are not written yet.
unsafe fn write_element<T>(node: NonNull<Node<T>>, element: T) {
    ptr::addr_of_mut!((*node.as_ptr()).element).write(element)
}

/// Unwrap the result of an allocation that has no way to report failure,
/// diverging like the standard collections do.
pub(crate) fn or_alloc_failure<R>(result: Result<R>) -> R {
    result.unwrap_or_else(|err| match err {
        Error::Alloc { layout } => handle_alloc_error(layout),
        Error::Duplicate => panic!("{}", err),
    })
}

// private methods
impl<T, A: RawAlloc> List<T, A> {
    pub(crate) fn ghost_node(&self) -> NonNull<Node<T>> {
        self.ghost.cast()
    }
    pub(crate) fn front_node(&self) -> NonNull<Node<T>> {
        // SAFETY: `ghost.next` is always valid (either `ghost` itself, or the first element
        // in the list).
        unsafe { (*self.ghost_node().as_ptr()).next }
    }
    pub(crate) fn back_node(&self) -> NonNull<Node<T>> {
        // SAFETY: `ghost.prev` is always valid (either `ghost` itself, or the last element
        // in the list).
        unsafe { (*self.ghost_node().as_ptr()).prev }
    }

    /// Wrap a node of this list as a handle, mapping the ghost node to `None`.
    pub(crate) fn handle(&self, node: NonNull<Node<T>>) -> Option<NodeRef<T>> {
        if node == self.ghost_node() {
            None
        } else {
            Some(NodeRef::new(node))
        }
    }

    pub(crate) fn allocate_node(&self) -> Result<NonNull<Node<T>>> {
        Ok(self.alloc.allocate(Layout::new::<Node<T>>())?.cast())
    }

    /// Allocate a detached node holding `element`.
    ///
    /// On failure `element` is dropped and nothing else happens.
    pub(crate) fn new_node(&self, element: T) -> Result<NonNull<Node<T>>> {
        let node = self.allocate_node()?;
        // SAFETY: `node` was just allocated with the layout of `Node<T>`.
        unsafe { write_element(node, element) };
        Ok(node)
    }

    /// Release the memory of a node whose element has been moved out.
    pub(crate) unsafe fn free_node(&self, node: NonNull<Node<T>>) {
        self.alloc.deallocate(node.cast(), Layout::new::<Node<T>>())
    }

    /// Attach a single node `node` to the list, between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belongs
    /// to the list, or whether the `prev` and `next` is adjacent (only in
    /// `#[cfg(debug_assertions)]`).
    ///
    /// Both neighbors are taken as arguments, so they are read before any link
    /// is written.
    pub(crate) unsafe fn attach_node(
        &mut self,
        prev: NonNull<Node<T>>,
        next: NonNull<Node<T>>,
        node: NonNull<Node<T>>,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        connect(prev, node);
        connect(node, next);
        self.len += 1;
        #[cfg(debug_assertions)]
        {
            assert_adjacent(prev, node);
            assert_adjacent(node, next);
        }
    }

    /// Unlink a single node `node` from the list, leaving its memory and
    /// element untouched.
    ///
    /// It is unsafe because it does not check whether `node` belongs to the list.
    pub(crate) unsafe fn unlink_node(&mut self, node: NonNull<Node<T>>) {
        self.len -= 1;
        let node = node.as_ref();
        connect(node.prev, node.next);
    }

    /// Detach a single node `node` from the list, free it and return its
    /// element.
    ///
    /// It is unsafe because it does not check whether `node` belongs to the list.
    ///
    /// If the `node` does not belong to the list, this function call will make
    /// the list ill-formed.
    pub(crate) unsafe fn detach_node(&mut self, node: NonNull<Node<T>>) -> T {
        self.unlink_node(node);
        let element = ptr::read(ptr::addr_of!((*node.as_ptr()).element));
        self.free_node(node);
        element
    }

    /// Attach a range of detached nodes to the list, between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belongs
    /// to the list, or whether the `prev` and `next` is adjacent (only in
    /// `#[cfg(debug_assertions)]`).
    pub(crate) unsafe fn attach_nodes(
        &mut self,
        prev: NonNull<Node<T>>,
        next: NonNull<Node<T>>,
        detached: DetachedNodes<T>,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        connect(prev, detached.front);
        connect(detached.back, next);
        self.len += detached.len;
        #[cfg(debug_assertions)]
        {
            assert_adjacent(prev, detached.front);
            assert_adjacent(detached.back, next);
        }
    }

    /// Detach all nodes from the list, and return the detached nodes, or return
    /// `None` if the list is empty. The list is left empty and usable.
    pub(crate) fn detach_all_nodes(&mut self) -> Option<DetachedNodes<T>> {
        if self.is_empty() {
            return None;
        }
        let detached = DetachedNodes {
            front: self.front_node(),
            back: self.back_node(),
            len: std::mem::replace(&mut self.len, 0),
        };
        // SAFETY: the ghost node always belongs to the list.
        unsafe { connect(self.ghost_node(), self.ghost_node()) };
        Some(detached)
    }
}

impl<T> List<T> {
    /// Create an empty `List` backed by the global allocator.
    ///
    /// # Examples
    /// ```
    /// use hooked_list::List;
    /// let list: List<u32> = List::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        or_alloc_failure(Self::try_new())
    }

    /// Create an empty `List`, or return [`Error::Alloc`] if its header node
    /// cannot be allocated.
    #[inline]
    pub fn try_new() -> Result<Self> {
        Self::try_new_in(Global)
    }
}

impl<T, A: RawAlloc> List<T, A> {
    /// Create an empty `List` whose nodes are allocated by `alloc`.
    ///
    /// The list starts without any dup, free or match method.
    pub fn try_new_in(alloc: A) -> Result<Self> {
        let ghost: NonNull<Ghost<T>> = alloc.allocate(Layout::new::<Ghost<T>>())?.cast();
        // SAFETY: the ghost node was just allocated and is linked to itself
        // before anything reads it. It has no element to initialize.
        unsafe { connect(ghost, ghost) };
        Ok(Self {
            ghost,
            len: 0,
            methods: Methods::none(),
            alloc,
            _marker: PhantomData,
        })
    }

    /// Returns a reference to the allocator of the list.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns `true` if the `List` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front_node() == self.ghost_node()
    }

    /// Returns the length of the `List`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    ///
    /// let mut list = List::new();
    ///
    /// list.add_head(2).unwrap();
    /// assert_eq!(list.len(), 1);
    ///
    /// list.add_head(1).unwrap();
    /// list.add_tail(3).unwrap();
    /// assert_eq!(list.len(), 3);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Install the method used by [`List::duplicate`] to copy values.
    ///
    /// Returning `None` from it makes the duplication fail. Without a dup
    /// method values are shared with `Clone`.
    pub fn set_dup_method<F>(&mut self, dup: F)
    where
        F: Fn(&T) -> Option<T> + Send + Sync + 'static,
    {
        self.methods.dup = Some(Arc::new(dup));
    }

    /// Install the method receiving every value destroyed by the list, in
    /// [`List::delete`], [`List::clear`] and on drop.
    ///
    /// Without a free method destroyed values are dropped.
    pub fn set_free_method<F>(&mut self, free: F)
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.methods.free = Some(Arc::new(free));
    }

    /// Install the method used by [`List::search_key`], called with a value
    /// of the list and the key.
    ///
    /// Without a match method values are compared by [`Identity`].
    ///
    /// [`Identity`]: crate::Identity
    pub fn set_match_method<F>(&mut self, matches: F)
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.methods.matches = Some(Arc::new(matches));
    }

    /// Returns all the methods installed on the list.
    pub fn methods(&self) -> &Methods<T> {
        &self.methods
    }

    /// Replace all the methods of the list at once, for example with the
    /// methods of another list.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    ///
    /// let mut a: List<u32> = List::new();
    /// a.set_match_method(|value: &u32, key: &u32| value / 10 == key / 10);
    ///
    /// let mut b = List::new();
    /// b.set_methods(a.methods().clone());
    /// let node = b.add_tail(42).unwrap();
    /// assert_eq!(b.search_key(&40), Some(node));
    /// ```
    pub fn set_methods(&mut self, methods: Methods<T>) {
        self.methods = methods;
    }

    pub fn dup_method(&self) -> Option<&DupMethod<T>> {
        self.methods.dup.as_ref()
    }

    pub fn free_method(&self) -> Option<&FreeMethod<T>> {
        self.methods.free.as_ref()
    }

    pub fn match_method(&self) -> Option<&MatchMethod<T>> {
        self.methods.matches.as_ref()
    }

    /// Removes all elements from the `List`, handing each of them to the free
    /// method if one is installed. The list itself stays usable.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    ///
    /// let freed = Arc::new(AtomicUsize::new(0));
    /// let counter = Arc::clone(&freed);
    ///
    /// let mut list = List::new();
    /// list.set_free_method(move |_: u32| {
    ///     counter.fetch_add(1, Ordering::Relaxed);
    /// });
    /// list.add_tail(1).unwrap();
    /// list.add_tail(2).unwrap();
    ///
    /// list.clear();
    /// assert_eq!(list.len(), 0);
    /// assert_eq!(list.head(), None);
    /// assert_eq!(freed.load(Ordering::Relaxed), 2);
    /// ```
    pub fn clear(&mut self) {
        let ghost = self.ghost_node();
        let mut current = self.front_node();
        // The list is reset before any value is released, so a panicking free
        // method can only leak the remaining nodes.
        self.len = 0;
        // SAFETY: the ghost node always belongs to the list.
        unsafe { connect(ghost, ghost) };
        while current != ghost {
            // SAFETY: `current` is one of the nodes detached above, each visited once.
            let element = unsafe {
                let node = current;
                current = (*node.as_ptr()).next;
                let element = ptr::read(ptr::addr_of!((*node.as_ptr()).element));
                self.free_node(node);
                element
            };
            self.methods.release(element);
        }
    }

    /// Provides a handle to the first node, or `None` if the list is empty.
    #[inline]
    pub fn head(&self) -> Option<NodeRef<T>> {
        self.handle(self.front_node())
    }

    /// Provides a handle to the last node, or `None` if the list is empty.
    #[inline]
    pub fn tail(&self) -> Option<NodeRef<T>> {
        self.handle(self.back_node())
    }

    /// Provides a reference to the front element, or `None` if the list is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.front(), None);
    ///
    /// list.add_head(1).unwrap();
    /// assert_eq!(list.front(), Some(&1));
    /// ```
    #[inline]
    pub fn front(&self) -> Option<&T> {
        // SAFETY: a non-ghost node always holds an element.
        self.head().map(|node| unsafe { self.value(node) })
    }

    /// Provides a mutable reference to the front element, or `None` if the list
    /// is empty.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        let node = self.head()?;
        // SAFETY: a non-ghost node always holds an element.
        Some(unsafe { self.value_mut(node) })
    }

    /// Provides a reference to the back element, or `None` if the list is
    /// empty.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        // SAFETY: a non-ghost node always holds an element.
        self.tail().map(|node| unsafe { self.value(node) })
    }

    /// Provides a mutable reference to the back element, or `None` if the list
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    ///
    /// let mut list = List::new();
    /// list.add_tail(1).unwrap();
    ///
    /// if let Some(x) = list.back_mut() {
    ///     *x = 5;
    /// }
    /// assert_eq!(list.back(), Some(&5));
    /// ```
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let node = self.tail()?;
        // SAFETY: a non-ghost node always holds an element.
        Some(unsafe { self.value_mut(node) })
    }

    /// Adds an element first in the list and returns a handle to its node.
    ///
    /// If the node cannot be allocated, [`Error::Alloc`] is returned, the list
    /// is left untouched and `value` is dropped.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    ///
    /// let mut list = List::new();
    ///
    /// let two = list.add_head(2).unwrap();
    /// assert_eq!(list.head(), Some(two));
    ///
    /// list.add_head(1).unwrap();
    /// assert_eq!(list.front(), Some(&1));
    /// assert_eq!(list.tail(), Some(two));
    /// ```
    pub fn add_head(&mut self, value: T) -> Result<NodeRef<T>> {
        let node = self.new_node(value)?;
        // SAFETY: the ghost node and the front node are adjacent nodes of the list.
        unsafe { self.attach_node(self.ghost_node(), self.front_node(), node) };
        Ok(NodeRef::new(node))
    }

    /// Appends an element to the back of the list and returns a handle to its
    /// node.
    ///
    /// If the node cannot be allocated, [`Error::Alloc`] is returned, the list
    /// is left untouched and `value` is dropped.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    ///
    /// let mut list = List::new();
    /// list.add_tail(1).unwrap();
    /// let three = list.add_tail(3).unwrap();
    /// assert_eq!(list.back(), Some(&3));
    /// assert_eq!(list.tail(), Some(three));
    /// ```
    pub fn add_tail(&mut self, value: T) -> Result<NodeRef<T>> {
        let node = self.new_node(value)?;
        // SAFETY: the back node and the ghost node are adjacent nodes of the list.
        unsafe { self.attach_node(self.back_node(), self.ghost_node(), node) };
        Ok(NodeRef::new(node))
    }

    /// Inserts `value` right after `anchor` if `after` is `true`, or right
    /// before it otherwise, and returns a handle to the new node.
    ///
    /// Inserting after the tail makes the new node the tail; inserting before
    /// the head makes it the head. On allocation failure the list is left
    /// untouched and `value` is dropped.
    ///
    /// # Safety
    ///
    /// `anchor` must be a handle to a node currently in this list.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 3]);
    /// let one = list.head().unwrap();
    /// unsafe {
    ///     list.insert(one, 2, true).unwrap();
    ///     list.insert(one, 0, false).unwrap();
    /// }
    /// assert_eq!(Vec::from_iter(list), vec![0, 1, 2, 3]);
    /// ```
    pub unsafe fn insert(
        &mut self,
        anchor: NodeRef<T>,
        value: T,
        after: bool,
    ) -> Result<NodeRef<T>> {
        let node = self.new_node(value)?;
        let anchor = anchor.ptr;
        let (prev, next) = if after {
            (anchor, anchor.as_ref().next)
        } else {
            (anchor.as_ref().prev, anchor)
        };
        self.attach_node(prev, next, node);
        Ok(NodeRef::new(node))
    }

    /// Removes `node` from the list, hands its value to the free method if
    /// one is installed (or drops it), and frees the node.
    ///
    /// Deleting the node most recently returned by a [`Cursor`] keeps that
    /// cursor usable.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Safety
    ///
    /// `node` must be a handle to a node currently in this list. The handle is
    /// stale afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 2, 3]);
    /// let two = list.index(1).unwrap();
    /// unsafe { list.delete(two) };
    /// assert_eq!(Vec::from_iter(list), vec![1, 3]);
    /// ```
    pub unsafe fn delete(&mut self, node: NodeRef<T>) {
        let element = self.detach_node(node.ptr);
        self.methods.release(element);
    }

    /// Removes the first element and returns it, or `None` if the list is
    /// empty.
    ///
    /// The value is handed back to the caller, so the free method is not
    /// called.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.pop_front(), None);
    ///
    /// list.add_head(1).unwrap();
    /// list.add_head(3).unwrap();
    /// assert_eq!(list.pop_front(), Some(3));
    /// assert_eq!(list.pop_front(), Some(1));
    /// assert_eq!(list.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the front node is a real node.
        Some(unsafe { self.detach_node(self.front_node()) })
    }

    /// Removes the last element and returns it, or `None` if the list is
    /// empty.
    ///
    /// The value is handed back to the caller, so the free method is not
    /// called.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the back node is a real node.
        Some(unsafe { self.detach_node(self.back_node()) })
    }

    /// Returns a reference to the value held by `node`.
    ///
    /// # Safety
    ///
    /// `node` must be a handle to a node currently in this list.
    #[inline]
    pub unsafe fn value(&self, node: NodeRef<T>) -> &T {
        &(*node.ptr.as_ptr()).element
    }

    /// Returns a mutable reference to the value held by `node`.
    ///
    /// # Safety
    ///
    /// `node` must be a handle to a node currently in this list.
    #[inline]
    pub unsafe fn value_mut(&mut self, node: NodeRef<T>) -> &mut T {
        &mut (*node.ptr.as_ptr()).element
    }

    /// Returns the node after `node`, or `None` if `node` is the tail.
    ///
    /// # Safety
    ///
    /// `node` must be a handle to a node currently in this list.
    #[inline]
    pub unsafe fn next_node(&self, node: NodeRef<T>) -> Option<NodeRef<T>> {
        self.handle(node.ptr.as_ref().next)
    }

    /// Returns the node before `node`, or `None` if `node` is the head.
    ///
    /// # Safety
    ///
    /// `node` must be a handle to a node currently in this list.
    #[inline]
    pub unsafe fn prev_node(&self, node: NodeRef<T>) -> Option<NodeRef<T>> {
        self.handle(node.ptr.as_ref().prev)
    }

    /// Provides a cursor yielding the nodes of the list from the head
    /// ([`Direction::Forward`]) or from the tail ([`Direction::Backward`]).
    ///
    /// See [`Cursor`] for the rules of mutating the list while a cursor is
    /// in use.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::{Direction, List};
    /// use std::iter::FromIterator;
    ///
    /// let list = List::from_iter([1, 2, 3]);
    /// let mut cursor = list.cursor(Direction::Backward);
    /// let mut seen = Vec::new();
    /// while let Some(node) = unsafe { cursor.next_node() } {
    ///     seen.push(*unsafe { list.value(node) });
    /// }
    /// assert_eq!(seen, vec![3, 2, 1]);
    /// ```
    pub fn cursor(&self, direction: Direction) -> Cursor<T> {
        let start = match direction {
            Direction::Forward => self.front_node(),
            Direction::Backward => self.back_node(),
        };
        Cursor::new(self.ghost_node(), self.handle(start), direction)
    }

    /// Re-seat `cursor` on the head of this list, moving forward.
    pub fn rewind(&self, cursor: &mut Cursor<T>) {
        *cursor = self.cursor(Direction::Forward);
    }

    /// Re-seat `cursor` on the tail of this list, moving backward.
    pub fn rewind_tail(&self, cursor: &mut Cursor<T>) {
        *cursor = self.cursor(Direction::Backward);
    }

    /// Provides a forward iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooked_list::List;
    ///
    /// let mut list = List::new();
    ///
    /// list.add_tail(0).unwrap();
    /// list.add_tail(1).unwrap();
    /// list.add_tail(2).unwrap();
    ///
    /// let mut iter = list.iter();
    /// assert_eq!(iter.next(), Some(&0));
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }
}

impl<T: Debug, A: RawAlloc> Debug for List<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: RawAlloc> Drop for List<T, A> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the ghost node was allocated by `self.alloc` with this layout.
        unsafe { self.alloc.deallocate(self.ghost.cast(), Layout::new::<Ghost<T>>()) }
    }
}

unsafe impl<T: Send, A: RawAlloc + Send> Send for List<T, A> {}

unsafe impl<T: Sync, A: RawAlloc + Sync> Sync for List<T, A> {}

impl<T> NodeRef<T> {
    pub(crate) fn new(ptr: NonNull<Node<T>>) -> Self {
        Self { ptr }
    }

    pub(crate) fn as_ptr(self) -> NonNull<Node<T>> {
        self.ptr
    }
}

impl<T> Clone for NodeRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<T> {}

impl<T> PartialEq for NodeRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl<T> Eq for NodeRef<T> {}

impl<T> Hash for NodeRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ptr.hash(state)
    }
}

impl<T> Debug for NodeRef<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&self.ptr).finish()
    }
}

#[cfg(debug_assertions)]
fn assert_adjacent<T>(prev: NonNull<Node<T>>, next: NonNull<Node<T>>) {
    unsafe {
        assert_eq!((*prev.as_ptr()).next, next);
        assert_eq!((*next.as_ptr()).prev, prev);
    }
}


// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use super::tests::assert_links;
    use super::List;
    use proptest::collection::vec;
    use proptest::prelude::*;
    use std::collections::VecDeque;
    use std::iter::FromIterator;

    /// The operations applied both to a list and to a `VecDeque` model.
    #[derive(Clone, Debug)]
    enum Op {
        AddHead(u32),
        AddTail(u32),
        Insert(usize, u32, bool),
        Delete(usize),
        PopFront,
        PopBack,
        Rotate,
        Join(Vec<u32>),
        Search(u32),
    }

    fn op() -> impl Strategy<Value = Op> {
        // Small values, so that searches hit and duplicates occur.
        let value = 0u32..16;
        prop_oneof![
            2 => value.clone().prop_map(Op::AddHead),
            2 => value.clone().prop_map(Op::AddTail),
            2 => (any::<usize>(), value.clone(), any::<bool>())
                .prop_map(|(at, v, after)| Op::Insert(at, v, after)),
            2 => any::<usize>().prop_map(Op::Delete),
            1 => Just(Op::PopFront),
            1 => Just(Op::PopBack),
            1 => Just(Op::Rotate),
            1 => vec(value.clone(), 0..8).prop_map(Op::Join),
            1 => value.prop_map(Op::Search),
        ]
    }

    proptest! {
        #[test]
        fn list_follows_model(ops in vec(op(), 0..200)) {
            let mut list = List::new();
            let mut model = VecDeque::new();
            for op in ops {
                match op {
                    Op::AddHead(v) => {
                        list.add_head(v).unwrap();
                        model.push_front(v);
                    }
                    Op::AddTail(v) => {
                        list.add_tail(v).unwrap();
                        model.push_back(v);
                    }
                    Op::Insert(at, v, after) => {
                        if model.is_empty() {
                            continue;
                        }
                        let at = at % model.len();
                        let anchor = list.index(at as isize).unwrap();
                        unsafe { list.insert(anchor, v, after) }.unwrap();
                        model.insert(if after { at + 1 } else { at }, v);
                    }
                    Op::Delete(at) => {
                        if model.is_empty() {
                            continue;
                        }
                        let at = at % model.len();
                        let node = list.index(at as isize).unwrap();
                        unsafe { list.delete(node) };
                        model.remove(at);
                    }
                    Op::PopFront => prop_assert_eq!(list.pop_front(), model.pop_front()),
                    Op::PopBack => prop_assert_eq!(list.pop_back(), model.pop_back()),
                    Op::Rotate => {
                        list.rotate();
                        if let Some(v) = model.pop_back() {
                            model.push_front(v);
                        }
                    }
                    Op::Join(values) => {
                        let mut other = List::from_iter(values.iter().copied());
                        list.join(&mut other);
                        prop_assert!(other.is_empty());
                        assert_links(&other);
                        model.extend(values);
                    }
                    Op::Search(key) => {
                        let expected = model
                            .iter()
                            .position(|&v| v == key)
                            .and_then(|at| list.index(at as isize));
                        prop_assert_eq!(list.search_key(&key), expected);
                    }
                }
                assert_links(&list);
                prop_assert_eq!(list.len(), model.len());
                prop_assert!(list.iter().eq(model.iter()));
            }
        }

        #[test]
        fn index_from_both_ends(values in vec(any::<u32>(), 0..32)) {
            let list = List::from_iter(values.iter().copied());
            let len = values.len() as isize;
            for at in -len - 2..len + 2 {
                let expected = if at >= 0 && at < len {
                    Some(values[at as usize])
                } else if at < 0 && at >= -len {
                    Some(values[(len + at) as usize])
                } else {
                    None
                };
                let found = list.index(at).map(|node| unsafe { *list.value(node) });
                prop_assert_eq!(found, expected);
            }
        }

        #[test]
        fn duplicate_is_independent(values in vec(any::<u32>(), 0..32), extra in any::<u32>()) {
            let list = List::from_iter(values.iter().copied());
            let mut copy = list.duplicate().unwrap();
            prop_assert_eq!(&copy, &list);
            assert_links(&copy);

            copy.add_head(extra).unwrap();
            copy.rotate();
            if let Some(node) = copy.index(1) {
                unsafe { copy.delete(node) };
            }
            prop_assert!(list.iter().eq(values.iter()));
            assert_links(&list);
        }
    }
}
