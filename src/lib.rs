//! This crate provides a generic doubly-linked list of caller values, whose
//! copying, releasing and comparing of values is delegated to hooks installed
//! on the list.
//!
//! The [`List`] allows adding, inserting and deleting nodes at a known
//! position in constant time, rotating the tail to the head and joining two
//! lists in constant time. Searching and positional access take *O*(*n*) time.
//!
//! Here is a quick example showing how the list works.
//!
//! ```
//! use hooked_list::List;
//! use std::iter::FromIterator;
//!
//! let mut list = List::from_iter([1, 2, 3, 4]);
//!
//! let two = list.index(1).unwrap();
//! unsafe { list.insert(two, 5, true) }.unwrap(); // [1, 2, 5, 3, 4]
//! list.rotate(); // [4, 1, 2, 5, 3]
//!
//! let mut other = List::from_iter([6, 7]);
//! list.join(&mut other);
//! assert!(other.is_empty());
//! assert_eq!(Vec::from_iter(list), vec![4, 1, 2, 5, 3, 6, 7]);
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the list is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                     (Ghost) Node N  │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢     Node 2, 3, ...     ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        ├───────────┤
//! │  ║ payload T ║           ║ payload T ║                        ┊No payload ┊
//! │  ╚═══════════╝           ╚═══════════╝                        └╌╌╌╌╌╌╌╌╌╌╌┘
//! │      Node 0                  Node 1                               ↑   ↑
//! └───────────────────────────────────────────────────────────────────┘   │
//! ╔═══════════╗                                                           │
//! ║   ghost   ║ ──────────────────────────────────────────────────────────┘
//! ╟───────────╢
//! ║    len    ║
//! ╟───────────╢
//! ║  methods  ║
//! ╟───────────╢
//! ║   alloc   ║
//! ╚═══════════╝
//!     List
//! ```
//! The `List` contains:
//! - a pointer `ghost` that points to the ghost node;
//! - the length `len` of the list;
//! - the dup, free and match [`Methods`];
//! - the [`RawAlloc`] every node is allocated from.
//!
//! As elements are added to the list, `ghost.next` points to the head, and
//! `ghost.prev` points to the tail of the list. The ghost node never leaves
//! the list: [`List::head`], [`List::tail`], [`List::next_node`] and
//! [`List::prev_node`] report it as `None`.
//!
//! # Hooks
//!
//! The list never looks inside its values. A dup method copies values for
//! [`List::duplicate`], a free method receives every value the list destroys,
//! and a match method compares values with a key in [`List::search_key`].
//! Without them, values are cloned, dropped and compared by [`Identity`].
//!
//! ```
//! use hooked_list::List;
//! use std::rc::Rc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let released = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&released);
//!
//! let mut list = List::new();
//! list.set_dup_method(|s: &Rc<String>| Some(Rc::new(s.repeat(2))));
//! list.set_free_method(move |_: Rc<String>| {
//!     counter.fetch_add(1, Ordering::Relaxed);
//! });
//! list.set_match_method(|value: &Rc<String>, key: &Rc<String>| value == key);
//!
//! list.add_tail(Rc::new(String::from("ab"))).unwrap();
//! let copy = list.duplicate().unwrap();
//! assert_eq!(copy.front().map(|s| s.as_str()), Some("abab"));
//! assert!(copy.search_key(&Rc::new(String::from("abab"))).is_some());
//!
//! drop(copy);
//! drop(list);
//! assert_eq!(released.load(Ordering::Relaxed), 2);
//! ```
//!
//! # Cursors
//!
//! A [`Cursor`] walks the nodes of a list in one [`Direction`] without
//! borrowing it, so the node it has just returned can be deleted before the
//! cursor moves on.
//!
//! ```
//! use hooked_list::{Direction, List};
//! use std::iter::FromIterator;
//!
//! let mut list = List::from_iter(1..=6);
//! let mut cursor = list.cursor(Direction::Backward);
//! while let Some(node) = unsafe { cursor.next_node() } {
//!     let value = unsafe { *list.value(node) };
//!     if value % 3 == 0 {
//!         unsafe { list.delete(node) };
//!     }
//! }
//! assert_eq!(Vec::from_iter(list), vec![1, 2, 4, 5]);
//! ```
//!
//! # Iteration
//!
//! The borrowing [`Iter`] and the owning [`IntoIter`] are double-ended, fused
//! and non-cyclic, like the iterators of the standard collections. Values
//! moved out by [`IntoIter`] are not handed to the free method.
//!
//! [`List`]: crate::List
//! [`Iter`]: crate::Iter
//! [`IntoIter`]: crate::IntoIter
//! [`Cursor`]: crate::Cursor
//! [`Direction`]: crate::Direction
//! [`Methods`]: crate::Methods
//! [`RawAlloc`]: crate::RawAlloc
//! [`Identity`]: crate::Identity

#[doc(inline)]
pub use crate::alloc::{Global, RawAlloc};
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use list::cursor::{Cursor, Direction};
#[doc(inline)]
pub use list::iterator::{IntoIter, Iter};
#[doc(inline)]
pub use list::methods::{DupMethod, FreeMethod, Identity, MatchMethod, Methods};
#[doc(inline)]
pub use list::{List, NodeRef};

pub mod alloc;
pub mod error;
pub mod list;
