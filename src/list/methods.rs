//! Value hooks of a [`List`].
//!
//! The list never looks inside the values it holds. Copying, releasing and
//! comparing them is delegated to three optional hooks, each of which can be
//! installed or replaced at any time:
//!
//! - the *dup* method, used by [`List::duplicate`] to deep-copy a value;
//! - the *free* method, which receives every value the list destroys;
//! - the *match* method, used by [`List::search_key`] to compare a value
//!   with a key.
//!
//! [`List`]: crate::List
//! [`List::duplicate`]: crate::List::duplicate
//! [`List::search_key`]: crate::List::search_key

use std::fmt;
use std::ptr::NonNull;
use std::rc::Rc;
use std::sync::Arc;

/// Deep-copies a value, or returns `None` if it cannot.
pub type DupMethod<T> = Arc<dyn Fn(&T) -> Option<T> + Send + Sync>;

/// Releases a value destroyed by the list.
pub type FreeMethod<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Tests whether a value (first argument) matches a key (second argument).
pub type MatchMethod<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// The set of hooks installed on a list.
pub struct Methods<T> {
    pub(crate) dup: Option<DupMethod<T>>,
    pub(crate) free: Option<FreeMethod<T>>,
    pub(crate) matches: Option<MatchMethod<T>>,
}

impl<T> Methods<T> {
    pub(crate) const fn none() -> Self {
        Self {
            dup: None,
            free: None,
            matches: None,
        }
    }

    /// Hand a value over to the free method, or drop it if none is set.
    pub(crate) fn release(&self, value: T) {
        match &self.free {
            Some(free) => free(value),
            None => drop(value),
        }
    }

    /// Copy a value with the dup method, or with `fallback` if none is set.
    ///
    /// `None` means the copy failed.
    pub(crate) fn duplicate_or<F>(&self, value: &T, fallback: &F) -> Option<T>
    where
        F: Fn(&T) -> Option<T>,
    {
        match &self.dup {
            Some(dup) => dup(value),
            None => fallback(value),
        }
    }

    pub(crate) fn is_match_or<F>(&self, value: &T, key: &T, fallback: &F) -> bool
    where
        F: Fn(&T, &T) -> bool,
    {
        match &self.matches {
            Some(matches) => matches(value, key),
            None => fallback(value, key),
        }
    }
}

impl<T> Clone for Methods<T> {
    fn clone(&self) -> Self {
        Self {
            dup: self.dup.clone(),
            free: self.free.clone(),
            matches: self.matches.clone(),
        }
    }
}

impl<T> Default for Methods<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> fmt::Debug for Methods<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Methods")
            .field("dup", &self.dup.is_some())
            .field("free", &self.free.is_some())
            .field("matches", &self.matches.is_some())
            .finish()
    }
}

/// Reference identity, the comparison [`List::search_key`] falls back to
/// when no match method is installed.
///
/// For pointer-like values two values are the same when they point to the
/// same place, regardless of what they point to. Integers, `char` and
/// `bool` stored directly in a list are their own identity.
///
/// # Examples
///
/// ```
/// use hooked_list::Identity;
/// use std::rc::Rc;
///
/// let a = Rc::new(String::from("a"));
/// let b = Rc::new(String::from("a"));
/// assert!(a.same_as(&Rc::clone(&a)));
/// assert!(!a.same_as(&b));
/// ```
///
/// [`List::search_key`]: crate::List::search_key
pub trait Identity {
    fn same_as(&self, other: &Self) -> bool;
}

impl<'a, T: ?Sized> Identity for &'a T {
    fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(*self, *other)
    }
}

impl<'a, T: ?Sized> Identity for &'a mut T {
    fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(&**self, &**other)
    }
}

impl<T: ?Sized> Identity for *const T {
    fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(*self, *other)
    }
}

impl<T: ?Sized> Identity for *mut T {
    fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(*self, *other)
    }
}

impl<T: ?Sized> Identity for NonNull<T> {
    fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(self.as_ptr(), other.as_ptr())
    }
}

impl<T: ?Sized> Identity for Box<T> {
    fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(&**self, &**other)
    }
}

impl<T: ?Sized> Identity for Rc<T> {
    fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Identity for Arc<T> {
    fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

macro_rules! impl_identity_by_value {
    ($($T:ty),* $(,)?) => {
        $(
            impl Identity for $T {
                fn same_as(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_identity_by_value!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char, bool);
