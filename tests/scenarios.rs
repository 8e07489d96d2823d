use hooked_list::{Direction, Error, Global, List, NodeRef, RawAlloc, Result};
use std::alloc::Layout;
use std::cell::Cell;
use std::iter::FromIterator;
use std::ptr::NonNull;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

/// Fails every allocation once `fail_after` of them have succeeded.
#[derive(Default)]
struct Flaky {
    served: Cell<usize>,
    fail_after: Cell<Option<usize>>,
}

unsafe impl RawAlloc for Flaky {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        if let Some(limit) = self.fail_after.get() {
            if self.served.get() >= limit {
                return Err(Error::Alloc { layout });
            }
        }
        self.served.set(self.served.get() + 1);
        Global.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        Global.deallocate(ptr, layout)
    }
}

fn walk<T: Copy, A: RawAlloc>(list: &List<T, A>, direction: Direction) -> Vec<T> {
    let mut cursor = list.cursor(direction);
    let mut values = Vec::new();
    while let Some(node) = unsafe { cursor.next_node() } {
        values.push(unsafe { *list.value(node) });
    }
    values
}

#[test]
fn add_delete_rotate_index() {
    let mut list = List::new();
    list.add_tail(1).unwrap();
    let two = list.add_tail(2).unwrap();
    list.add_tail(3).unwrap();
    assert_eq!(walk(&list, Direction::Forward), vec![1, 2, 3]);

    unsafe { list.delete(two) };
    assert_eq!(walk(&list, Direction::Forward), vec![1, 3]);
    assert_eq!(list.len(), 2);

    list.rotate();
    assert_eq!(walk(&list, Direction::Forward), vec![3, 1]);

    list.add_head(0).unwrap();
    assert_eq!(walk(&list, Direction::Forward), vec![0, 3, 1]);
    assert_eq!(walk(&list, Direction::Backward), vec![1, 3, 0]);

    let last = list.index(-1).unwrap();
    assert_eq!(unsafe { *list.value(last) }, 1);
    assert_eq!(Some(last), list.tail());
}

#[test]
fn join_two_lists() {
    let mut a = List::from_iter([1, 2]);
    let mut b = List::from_iter([3, 4]);
    a.join(&mut b);
    assert_eq!(walk(&a, Direction::Forward), vec![1, 2, 3, 4]);
    assert_eq!(a.len(), 4);
    assert_eq!(b.len(), 0);
    assert_eq!(b.head(), None);
    assert_eq!(b.tail(), None);

    b.add_head(5).unwrap();
    assert_eq!(walk(&b, Direction::Forward), vec![5]);
}

#[test]
fn join_with_custom_allocator() {
    let alloc = Flaky::default();
    let mut a = List::try_new_in(&alloc).unwrap();
    let mut b = List::try_new_in(&alloc).unwrap();
    a.add_tail('a').unwrap();
    b.add_tail('b').unwrap();
    b.add_tail('c').unwrap();
    a.join(&mut b);
    drop(b);
    assert_eq!(walk(&a, Direction::Backward), vec!['c', 'b', 'a']);
}

#[test]
fn failed_allocation_leaves_list_untouched() {
    let alloc = Flaky::default();
    let mut list = List::try_new_in(&alloc).unwrap();
    let anchor = list.add_tail(10).unwrap();
    list.add_tail(20).unwrap();
    alloc.fail_after.set(Some(alloc.served.get()));

    assert!(matches!(list.add_head(1), Err(Error::Alloc { .. })));
    assert!(matches!(list.add_tail(1), Err(Error::Alloc { .. })));
    assert!(matches!(
        unsafe { list.insert(anchor, 1, true) },
        Err(Error::Alloc { .. })
    ));
    assert!(matches!(list.duplicate(), Err(Error::Alloc { .. })));
    assert!(matches!(
        List::<u8, _>::try_new_in(&alloc),
        Err(Error::Alloc { .. })
    ));

    assert_eq!(walk(&list, Direction::Forward), vec![10, 20]);
    assert_eq!(list.head(), Some(anchor));

    // Relinking never allocates.
    list.rotate();
    let node = list.index(0).unwrap();
    unsafe { list.delete(node) };
    assert_eq!(walk(&list, Direction::Forward), vec![10]);
}

#[test]
fn values_are_released_exactly_once() {
    let freed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&freed);

    let mut list = List::new();
    list.set_free_method(move |value: u32| sink.lock().unwrap().push(value));
    for value in 1..=5 {
        list.add_tail(value).unwrap();
    }

    let mut other = List::new();
    let sink = Arc::clone(&freed);
    other.set_free_method(move |value: u32| sink.lock().unwrap().push(value + 100));
    other.add_tail(6).unwrap();

    // Joined nodes are released by the list they end up in.
    list.join(&mut other);
    drop(other);
    assert!(freed.lock().unwrap().is_empty());

    let node = list.search_key(&3).unwrap();
    unsafe { list.delete(node) };
    assert_eq!(list.pop_front(), Some(1));
    drop(list);
    assert_eq!(*freed.lock().unwrap(), vec![3, 2, 4, 5, 6]);
}

#[test]
fn duplicate_with_hooks() {
    let mut list = List::new();
    list.set_dup_method(|value: &Rc<String>| Some(Rc::new(value.to_uppercase())));
    list.set_match_method(|value: &Rc<String>, key: &Rc<String>| value == key);
    for word in ["one", "two"].iter() {
        list.add_tail(Rc::new(word.to_string())).unwrap();
    }

    let copy = list.duplicate().unwrap();
    assert_eq!(copy.len(), 2);
    assert!(copy.dup_method().is_some());
    assert!(copy.match_method().is_some());
    assert!(copy.free_method().is_none());
    let found = copy.search_key(&Rc::new(String::from("TWO")));
    assert_eq!(found, copy.tail());
    assert_eq!(list.search_key(&Rc::new(String::from("TWO"))), None);

    // Copies do not share values with the source.
    assert_eq!(Rc::strong_count(list.front().unwrap()), 1);
}

#[test]
fn identity_search_on_borrowed_values() {
    let words = vec![String::from("x"), String::from("x"), String::from("y")];
    let list = List::from_iter(words.iter());
    let second: Option<NodeRef<&String>> = list.index(1);
    assert_eq!(list.search_key(&&words[1]), second);
    assert_eq!(list.search_key(&&words[0]), list.head());
}

#[test]
fn cursor_deletes_while_walking_backward() {
    let mut list = List::from_iter(0..10);
    let mut cursor = list.cursor(Direction::Backward);
    while let Some(node) = unsafe { cursor.next_node() } {
        let even = unsafe { *list.value(node) } % 2 == 0;
        if even {
            unsafe { list.delete(node) };
        }
    }
    assert_eq!(walk(&list, Direction::Forward), vec![1, 3, 5, 7, 9]);

    list.rewind(&mut cursor);
    assert_eq!(unsafe { cursor.next_node() }, list.head());
}
