//! Argument slots and how they are replayed into a call.
//!
//! A unit stores its arguments as owned slots. Each slot remembers, through
//! its type, how the original value was passed:
//!
//! - any `Clone` value is handed over as a fresh transient copy on every
//!   invocation, so repeated calls see the value that was bound;
//! - a shared reference (`&T`) is itself `Clone` and replays as the same alias;
//! - [`Ref<T>`] and [`RefMut<T>`] own their value and lend it out as `&T` or
//!   `&mut T` for the duration of each call, so changes made through a
//!   `RefMut` are seen by the next call;
//! - [`Alias<T>`] holds a caller's `&mut T` and reborrows it for every call;
//! - [`Moved<T>`] is single-use: the bound value itself is moved into the
//!   first call. This is how non-duplicable values reach callables that take
//!   them by value.

use std::any::type_name;
use std::fmt;

/// A stored argument that can be turned back into a call argument.
///
/// `Value` may borrow from the slot, which is how owned slots lend their
/// contents to callables taking `&T` or `&mut T`.
pub trait Replay {
    /// What the callable receives for this slot.
    type Value<'a>
    where
        Self: 'a;

    fn replay<'a>(&'a mut self) -> Self::Value<'a>;

    /// `false` once a single-use slot has been spent.
    fn is_ready(&self) -> bool {
        true
    }
}

// Impls bound `Value` by the lent type only. Callables take
// `for<'a> FnMut(Value<'a>)`, where a `Self: 'a` clause means `Self: 'static`.

impl<T: Clone> Replay for T {
    type Value<'a>
        = T
    where
        Self: 'a;

    #[inline]
    fn replay(&mut self) -> T {
        self.clone()
    }
}

/// An owned argument lent to the callable as `&T` on every invocation.
pub struct Ref<T: ?Sized>(T);

impl<T> Ref<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: ?Sized> Ref<T> {
    pub fn get(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> Replay for Ref<T> {
    type Value<'a>
        = &'a T
    where
        T: 'a;

    #[inline]
    fn replay<'a>(&'a mut self) -> &'a T {
        &self.0
    }
}

/// An owned argument lent to the callable as `&mut T` on every invocation.
///
/// The value stays in the slot between calls, so each call sees what the
/// previous one left behind.
pub struct RefMut<T: ?Sized>(T);

impl<T> RefMut<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: ?Sized> RefMut<T> {
    pub fn get(&self) -> &T {
        &self.0
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: ?Sized> Replay for RefMut<T> {
    type Value<'a>
        = &'a mut T
    where
        T: 'a;

    #[inline]
    fn replay<'a>(&'a mut self) -> &'a mut T {
        &mut self.0
    }
}

/// A caller's `&mut T`, reborrowed for every invocation.
///
/// `&mut T` cannot be a slot on its own: it is not `Clone`, and a plain
/// impl for it would overlap with the one for `Clone` types.
pub struct Alias<'r, T: ?Sized>(&'r mut T);

impl<'r, T: ?Sized> Alias<'r, T> {
    pub fn new(target: &'r mut T) -> Self {
        Self(target)
    }

    pub fn into_inner(self) -> &'r mut T {
        self.0
    }
}

impl<T: ?Sized> Replay for Alias<'_, T> {
    type Value<'a>
        = &'a mut T
    where
        Self: 'a;

    #[inline]
    fn replay<'a>(&'a mut self) -> &'a mut T {
        &mut *self.0
    }
}

/// Shorthand for [`Ref::new`].
pub fn by_ref<T>(value: T) -> Ref<T> {
    Ref::new(value)
}

/// Shorthand for [`RefMut::new`].
pub fn by_mut<T>(value: T) -> RefMut<T> {
    RefMut::new(value)
}

/// Shorthand for [`Alias::new`].
pub fn alias<T: ?Sized>(target: &mut T) -> Alias<'_, T> {
    Alias::new(target)
}

/// A single-use argument, moved into the callable on the first invocation.
///
/// # Panics
///
/// Replaying a spent slot panics. Units that may be invoked more than once
/// should check [`Deferred::is_ready`](crate::Deferred::is_ready) or use
/// [`Deferred::try_invoke`](crate::Deferred::try_invoke).
pub struct Moved<T>(Option<T>);

impl<T> Moved<T> {
    pub fn new(value: T) -> Self {
        Self(Some(value))
    }

    /// Takes the value back out without invoking anything.
    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T> fmt::Debug for Moved<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Moved")
            .field("value_type", &type_name::<T>())
            .field("spent", &self.0.is_none())
            .finish()
    }
}

impl<T> Replay for Moved<T> {
    type Value<'a>
        = T
    where
        Self: 'a;

    fn replay(&mut self) -> T {
        match self.0.take() {
            Some(value) => value,
            None => panic!(
                "moved argument of type `{}` was already consumed by an earlier invocation",
                type_name::<T>()
            ),
        }
    }

    fn is_ready(&self) -> bool {
        self.0.is_some()
    }
}

/// Shorthand for [`Moved::new`].
pub fn moved<T>(value: T) -> Moved<T> {
    Moved::new(value)
}

/// A free callable that is moved out and consumed by its first invocation.
///
/// Lets an `FnOnce` closure, typically one that owns non-duplicable state,
/// be wrapped like any other callable.
///
/// # Panics
///
/// Invoking it a second time panics, like replaying a spent [`Moved`] slot.
pub struct Once<F>(Option<F>);

impl<F> Once<F> {
    pub fn new(callable: F) -> Self {
        Self(Some(callable))
    }

    pub(crate) fn take(&mut self) -> F {
        match self.0.take() {
            Some(callable) => callable,
            None => panic!(
                "single-use callable `{}` was already consumed by an earlier invocation",
                type_name::<F>()
            ),
        }
    }

    pub(crate) fn is_spent(&self) -> bool {
        self.0.is_none()
    }
}

impl<F> fmt::Debug for Once<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Once")
            .field("callable", &type_name::<F>())
            .field("spent", &self.is_spent())
            .finish()
    }
}

/// Shorthand for [`Once::new`].
pub fn once<F>(callable: F) -> Once<F> {
    Once::new(callable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn clone_slots_replay_fresh_copies() {
        let mut slot = String::from("bound");
        let mut first = slot.replay();
        first.push_str(" and changed");
        assert_eq!(slot.replay(), "bound");
        assert!(slot.is_ready());
    }

    #[test]
    fn reference_slots_alias_the_original() {
        let shared = Rc::new(5);
        let mut slot = &shared;
        let replayed = slot.replay();
        assert!(Rc::ptr_eq(replayed, &shared));
    }

    #[test]
    fn lent_slots_keep_their_value_between_calls() {
        let mut slot = by_mut(Vec::new());
        slot.replay().push(1);
        slot.replay().push(2);
        assert_eq!(slot.get(), &[1, 2]);

        let mut shared = by_ref(String::from("kept"));
        let first: *const String = shared.replay();
        let second: *const String = shared.replay();
        assert_eq!(first, second);
        assert_eq!(shared.into_inner(), "kept");
    }

    #[test]
    fn aliases_write_through_to_the_caller() {
        let mut log = vec!["start"];
        {
            let mut slot = alias(&mut log);
            slot.replay().push("first");
            slot.replay().push("second");
        }
        assert_eq!(log, ["start", "first", "second"]);
    }

    #[test]
    fn moved_slots_are_single_use() {
        let mut slot = moved(Box::new(11));
        assert!(slot.is_ready());
        assert_eq!(*slot.replay(), 11);
        assert!(!slot.is_ready());
        assert!(slot.into_inner().is_none());
    }

    #[test]
    #[should_panic(expected = "already consumed")]
    fn replaying_a_spent_slot_panics() {
        let mut slot = moved(vec![1, 2, 3]);
        let _ = slot.replay();
        let _ = slot.replay();
    }

    #[test]
    fn once_hands_out_its_callable_one_time() {
        let owned = String::from("payload");
        let mut callable = once(move || owned);
        assert!(!callable.is_spent());
        assert_eq!((callable.take())(), "payload");
        assert!(callable.is_spent());
        assert!(format!("{callable:?}").contains("spent: true"));
    }
}
