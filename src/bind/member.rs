//! Callable references to members of an owning type: bound methods and
//! attribute accessors.
//!
//! Neither holds an instance. The instance is the first element of the
//! argument tuple and is reached through a [`Receiver`](crate::Receiver).

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

/// A method of `T` that only needs `&T`.
///
/// Build it with [`method!`](crate::method), which names `T` for you:
/// `method!(Counter::get)`.
pub struct Method<T: ?Sized, M> {
    pub(crate) method: M,
    _owner: PhantomData<fn(&T)>,
}

impl<T: ?Sized, M> Method<T, M> {
    pub const fn new(method: M) -> Self {
        Self {
            method,
            _owner: PhantomData,
        }
    }
}

/// A method of `T` that needs `&mut T`.
///
/// Only receivers with unique access (`&mut T`, `Box<T>`, `RawPtr<T>`) can
/// drive it. Build it with [`method_mut!`](crate::method_mut).
pub struct MethodMut<T: ?Sized, M> {
    pub(crate) method: M,
    _owner: PhantomData<fn(&mut T)>,
}

impl<T: ?Sized, M> MethodMut<T, M> {
    pub const fn new(method: M) -> Self {
        Self {
            method,
            _owner: PhantomData,
        }
    }
}

/// Read access to a field `V` of `T`.
///
/// Calling it yields `&V` borrowed from the receiver, so interior-mutable
/// fields (`Cell`, `RefCell`, atomics) can be changed through the result.
pub struct Attribute<T: ?Sized, V: ?Sized> {
    get: fn(&T) -> &V,
}

impl<T: ?Sized, V: ?Sized> Attribute<T, V> {
    pub const fn new(get: fn(&T) -> &V) -> Self {
        Self { get }
    }

    #[inline]
    pub fn get<'t>(&self, target: &'t T) -> &'t V {
        (self.get)(target)
    }
}

/// Write access to a field `V` of `T`, yielding `&mut V`.
pub struct AttributeMut<T: ?Sized, V: ?Sized> {
    get_mut: fn(&mut T) -> &mut V,
}

impl<T: ?Sized, V: ?Sized> AttributeMut<T, V> {
    pub const fn new(get_mut: fn(&mut T) -> &mut V) -> Self {
        Self { get_mut }
    }

    #[inline]
    pub fn get_mut<'t>(&self, target: &'t mut T) -> &'t mut V {
        (self.get_mut)(target)
    }
}

impl<T: ?Sized, V: ?Sized> Clone for Attribute<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized, V: ?Sized> Copy for Attribute<T, V> {}

impl<T: ?Sized, V: ?Sized> Clone for AttributeMut<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized, V: ?Sized> Copy for AttributeMut<T, V> {}

impl<T: ?Sized, M> fmt::Debug for Method<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("owner", &type_name::<T>())
            .field("method", &type_name::<M>())
            .finish()
    }
}

impl<T: ?Sized, M> fmt::Debug for MethodMut<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodMut")
            .field("owner", &type_name::<T>())
            .field("method", &type_name::<M>())
            .finish()
    }
}

impl<T: ?Sized, V: ?Sized> fmt::Debug for Attribute<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("owner", &type_name::<T>())
            .field("value", &type_name::<V>())
            .finish()
    }
}

impl<T: ?Sized, V: ?Sized> fmt::Debug for AttributeMut<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeMut")
            .field("owner", &type_name::<T>())
            .field("value", &type_name::<V>())
            .finish()
    }
}

/// Names a `&self` method as a [`Method`]: `method!(Counter::get)`.
///
/// Use `method!(<Type>::name)` for owners that are not a bare identifier,
/// such as generic types.
#[macro_export]
macro_rules! method {
    ($owner:ident :: $name:ident) => {
        $crate::Method::<$owner, _>::new($owner::$name)
    };
    (<$owner:ty>::$name:ident) => {
        $crate::Method::<$owner, _>::new(<$owner>::$name)
    };
}

/// Names a `&mut self` method as a [`MethodMut`].
#[macro_export]
macro_rules! method_mut {
    ($owner:ident :: $name:ident) => {
        $crate::MethodMut::<$owner, _>::new($owner::$name)
    };
    (<$owner:ty>::$name:ident) => {
        $crate::MethodMut::<$owner, _>::new(<$owner>::$name)
    };
}

/// Names a field as an [`Attribute`]: `attribute!(Counter::n)`.
///
/// Tuple struct fields work too: `attribute!(Pair::0)`.
#[macro_export]
macro_rules! attribute {
    ($owner:ident :: $field:tt) => {
        $crate::Attribute::<$owner, _>::new(|this| &this.$field)
    };
    (<$owner:ty>::$field:tt) => {
        $crate::Attribute::<$owner, _>::new(|this| &this.$field)
    };
}

/// Names a field as an [`AttributeMut`].
#[macro_export]
macro_rules! attribute_mut {
    ($owner:ident :: $field:tt) => {
        $crate::AttributeMut::<$owner, _>::new(|this| &mut this.$field)
    };
    (<$owner:ty>::$field:tt) => {
        $crate::AttributeMut::<$owner, _>::new(|this| &mut this.$field)
    };
}

#[cfg(test)]
mod tests {
    struct Pair(u8, String);

    struct Tagged<T> {
        tag: T,
    }

    impl<T: Copy> Tagged<T> {
        fn tag(&self) -> T {
            self.tag
        }

        fn retag(&mut self, tag: T) {
            self.tag = tag;
        }
    }

    #[test]
    fn attributes_read_and_write_fields() {
        let mut pair = Pair(1, String::from("one"));
        let first = attribute!(Pair::0);
        let second = attribute_mut!(Pair::1);

        assert_eq!(*first.get(&pair), 1);
        second.get_mut(&mut pair).push_str("+1");
        assert_eq!(pair.1, "one+1");

        let copied = first;
        assert_eq!(*copied.get(&pair), *first.get(&pair));
    }

    #[test]
    fn generic_owners_go_through_the_angle_bracket_form() {
        type CharTag = Tagged<char>;

        let mut tagged = Tagged { tag: 'a' };
        let read = method!(<CharTag>::tag);
        let write = method_mut!(CharTag::retag);
        (write.method)(&mut tagged, 'b');
        assert_eq!((read.method)(&tagged), 'b');
        assert_eq!(*attribute!(<CharTag>::tag).get(&tagged), 'b');
    }

    #[test]
    fn debug_names_the_owner() {
        let rendered = format!("{:?}", attribute!(Pair::1));
        assert!(rendered.contains("Pair"));
        assert!(rendered.contains("String"));
    }
}
