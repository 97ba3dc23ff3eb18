//! Receivers: the values that supply the instance for a bound method or an
//! attribute accessor.

use std::fmt;
use std::ptr::NonNull;
use std::rc::Rc;
use std::sync::Arc;

use crate::bind::classify::{Direct, FormMarker, RawPointer, SmartPointer};

/// `Self` can stand in wherever a `T` is expected.
///
/// Every type upcasts to itself. Implement it for your own types to let a
/// method or attribute of `T` be called through a receiver that points at a
/// type embedding `T`.
///
/// An impl covers exactly one step. Impls do not chain: if `C` embeds `B`
/// and `B` embeds `A`, reaching `A` from a `C` receiver needs its own
/// `impl Upcast<A> for C`, usually written by upcasting twice.
///
/// ```
/// use deferred::Upcast;
///
/// struct Base { id: u32 }
/// struct Derived { base: Base, extra: u32 }
///
/// impl Upcast<Base> for Derived {
///     fn upcast(&self) -> &Base { &self.base }
///     fn upcast_mut(&mut self) -> &mut Base { &mut self.base }
/// }
///
/// struct Leaf { derived: Derived }
///
/// impl Upcast<Derived> for Leaf {
///     fn upcast(&self) -> &Derived { &self.derived }
///     fn upcast_mut(&mut self) -> &mut Derived { &mut self.derived }
/// }
///
/// // Not implied by the two impls above.
/// impl Upcast<Base> for Leaf {
///     fn upcast(&self) -> &Base { Upcast::<Base>::upcast(&self.derived) }
///     fn upcast_mut(&mut self) -> &mut Base { Upcast::<Base>::upcast_mut(&mut self.derived) }
/// }
/// # let leaf = Leaf { derived: Derived { base: Base { id: 4 }, extra: 0 } };
/// # assert_eq!(Upcast::<Base>::upcast(&leaf).id, 4);
/// # assert_eq!(Upcast::<Derived>::upcast(&leaf).extra, 0);
/// ```
pub trait Upcast<T: ?Sized> {
    fn upcast(&self) -> &T;
    fn upcast_mut(&mut self) -> &mut T;
}

impl<T: ?Sized> Upcast<T> for T {
    #[inline]
    fn upcast(&self) -> &T {
        self
    }

    #[inline]
    fn upcast_mut(&mut self) -> &mut T {
        self
    }
}

/// A value that reaches a `T`, classified by its [`Form`](Receiver::Form).
///
/// Implemented for exactly one shape per form, so a receiver type never
/// classifies two ways:
/// - direct: `&U`, `&mut U`
/// - raw pointer: [`RawPtr<U>`]
/// - smart pointer: `Box<U>`, `Rc<U>`, `Arc<U>`
///
/// where `U: Upcast<T>`. Smart pointers are held strongly for as long as the
/// receiver lives. A borrowed pointer goes through [`through`] and takes the
/// form of the pointer it borrows.
pub trait Receiver<T: ?Sized> {
    type Form: FormMarker;

    fn target(&self) -> &T;
}

/// A receiver that can also hand out unique access to its target.
///
/// Shared pointers (`Rc`, `Arc`) and shared references are deliberately not
/// `ReceiverMut`; mutate through them with interior mutability instead.
pub trait ReceiverMut<T: ?Sized>: Receiver<T> {
    fn target_mut(&mut self) -> &mut T;
}

impl<'r, T, U> Receiver<T> for &'r U
where
    T: ?Sized,
    U: ?Sized + Upcast<T>,
{
    type Form = Direct;

    #[inline]
    fn target(&self) -> &T {
        Upcast::<T>::upcast(&**self)
    }
}

impl<'r, T, U> Receiver<T> for &'r mut U
where
    T: ?Sized,
    U: ?Sized + Upcast<T>,
{
    type Form = Direct;

    #[inline]
    fn target(&self) -> &T {
        Upcast::<T>::upcast(&**self)
    }
}

impl<'r, T, U> ReceiverMut<T> for &'r mut U
where
    T: ?Sized,
    U: ?Sized + Upcast<T>,
{
    #[inline]
    fn target_mut(&mut self) -> &mut T {
        Upcast::<T>::upcast_mut(&mut **self)
    }
}

impl<T, U> Receiver<T> for Box<U>
where
    T: ?Sized,
    U: ?Sized + Upcast<T>,
{
    type Form = SmartPointer;

    #[inline]
    fn target(&self) -> &T {
        Upcast::<T>::upcast(&**self)
    }
}

impl<T, U> ReceiverMut<T> for Box<U>
where
    T: ?Sized,
    U: ?Sized + Upcast<T>,
{
    #[inline]
    fn target_mut(&mut self) -> &mut T {
        Upcast::<T>::upcast_mut(&mut **self)
    }
}

impl<T, U> Receiver<T> for Rc<U>
where
    T: ?Sized,
    U: ?Sized + Upcast<T>,
{
    type Form = SmartPointer;

    #[inline]
    fn target(&self) -> &T {
        Upcast::<T>::upcast(&**self)
    }
}

impl<T, U> Receiver<T> for Arc<U>
where
    T: ?Sized,
    U: ?Sized + Upcast<T>,
{
    type Form = SmartPointer;

    #[inline]
    fn target(&self) -> &T {
        Upcast::<T>::upcast(&**self)
    }
}

/// A borrowed pointer-shaped receiver, classified by the pointer it borrows.
///
/// `&Rc<T>` on its own is a direct receiver of an `Rc<T>`, not of a `T`.
/// Wrapping it with [`through`] strips that one level of indirection, so the
/// borrowed `Box`, `Rc`, `Arc` or [`RawPtr`] is used as the receiver and
/// keeps its own form.
///
/// ```
/// use std::rc::Rc;
/// use deferred::{ReceiverForm, invoke, method, through, wrap};
///
/// struct Counter { n: i32 }
/// impl Counter {
///     fn get(&self) -> i32 { self.n }
/// }
///
/// let shared = Rc::new(Counter { n: 2 });
/// assert_eq!(invoke(&mut method!(Counter::get), &mut (through(&shared),)), 2);
///
/// let unit = wrap(method!(Counter::get), (through(&shared),));
/// assert_eq!(unit.classification().form, Some(ReceiverForm::SmartPointer));
/// ```
///
/// Only one level is stripped: a reference to a plain value is not a
/// pointer, so it does not pass.
///
/// ```compile_fail
/// use deferred::{invoke, method, through};
///
/// struct Counter { n: i32 }
/// impl Counter {
///     fn get(&self) -> i32 { self.n }
/// }
///
/// let counter = Counter { n: 2 };
/// invoke(&mut method!(Counter::get), &mut (through(&counter),));
/// ```
pub struct PointerRef<'r, P: ?Sized>(&'r P);

/// Like [`PointerRef`], for a uniquely borrowed pointer. Built with
/// [`through_mut`].
pub struct PointerMut<'r, P: ?Sized>(&'r mut P);

/// Uses the pointer behind `pointer` as the receiver.
pub fn through<P: ?Sized>(pointer: &P) -> PointerRef<'_, P> {
    PointerRef(pointer)
}

/// Uses the pointer behind `pointer` as a receiver with unique access.
pub fn through_mut<P: ?Sized>(pointer: &mut P) -> PointerMut<'_, P> {
    PointerMut(pointer)
}

impl<T, P> Receiver<T> for PointerRef<'_, P>
where
    T: ?Sized,
    P: ?Sized + Receiver<T>,
{
    type Form = P::Form;

    #[inline]
    fn target(&self) -> &T {
        <P as Receiver<T>>::target(self.0)
    }
}

impl<T, P> Receiver<T> for PointerMut<'_, P>
where
    T: ?Sized,
    P: ?Sized + Receiver<T>,
{
    type Form = P::Form;

    #[inline]
    fn target(&self) -> &T {
        <P as Receiver<T>>::target(self.0)
    }
}

impl<T, P> ReceiverMut<T> for PointerMut<'_, P>
where
    T: ?Sized,
    P: ?Sized + ReceiverMut<T>,
{
    #[inline]
    fn target_mut(&mut self) -> &mut T {
        <P as ReceiverMut<T>>::target_mut(self.0)
    }
}

impl<P: ?Sized> fmt::Debug for PointerRef<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PointerRef")
            .field(&std::any::type_name::<P>())
            .finish()
    }
}

impl<P: ?Sized> fmt::Debug for PointerMut<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PointerMut")
            .field(&std::any::type_name::<P>())
            .finish()
    }
}

/// A non-owning, non-null pointer used as a receiver.
///
/// The pointer carries no lifetime, which is what lets a unit holding it be
/// stored and invoked later. The price is the contract on the constructors.
/// A `RawPtr` is neither `Send` nor `Sync`, and it is not `Clone`: make a
/// second one with another `unsafe` call if you really need it.
pub struct RawPtr<T: ?Sized> {
    ptr: NonNull<T>,
}

impl<T: ?Sized> RawPtr<T> {
    /// Wraps `ptr`, returning `None` when it is null.
    ///
    /// # Safety
    ///
    /// Whenever a unit holding this pointer is invoked, `ptr` must point to a
    /// live, properly aligned `T`, and no other reference to that `T` may be
    /// in use for the duration of the call.
    pub unsafe fn new(ptr: *mut T) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr })
    }

    /// Points at `target` without borrowing it.
    ///
    /// # Safety
    ///
    /// Same contract as [`RawPtr::new`]: `target` must outlive every
    /// invocation made through this pointer, and must not be accessed by
    /// other means while such an invocation runs.
    pub unsafe fn from_mut(target: &mut T) -> Self {
        Self {
            ptr: NonNull::from(target),
        }
    }

    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T: ?Sized> fmt::Debug for RawPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPtr").field(&self.ptr).finish()
    }
}

impl<T, U> Receiver<T> for RawPtr<U>
where
    T: ?Sized,
    U: ?Sized + Upcast<T>,
{
    type Form = RawPointer;

    #[inline]
    fn target(&self) -> &T {
        // SAFETY: the constructors require the pointee to be live and free of
        // conflicting references whenever the receiver is used.
        Upcast::<T>::upcast(unsafe { self.ptr.as_ref() })
    }
}

impl<T, U> ReceiverMut<T> for RawPtr<U>
where
    T: ?Sized,
    U: ?Sized + Upcast<T>,
{
    #[inline]
    fn target_mut(&mut self) -> &mut T {
        // SAFETY: as in `target`, and the constructors take a `*mut`/`&mut`, so
        // the pointer carries write permission.
        Upcast::<T>::upcast_mut(unsafe { self.ptr.as_mut() })
    }
}
