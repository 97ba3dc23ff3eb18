//! The deferred invocation unit and its builders.

use std::any::type_name;
use std::fmt;

use crate::bind::classify::{Classification, FormMarker, KindMarker, PointerShaped, classify};
use crate::bind::dispatch::{self, Callable};
use crate::bind::error::{Error, Result};

/// A callable packaged with everything it needs to run later.
///
/// A `Deferred` owns its callable and its argument tuple. It has exactly one
/// owner: it is not `Clone`, and moving it hands the whole call over, which
/// is what makes it safe to pass through a queue to a worker thread.
///
/// Invoking does not consume the unit. Clone slots and references replay on
/// every call; single-use parts ([`Moved`](crate::Moved),
/// [`Once`](crate::Once)) are spent by the first call.
pub struct Deferred<F, A> {
    callable: F,
    args: A,
}

// Manual Debug implementation - works regardless of whether F or A implement Debug
impl<F, A> fmt::Debug for Deferred<F, A>
where
    F: Callable<A>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("callable", &type_name::<F>())
            .field("args", &type_name::<A>())
            .field("classification", &classify::<F, A>())
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl<F, A> Deferred<F, A>
where
    F: Callable<A>,
{
    /// Runs the bound call.
    ///
    /// Whatever the callable returns, including its own `Result`, comes back
    /// untouched.
    ///
    /// # Panics
    ///
    /// Panics if a single-use callable or argument was spent by an earlier
    /// call. Use [`try_invoke`](Self::try_invoke) when that can happen.
    #[inline]
    pub fn invoke(&mut self) -> F::Output<'_> {
        dispatch::invoke(&mut self.callable, &mut self.args)
    }

    /// Like [`invoke`](Self::invoke), but reports a spent unit instead of
    /// panicking.
    pub fn try_invoke(&mut self) -> Result<F::Output<'_>> {
        if !self.is_ready() {
            let callable = type_name::<F>();
            tracing::warn!(callable, "deferred call invoked after being spent");
            return Err(Error::Spent { callable });
        }
        Ok(self.invoke())
    }

    /// Whether every single-use part is still in place.
    pub fn is_ready(&self) -> bool {
        Callable::is_ready(&self.callable, &self.args)
    }

    pub fn classification(&self) -> Classification {
        classify::<F, A>()
    }

    pub fn callable(&self) -> &F {
        &self.callable
    }

    pub fn args(&self) -> &A {
        &self.args
    }

    /// Takes the unit apart without invoking it.
    pub fn into_parts(self) -> (F, A) {
        (self.callable, self.args)
    }
}

/// Packages `callable` and `args` into a [`Deferred`].
///
/// `args` is a tuple. For a bound method or attribute accessor its first
/// element is the receiver, which must be pointer-shaped (`RawPtr`, `Box`,
/// `Rc`, `Arc`); a plain reference is rejected at compile time:
///
/// ```compile_fail
/// use deferred::{method, wrap};
///
/// struct Counter { n: i32 }
/// impl Counter {
///     fn get(&self) -> i32 { self.n }
/// }
///
/// let counter = Counter { n: 1 };
/// let unit = wrap(method!(Counter::get), (&counter,));
/// ```
///
/// The same goes for unique references and for attribute accessors:
///
/// ```compile_fail
/// use deferred::{method_mut, wrap};
///
/// struct Counter { n: i32 }
/// impl Counter {
///     fn bump(&mut self) -> i32 { self.n += 1; self.n }
/// }
///
/// let mut counter = Counter { n: 1 };
/// let unit = wrap(method_mut!(Counter::bump), (&mut counter,));
/// ```
///
/// ```compile_fail
/// use deferred::{attribute, wrap};
///
/// struct Counter { n: i32 }
///
/// let counter = Counter { n: 1 };
/// let unit = wrap(attribute!(Counter::n), (&counter,));
/// ```
///
/// Use [`invoke`](crate::invoke) to dispatch on a reference immediately.
///
/// ```
/// use std::rc::Rc;
/// use deferred::{method, wrap};
///
/// struct Counter { n: i32 }
/// impl Counter {
///     fn get(&self) -> i32 { self.n }
/// }
///
/// fn add(a: i32, b: i32) -> i32 { a + b }
///
/// assert_eq!(wrap(add, (2, 3)).invoke(), 5);
///
/// let mut unit = wrap(method!(Counter::get), (Rc::new(Counter { n: 8 }),));
/// assert_eq!(unit.invoke(), 8);
/// ```
pub fn wrap<F, A>(callable: F, args: A) -> Deferred<F, A>
where
    F: Callable<A>,
    <F as Callable<A>>::Form: PointerShaped,
{
    tracing::debug!(
        callable = type_name::<F>(),
        kind = <F::Kind as KindMarker>::KIND.as_str(),
        form = <F::Form as FormMarker>::FORM.map(|form| form.as_str()),
        "wrapped deferred call"
    );
    Deferred { callable, args }
}

/// Same as [`wrap`], with the unit placed behind a `Box` owned by the caller.
///
/// It applies the same receiver check:
///
/// ```compile_fail
/// use deferred::{method, wrap_boxed};
///
/// struct Counter { n: i32 }
/// impl Counter {
///     fn get(&self) -> i32 { self.n }
/// }
///
/// let counter = Counter { n: 1 };
/// let unit = wrap_boxed(method!(Counter::get), (&counter,));
/// ```
pub fn wrap_boxed<F, A>(callable: F, args: A) -> Box<Deferred<F, A>>
where
    F: Callable<A>,
    <F as Callable<A>>::Form: PointerShaped,
{
    Box::new(wrap(callable, args))
}
