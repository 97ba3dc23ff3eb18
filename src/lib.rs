//! Deferred invocation units: a callable packaged with its receiver and
//! arguments, ready to be queued and run later by a worker.
//!
//! The callable can be a closure or fn item, a bound method
//! ([`method!`], [`method_mut!`]) or an attribute accessor ([`attribute!`],
//! [`attribute_mut!`], `#[derive(Attributes)]`). Which dispatch strategy
//! applies, and how the receiver is reached (directly, through a [`RawPtr`],
//! or through `Box`/`Rc`/`Arc`), is decided by trait resolution when the unit
//! is built, never at run time.
//!
//! ```
//! use std::sync::Arc;
//! use deferred::{method, wrap};
//!
//! struct Counter { n: i32 }
//! impl Counter {
//!     fn get(&self) -> i32 { self.n }
//! }
//!
//! let counter = Arc::new(Counter { n: 5 });
//! let mut unit = wrap(method!(Counter::get), (counter,));
//! assert_eq!(unit.invoke(), 5);
//! ```
//!
//! Key modules:
//! - `bind::classify`: callable kinds, receiver forms and the builder precondition.
//! - `bind::dispatch`: the `Callable` trait and the low-level `invoke`.
//! - `bind::wrapper`: `Deferred`, `wrap` and `wrap_boxed`.
//! - `bind::task`: the erased `Task` a scheduler consumes.

extern crate self as deferred;

pub mod bind;

pub use bind::*;

#[cfg(feature = "derive")]
pub use deferred_macros::Attributes;
