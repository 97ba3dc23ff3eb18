//! Static classification of callables and their receivers.
//!
//! Every [`Callable`] names a kind marker and a form marker as associated
//! types. The markers carry the runtime-describable [`CallableKind`] and
//! [`ReceiverForm`] values, so picking a dispatch strategy never needs a
//! runtime tag: the impl that matches the argument tuple *is* the strategy.

use std::fmt;

use crate::bind::dispatch::Callable;

/// The three shapes a callable reference can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallableKind {
    /// A closure, fn item or anything else with call syntax.
    Free,
    /// A method of an owning type, detached from any instance.
    Method,
    /// A field of an owning type, detached from any instance.
    Attribute,
}

impl CallableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Method => "method",
            Self::Attribute => "attribute",
        }
    }
}

/// How a member callable reaches its receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverForm {
    /// `&U` or `&mut U`.
    Direct,
    /// A [`RawPtr`](crate::RawPtr).
    RawPointer,
    /// `Box<U>`, `Rc<U>` or `Arc<U>`.
    SmartPointer,
}

impl ReceiverForm {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::RawPointer => "raw-pointer",
            Self::SmartPointer => "smart-pointer",
        }
    }

    /// Whether reaching the target goes through one level of indirection.
    pub fn is_pointer(self) -> bool {
        !matches!(self, Self::Direct)
    }
}

/// The resolved shape of a callable bound to a particular argument tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Classification {
    pub kind: CallableKind,
    /// `None` for free callables, which take no receiver.
    pub form: Option<ReceiverForm>,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.form {
            Some(form) => write!(f, "{} via {}", self.kind.as_str(), form.as_str()),
            None => f.write_str(self.kind.as_str()),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Type-level [`CallableKind`].
pub trait KindMarker: sealed::Sealed {
    const KIND: CallableKind;
}

/// Type-level receiver form. Free callables use [`NoReceiver`].
pub trait FormMarker: sealed::Sealed {
    const FORM: Option<ReceiverForm>;
}

/// Receiver forms the builders accept.
///
/// Direct receivers are left out: a unit outlives the statement that built it,
/// so the builders insist on a receiver that is already an indirection.
#[diagnostic::on_unimplemented(
    message = "a bound method or attribute accessor can only be wrapped with a pointer-shaped receiver",
    label = "`{Self}` receivers are rejected by the builders",
    note = "pass the receiver as `RawPtr`, `Box`, `Rc` or `Arc`, or call `deferred::invoke` to dispatch on a reference"
)]
pub trait PointerShaped: FormMarker {}

/// Kind marker for closures and fn items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FreeCallable {}

/// Kind marker for [`Method`](crate::Method) and [`MethodMut`](crate::MethodMut).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundMethod {}

/// Kind marker for [`Attribute`](crate::Attribute) and [`AttributeMut`](crate::AttributeMut).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeAccessor {}

/// Form marker for callables without a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoReceiver {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direct {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawPointer {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmartPointer {}

impl sealed::Sealed for FreeCallable {}
impl sealed::Sealed for BoundMethod {}
impl sealed::Sealed for AttributeAccessor {}
impl sealed::Sealed for NoReceiver {}
impl sealed::Sealed for Direct {}
impl sealed::Sealed for RawPointer {}
impl sealed::Sealed for SmartPointer {}

impl KindMarker for FreeCallable {
    const KIND: CallableKind = CallableKind::Free;
}

impl KindMarker for BoundMethod {
    const KIND: CallableKind = CallableKind::Method;
}

impl KindMarker for AttributeAccessor {
    const KIND: CallableKind = CallableKind::Attribute;
}

impl FormMarker for NoReceiver {
    const FORM: Option<ReceiverForm> = None;
}

impl FormMarker for Direct {
    const FORM: Option<ReceiverForm> = Some(ReceiverForm::Direct);
}

impl FormMarker for RawPointer {
    const FORM: Option<ReceiverForm> = Some(ReceiverForm::RawPointer);
}

impl FormMarker for SmartPointer {
    const FORM: Option<ReceiverForm> = Some(ReceiverForm::SmartPointer);
}

impl PointerShaped for NoReceiver {}
impl PointerShaped for RawPointer {}
impl PointerShaped for SmartPointer {}

/// Resolves the classification of `F` called with `A`.
///
/// Purely type-driven: nothing is constructed and nothing is called.
pub fn classify<F, A>() -> Classification
where
    F: Callable<A>,
{
    Classification {
        kind: <F::Kind as KindMarker>::KIND,
        form: <F::Form as FormMarker>::FORM,
    }
}
