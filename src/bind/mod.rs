pub mod classify;
pub mod dispatch;
pub mod error;
pub mod member;
pub mod receiver;
pub mod replay;
pub mod task;
pub mod wrapper;

pub use classify::{CallableKind, Classification, PointerShaped, ReceiverForm, classify};
pub use dispatch::{Callable, invoke};
pub use error::{Error, Result};
pub use member::{Attribute, AttributeMut, Method, MethodMut};
pub use receiver::{PointerMut, PointerRef, RawPtr, Receiver, ReceiverMut, Upcast, through, through_mut};
pub use replay::{Alias, Moved, Once, Ref, RefMut, Replay, alias, by_mut, by_ref, moved, once};
pub use task::{BoxedTask, Task};
pub use wrapper::{Deferred, wrap, wrap_boxed};
