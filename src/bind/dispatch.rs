//! The dispatcher: one [`Callable`] impl per callable shape and arity.
//!
//! Arguments travel as tuples. For free callables every element is a
//! [`Replay`] slot; for bound methods and attribute accessors the first
//! element is the [`Receiver`] and the rest are slots. Because the impls are
//! disjoint by construction, the strategy is fixed at the call site and the
//! call itself does no classification at all.

use crate::bind::classify::{AttributeAccessor, BoundMethod, FormMarker, FreeCallable, KindMarker, NoReceiver};
use crate::bind::member::{Attribute, AttributeMut, Method, MethodMut};
use crate::bind::receiver::{Receiver, ReceiverMut};
use crate::bind::replay::{Once, Replay};

/// Something that can be called with the argument tuple `Args`.
///
/// `Output` may borrow from the callable and the arguments for the duration
/// of the call, which is how attribute accessors hand back an alias into the
/// receiver they were bound to.
pub trait Callable<Args> {
    type Kind: KindMarker;
    type Form: FormMarker;
    type Output<'a>
    where
        Self: 'a,
        Args: 'a;

    fn call<'a>(&'a mut self, args: &'a mut Args) -> Self::Output<'a>;

    /// Whether a call would find every single-use part still in place.
    fn is_ready(&self, args: &Args) -> bool;
}

/// Dispatches `callable` on `args` right away.
///
/// This is the low-level entry point. Unlike the builders it accepts direct
/// receivers (`&T`, `&mut T`), since nothing outlives the call.
///
/// ```
/// use deferred::{invoke, method};
///
/// struct Counter { n: i32 }
/// impl Counter {
///     fn get(&self) -> i32 { self.n }
/// }
///
/// let counter = Counter { n: 3 };
/// assert_eq!(invoke(&mut method!(Counter::get), &mut (&counter,)), 3);
/// assert_eq!(invoke(&mut |a: i32, b: i32| a + b, &mut (2, 3)), 5);
/// ```
#[inline]
pub fn invoke<'a, F, A>(callable: &'a mut F, args: &'a mut A) -> F::Output<'a>
where
    F: Callable<A>,
{
    callable.call(args)
}

macro_rules! free_callable {
    ($($arg:ident),*) => {
        impl<Func, Ret, $($arg),*> Callable<($($arg,)*)> for Func
        where
            Func: for<'v> FnMut($($arg::Value<'v>),*) -> Ret,
            $($arg: Replay,)*
        {
            type Kind = FreeCallable;
            type Form = NoReceiver;
            type Output<'a> = Ret
            where
                Self: 'a,
                ($($arg,)*): 'a;

            #[allow(non_snake_case)]
            #[inline]
            fn call<'a>(&'a mut self, args: &'a mut ($($arg,)*)) -> Ret {
                let ($($arg,)*) = args;
                (*self)($(Replay::replay($arg)),*)
            }

            #[allow(non_snake_case)]
            fn is_ready(&self, args: &($($arg,)*)) -> bool {
                let ($($arg,)*) = args;
                true $(&& Replay::is_ready($arg))*
            }
        }

        impl<Func, Ret, $($arg),*> Callable<($($arg,)*)> for Once<Func>
        where
            Func: for<'v> FnOnce($($arg::Value<'v>),*) -> Ret,
            $($arg: Replay,)*
        {
            type Kind = FreeCallable;
            type Form = NoReceiver;
            type Output<'a> = Ret
            where
                Self: 'a,
                ($($arg,)*): 'a;

            #[allow(non_snake_case)]
            fn call<'a>(&'a mut self, args: &'a mut ($($arg,)*)) -> Ret {
                let ($($arg,)*) = args;
                let callable = self.take();
                callable($(Replay::replay($arg)),*)
            }

            #[allow(non_snake_case)]
            fn is_ready(&self, args: &($($arg,)*)) -> bool {
                let ($($arg,)*) = args;
                !self.is_spent() $(&& Replay::is_ready($arg))*
            }
        }
    };
}

macro_rules! member_callable {
    ($($arg:ident),*) => {
        impl<Owner, Func, Ret, Recv, $($arg),*> Callable<(Recv, $($arg,)*)> for Method<Owner, Func>
        where
            Owner: ?Sized,
            Recv: Receiver<Owner>,
            Func: for<'v> FnMut(&Owner, $($arg::Value<'v>),*) -> Ret,
            $($arg: Replay,)*
        {
            type Kind = BoundMethod;
            type Form = Recv::Form;
            type Output<'a> = Ret
            where
                Self: 'a,
                (Recv, $($arg,)*): 'a;

            #[allow(non_snake_case)]
            #[inline]
            fn call<'a>(&'a mut self, args: &'a mut (Recv, $($arg,)*)) -> Ret {
                let (receiver, $($arg,)*) = args;
                let target = <Recv as Receiver<Owner>>::target(receiver);
                (self.method)(target, $(Replay::replay($arg)),*)
            }

            #[allow(non_snake_case)]
            fn is_ready(&self, args: &(Recv, $($arg,)*)) -> bool {
                let (_, $($arg,)*) = args;
                true $(&& Replay::is_ready($arg))*
            }
        }

        impl<Owner, Func, Ret, Recv, $($arg),*> Callable<(Recv, $($arg,)*)> for MethodMut<Owner, Func>
        where
            Owner: ?Sized,
            Recv: ReceiverMut<Owner>,
            Func: for<'v> FnMut(&mut Owner, $($arg::Value<'v>),*) -> Ret,
            $($arg: Replay,)*
        {
            type Kind = BoundMethod;
            type Form = Recv::Form;
            type Output<'a> = Ret
            where
                Self: 'a,
                (Recv, $($arg,)*): 'a;

            #[allow(non_snake_case)]
            #[inline]
            fn call<'a>(&'a mut self, args: &'a mut (Recv, $($arg,)*)) -> Ret {
                let (receiver, $($arg,)*) = args;
                let target = <Recv as ReceiverMut<Owner>>::target_mut(receiver);
                (self.method)(target, $(Replay::replay($arg)),*)
            }

            #[allow(non_snake_case)]
            fn is_ready(&self, args: &(Recv, $($arg,)*)) -> bool {
                let (_, $($arg,)*) = args;
                true $(&& Replay::is_ready($arg))*
            }
        }
    };
}

free_callable!();
free_callable!(A0);
free_callable!(A0, A1);
free_callable!(A0, A1, A2);
free_callable!(A0, A1, A2, A3);
free_callable!(A0, A1, A2, A3, A4);
free_callable!(A0, A1, A2, A3, A4, A5);
free_callable!(A0, A1, A2, A3, A4, A5, A6);
free_callable!(A0, A1, A2, A3, A4, A5, A6, A7);

member_callable!();
member_callable!(A1);
member_callable!(A1, A2);
member_callable!(A1, A2, A3);
member_callable!(A1, A2, A3, A4);
member_callable!(A1, A2, A3, A4, A5);
member_callable!(A1, A2, A3, A4, A5, A6);
member_callable!(A1, A2, A3, A4, A5, A6, A7);

impl<Owner, Value, Recv> Callable<(Recv,)> for Attribute<Owner, Value>
where
    Owner: ?Sized,
    Value: ?Sized,
    Recv: Receiver<Owner>,
{
    type Kind = AttributeAccessor;
    type Form = Recv::Form;
    type Output<'a>
        = &'a Value
    where
        Self: 'a,
        (Recv,): 'a;

    #[inline]
    fn call<'a>(&'a mut self, args: &'a mut (Recv,)) -> &'a Value {
        self.get(<Recv as Receiver<Owner>>::target(&args.0))
    }

    fn is_ready(&self, _: &(Recv,)) -> bool {
        true
    }
}

impl<Owner, Value, Recv> Callable<(Recv,)> for AttributeMut<Owner, Value>
where
    Owner: ?Sized,
    Value: ?Sized,
    Recv: ReceiverMut<Owner>,
{
    type Kind = AttributeAccessor;
    type Form = Recv::Form;
    type Output<'a>
        = &'a mut Value
    where
        Self: 'a,
        (Recv,): 'a;

    #[inline]
    fn call<'a>(&'a mut self, args: &'a mut (Recv,)) -> &'a mut Value {
        self.get_mut(<Recv as ReceiverMut<Owner>>::target_mut(&mut args.0))
    }

    fn is_ready(&self, _: &(Recv,)) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{attribute, attribute_mut, method, method_mut, moved, once};
    use std::cell::Cell;
    use std::rc::Rc;

    struct Account {
        balance: i64,
        touched: Cell<u32>,
    }

    impl Account {
        fn new(balance: i64) -> Self {
            Self {
                balance,
                touched: Cell::new(0),
            }
        }

        fn balance(&self) -> i64 {
            self.touched.set(self.touched.get() + 1);
            self.balance
        }

        fn deposit(&mut self, amount: i64, fee: i64) -> i64 {
            self.balance += amount - fee;
            self.balance
        }
    }

    #[test]
    fn free_callables_receive_every_slot_in_order() {
        let mut concat = |a: &str, b: String, c: char| format!("{a}{b}{c}");
        let mut args = ("x", String::from("y"), 'z');
        assert_eq!(invoke(&mut concat, &mut args), "xyz");
        assert_eq!(invoke(&mut concat, &mut args), "xyz");

        let mut nothing = || 42;
        assert_eq!(invoke(&mut nothing, &mut ()), 42);
    }

    #[test]
    fn bound_methods_dispatch_through_direct_receivers() {
        let account = Account::new(10);
        assert_eq!(invoke(&mut method!(Account::balance), &mut (&account,)), 10);
        assert_eq!(account.touched.get(), 1);

        let mut account = account;
        let mut deposit = method_mut!(Account::deposit);
        assert_eq!(invoke(&mut deposit, &mut (&mut account, 5_i64, 1_i64)), 14);
        assert_eq!(account.balance, 14);
    }

    #[test]
    fn bound_methods_dispatch_through_pointers() {
        let mut boxed = (Box::new(Account::new(1)), 10_i64, 0_i64);
        let mut deposit = method_mut!(Account::deposit);
        assert_eq!(invoke(&mut deposit, &mut boxed), 11);
        assert_eq!(invoke(&mut deposit, &mut boxed), 21);

        let shared = Rc::new(Account::new(7));
        let mut args = (Rc::clone(&shared),);
        assert_eq!(invoke(&mut method!(Account::balance), &mut args), 7);
        assert_eq!(shared.touched.get(), 1);
    }

    #[test]
    fn attributes_alias_the_receiver() {
        let mut args = (Box::new(Account::new(3)),);
        *invoke(&mut attribute_mut!(Account::balance), &mut args) += 4;
        assert_eq!(*invoke(&mut attribute!(Account::balance), &mut args), 7);

        let account = Account::new(0);
        let mut touched_of = attribute!(Account::touched);
        let mut direct = (&account,);
        let touched = invoke(&mut touched_of, &mut direct);
        touched.set(9);
        assert_eq!(account.touched.get(), 9);
    }

    #[test]
    fn readiness_tracks_single_use_parts() {
        let mut consume = |v: Vec<u8>| v.len();
        let mut args = (moved(vec![1, 2]),);
        assert!(Callable::is_ready(&consume, &args));
        assert_eq!(invoke(&mut consume, &mut args), 2);
        assert!(!Callable::is_ready(&consume, &args));

        let token = String::from("t");
        let mut single = once(move || token.len());
        assert!(Callable::is_ready(&single, &()));
        assert_eq!(invoke(&mut single, &mut ()), 1);
        assert!(!Callable::is_ready(&single, &()));
    }
}
