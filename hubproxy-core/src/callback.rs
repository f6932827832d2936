//! # Typed Callbacks
//!
//! Event callbacks are plain functions whose parameter types describe how the
//! incoming tokens must be converted. The [`Callback`] trait is implemented
//! for every `Fn(T1, .., Tn)` with `n <= 12` whose parameters implement
//! [`DeserializeOwned`]:
//!
//! ```rust
//! use hubproxy_core::Handler;
//! use serde_json::json;
//!
//! let handler = Handler::new(|user: String, text: String| {
//!     println!("{user}: {text}");
//! });
//! assert_eq!(handler.signature().arity(), 2);
//!
//! let invocation = handler.bind(&[json!("alice"), json!("hello")]).unwrap();
//! invocation();
//! ```
//!
//! Tokens are paired with parameters by position. Surplus tokens are ignored;
//! missing tokens and tokens that do not deserialize into the declared type
//! are reported when an event is delivered, not when the callback is built.

use crate::dispatcher::Work;
use crate::error::DeliveryError;
use crate::token::{Token, convert_token};
use serde::de::DeserializeOwned;
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// The declared parameter list of a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<&'static str>,
}

impl Signature {
    /// Create a signature from positional parameter type names.
    pub fn new(params: Vec<&'static str>) -> Self {
        Self { params }
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Type names of the declared parameters, in order.
    pub fn params(&self) -> &[&'static str] {
        &self.params
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn({})", self.params.join(", "))
    }
}

/// A function that can receive the tokens of an event.
///
/// `Args` is the tuple of declared parameter types; it only exists to let one
/// closure type implement the trait for exactly one parameter list.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as an event callback",
    label = "not a `Fn` whose parameters implement `DeserializeOwned`",
    note = "Callbacks must be `Fn(T1, .., Tn) + Send + Sync + 'static` with at most 12 parameters."
)]
pub trait Callback<Args>: Send + Sync + 'static {
    /// The declared parameter list.
    fn signature() -> Signature;

    /// Convert the tokens of one event occurrence into the argument tuple.
    fn convert(tokens: &[Token]) -> Result<Args, DeliveryError>;

    /// Invoke the callback with already converted arguments.
    fn apply(&self, args: Args);
}

macro_rules! impl_callback {
    ($arity:literal; $($T:ident $idx:tt),*) => {
        impl<F, $($T,)*> Callback<($($T,)*)> for F
        where
            F: Fn($($T),*) + Send + Sync + 'static,
            $($T: DeserializeOwned + Send + 'static,)*
        {
            fn signature() -> Signature {
                Signature::new(vec![$(type_name::<$T>()),*])
            }

            #[allow(unused_variables)]
            fn convert(tokens: &[Token]) -> Result<($($T,)*), DeliveryError> {
                Ok(($(convert_token::<$T>(tokens, $idx, $arity)?,)*))
            }

            #[allow(non_snake_case)]
            fn apply(&self, ($($T,)*): ($($T,)*)) {
                (self)($($T),*)
            }
        }
    };
}

impl_callback!(0;);
impl_callback!(1; T1 0);
impl_callback!(2; T1 0, T2 1);
impl_callback!(3; T1 0, T2 1, T3 2);
impl_callback!(4; T1 0, T2 1, T3 2, T4 3);
impl_callback!(5; T1 0, T2 1, T3 2, T4 3, T5 4);
impl_callback!(6; T1 0, T2 1, T3 2, T4 3, T5 4, T6 5);
impl_callback!(7; T1 0, T2 1, T3 2, T4 3, T5 4, T6 5, T7 6);
impl_callback!(8; T1 0, T2 1, T3 2, T4 3, T5 4, T6 5, T7 6, T8 7);
impl_callback!(9; T1 0, T2 1, T3 2, T4 3, T5 4, T6 5, T7 6, T8 7, T9 8);
impl_callback!(10; T1 0, T2 1, T3 2, T4 3, T5 4, T6 5, T7 6, T8 7, T9 8, T10 9);
impl_callback!(11; T1 0, T2 1, T3 2, T4 3, T5 4, T6 5, T7 6, T8 7, T9 8, T10 9, T11 10);
impl_callback!(12; T1 0, T2 1, T3 2, T4 3, T5 4, T6 5, T7 6, T8 7, T9 8, T10 9, T11 10, T12 11);

/// Object-safe form of a callback with its argument types erased.
trait ErasedCallback: Send + Sync + 'static {
    fn bind(&self, tokens: &[Token]) -> Result<Work, DeliveryError>;
}

struct Typed<F, Args> {
    func: Arc<F>,
    _marker: PhantomData<fn(Args)>,
}

impl<F, Args> ErasedCallback for Typed<F, Args>
where
    F: Callback<Args>,
    Args: Send + 'static,
{
    fn bind(&self, tokens: &[Token]) -> Result<Work, DeliveryError> {
        let args = F::convert(tokens)?;
        let func = Arc::clone(&self.func);
        Ok(Box::new(move || func.apply(args)))
    }
}

/// A callback together with its declared signature.
///
/// Cloning a handler is cheap and shares the underlying function.
#[derive(Clone)]
pub struct Handler {
    signature: Signature,
    inner: Arc<dyn ErasedCallback>,
}

impl Handler {
    /// Wrap a typed callback.
    pub fn new<F, Args>(func: F) -> Self
    where
        F: Callback<Args>,
        Args: Send + 'static,
    {
        Self {
            signature: F::signature(),
            inner: Arc::new(Typed {
                func: Arc::new(func),
                _marker: PhantomData,
            }),
        }
    }

    /// The declared parameter list of the wrapped callback.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Convert `tokens` and return the ready-to-run invocation.
    ///
    /// Conversion happens here, on the caller's thread; the returned work only
    /// calls the function.
    pub fn bind(&self, tokens: &[Token]) -> Result<Work, DeliveryError> {
        self.inner.bind(tokens)
    }

    /// Convert `tokens` and invoke the callback immediately.
    pub fn invoke(&self, tokens: &[Token]) -> Result<(), DeliveryError> {
        let work = self.bind(tokens)?;
        work();
        Ok(())
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[test]
    fn test_signature_of_closure() {
        let handler = Handler::new(|_user: String, _count: u32| {});
        assert_eq!(handler.signature().arity(), 2);
        let params = handler.signature().params();
        assert!(params[0].ends_with("String"));
        assert_eq!(params[1], "u32");
    }

    #[test]
    fn test_zero_arity() {
        let hits = Arc::new(Mutex::new(0));
        let h = hits.clone();
        let handler = Handler::new(move || *h.lock().unwrap() += 1);
        assert_eq!(handler.signature().arity(), 0);
        assert_eq!(handler.signature().to_string(), "fn()");

        handler.invoke(&[json!("ignored")]).unwrap();
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn test_invoke_converts_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let handler = Handler::new(move |user: String, text: String| {
            s.lock().unwrap().push(format!("{user}:{text}"));
        });

        handler.invoke(&[json!("alice"), json!("hello")]).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["alice:hello".to_string()]);
    }

    #[test]
    fn test_surplus_tokens_ignored() {
        let seen = Arc::new(Mutex::new(None));
        let s = seen.clone();
        let handler = Handler::new(move |n: i32| *s.lock().unwrap() = Some(n));
        handler.invoke(&[json!(7), json!("extra")]).unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(7));
    }

    #[test]
    fn test_bind_fails_before_call() {
        let called = Arc::new(Mutex::new(false));
        let c = called.clone();
        let handler = Handler::new(move |_a: String, _b: String| *c.lock().unwrap() = true);

        let err = handler.bind(&[json!("alice")]).err().unwrap();
        assert!(matches!(
            err,
            DeliveryError::Arity {
                expected: 2,
                received: 1
            }
        ));
        assert!(!*called.lock().unwrap());
    }

    #[test]
    fn test_null_checked_per_argument() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let handler = Handler::new(move |a: Option<String>, b: Option<i64>, c: Token| {
            s.lock().unwrap().push((a, b, c));
        });

        handler
            .invoke(&[json!("x"), json!(null), json!(null)])
            .unwrap();
        handler
            .invoke(&[json!(null), json!(5), json!({ "k": 1 })])
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], (Some("x".to_string()), None, Token::Null));
        assert_eq!(seen[1], (None, Some(5), json!({ "k": 1 })));
    }

    #[test]
    fn test_twelve_parameters() {
        let sum = Arc::new(Mutex::new(0));
        let s = sum.clone();
        let handler = Handler::new(
            move |a: i32,
                  b: i32,
                  c: i32,
                  d: i32,
                  e: i32,
                  f: i32,
                  g: i32,
                  h: i32,
                  i: i32,
                  j: i32,
                  k: i32,
                  l: i32| {
                *s.lock().unwrap() = a + b + c + d + e + f + g + h + i + j + k + l;
            },
        );
        let tokens: Vec<Token> = (1..=12).map(|n| json!(n)).collect();
        handler.invoke(&tokens).unwrap();
        assert_eq!(*sum.lock().unwrap(), 78);
    }
}
