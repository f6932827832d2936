//! Loosely-typed argument values as they travel over the wire.

use crate::error::DeliveryError;
use serde::de::DeserializeOwned;
use std::any::type_name;

/// One argument value received from, or sent to, a hub.
pub type Token = serde_json::Value;

/// Convert the token at `index` to `T`.
///
/// `arity` is the number of parameters the receiving callback declares and is
/// only used to report a short token list. A `null` token is handed to `T`'s
/// deserializer as is, so `Option<T>` receives `None` while types without a
/// null representation fail with [`DeliveryError::Conversion`].
pub fn convert_token<T>(tokens: &[Token], index: usize, arity: usize) -> Result<T, DeliveryError>
where
    T: DeserializeOwned,
{
    let token = tokens.get(index).ok_or(DeliveryError::Arity {
        expected: arity,
        received: tokens.len(),
    })?;
    <T as serde::Deserialize>::deserialize(token).map_err(|source| DeliveryError::Conversion {
        index,
        expected: type_name::<T>(),
        source,
    })
}
