//! Newtype IDs for type-safe entity references.
//!
//! The commerce API identifies every entity by an opaque hex string
//! (Mongo-style object ids). Use the `define_id!` macro to create
//! type-safe wrappers that prevent accidentally mixing IDs from
//! different entity types.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper over an opaque string.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use fresh_cart_core::define_id;
/// define_id!(WidgetId);
/// define_id!(GadgetId);
///
/// let widget_id = WidgetId::new("665f1a2b3c4d5e6f7a8b9c0d");
///
/// // These are different types, so this won't compile:
/// // let _: GadgetId = widget_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID, returning the underlying `String`.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(CategoryId);
define_id!(BrandId);
define_id!(CartId);
define_id!(UserId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        let id = ProductId::new("6428ebc6dc1175abc65ca0b9");
        assert_eq!(id.as_str(), "6428ebc6dc1175abc65ca0b9");
        assert_eq!(id.to_string(), "6428ebc6dc1175abc65ca0b9");
        assert_eq!(id.clone().into_inner(), "6428ebc6dc1175abc65ca0b9");
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = CartId::new("cart-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"cart-1\"");

        let back: CartId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_from_str() {
        let a: UserId = "u1".into();
        let b = UserId::from("u1".to_string());
        assert_eq!(a, b);
    }
}
