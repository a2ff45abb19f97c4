//! Newtype IDs for type-safe entity references.
//!
//! Document store identifiers are opaque strings. Use the `define_id!` macro
//! to create wrappers that prevent accidentally mixing IDs from different
//! entity types.

/// Errors that can occur when constructing an ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty.
    #[error("id cannot be empty")]
    Empty,
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Fallible construction via `parse()` (rejects empty strings)
/// - `Display` and `as_str()`
///
/// # Example
///
/// ```rust
/// # use orderdesk_core::define_id;
/// define_id!(OrderId);
/// define_id!(CartItemId);
///
/// let order_id = OrderId::parse("a1b2").unwrap();
/// let item_id = CartItemId::parse("a1b2").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: OrderId = item_id;
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
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from a non-empty string.
            ///
            /// # Errors
            ///
            /// Returns `IdError::Empty` if `id` is empty.
            pub fn parse(id: impl Into<String>) -> Result<Self, $crate::IdError> {
                let id = id.into();
                if id.is_empty() {
                    return Err($crate::IdError::Empty);
                }
                Ok(Self(id))
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::IdError;

            fn try_from(id: String) -> Result<Self, Self::Error> {
                Self::parse(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(OrderId);
define_id!(CartItemId);
