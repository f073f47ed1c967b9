//! Newtype IDs for type-safe entity references.
//!
//! Commerce API identifiers are opaque strings (Shopify uses global IDs such
//! as `gid://shopify/Cart/abc?key=123`). Use the `define_id!` macro to create
//! wrappers that prevent accidentally passing a line ID where a variant ID is
//! expected.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `new()`, `parse()` (rejects blank input), `as_str()`, `into_inner()`
/// - `Display`, `AsRef<str>`, `From<String>`, `From<&str>`
///
/// # Example
///
/// ```rust
/// # use acme_core::define_id;
/// define_id!(WishlistId);
/// define_id!(OrderId);
///
/// let wishlist = WishlistId::new("gid://shopify/Wishlist/1");
/// assert_eq!(wishlist.as_str(), "gid://shopify/Wishlist/1");
/// assert!(OrderId::parse("   ").is_none());
///
/// // These are different types, so this won't compile:
/// // let _: OrderId = wishlist;
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
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an identifier without validation.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Wrap an identifier, returning `None` when it is empty or
            /// whitespace-only. Surrounding whitespace is trimmed.
            #[must_use]
            pub fn parse(id: &str) -> Option<Self> {
                let trimmed = id.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Self(trimmed.to_string()))
                }
            }

            /// Borrow the underlying identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Take the underlying identifier.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(CartId);
define_id!(CartLineId);
define_id!(VariantId);
define_id!(ProductId);
define_id!(CollectionId);
