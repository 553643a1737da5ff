//! Newtype IDs for type-safe entity references.
//!
//! Backend identifiers are opaque strings. Use the `define_id!` macro to create
//! wrappers that keep ids of different entities from being mixed up.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` with `#[serde(transparent)]`
/// - `Deserialize` from a JSON string or an integer (stored as its decimal text)
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `Display`, `From<String>`, `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use duka_core::define_id;
/// define_id!(SupplierId);
/// define_id!(WarehouseId);
///
/// let supplier = SupplierId::new("s-1");
/// let warehouse = WarehouseId::new("s-1");
///
/// // These are different types, so this won't compile:
/// // let _: SupplierId = warehouse;
/// # let _ = (supplier, warehouse);
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
            ::serde::Serialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                #[derive(::serde::Deserialize)]
                #[serde(untagged)]
                enum Raw {
                    Text(String),
                    Unsigned(u64),
                    Signed(i64),
                }

                Ok(match <Raw as ::serde::Deserialize>::deserialize(deserializer)? {
                    Raw::Text(id) => Self(id),
                    Raw::Unsigned(id) => Self(id.to_string()),
                    Raw::Signed(id) => Self(id.to_string()),
                })
            }
        }

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
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

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);

impl ProductId {
    /// Percent-encoded form for use as a single URL path segment.
    #[must_use]
    pub fn path_segment(&self) -> String {
        urlencoding::encode(self.as_str()).into_owned()
    }

    /// Location of the product detail view (`/products/view?id=...`).
    #[must_use]
    pub fn detail_path(&self) -> String {
        format!("/products/view?id={}", urlencoding::encode(self.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_serializes_transparently() {
        let id = ProductId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap_or_default(), "\"abc\"");
    }

    #[test]
    fn test_numeric_id_reads_as_text() {
        let id: ProductId = serde_json::from_str("17").unwrap_or_else(|_| ProductId::new(""));
        assert_eq!(id.as_str(), "17");
        assert!(serde_json::from_str::<ProductId>("1.5").is_err());
        assert!(serde_json::from_str::<ProductId>("null").is_err());
    }

    #[test]
    fn test_detail_path_encodes_query_value() {
        assert_eq!(ProductId::new("42").detail_path(), "/products/view?id=42");
        assert_eq!(
            ProductId::new("a b&c").detail_path(),
            "/products/view?id=a%20b%26c"
        );
    }

    #[test]
    fn test_path_segment_escapes_slashes() {
        assert_eq!(ProductId::new("x/y").path_segment(), "x%2Fy");
    }
}
