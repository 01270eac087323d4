//! Row types mirrored from the remote tables, with their create (`Draft`) and
//! update (`Patch`) payloads.
//!
//! Each row implements [`Record`](crate::framework::Record) so it can be held by an
//! [`EntityStore`](crate::stores::EntityStore), and
//! [`Filterable`](crate::filter::Filterable) so the view can search it.

/// Declares a type-safe identifier that serializes as its inner value.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl From<$inner> for $name {
            fn from(id: $inner) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub mod location;
pub mod principal;
pub mod product;
pub mod supplier;
pub mod user;

pub use location::*;
pub use principal::*;
pub use product::*;
pub use supplier::*;
pub use user::*;
