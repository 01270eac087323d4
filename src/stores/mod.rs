//! # Stores
//!
//! Observable, in-memory mirrors of remote state that the dashboard views read from.
//!
//! - [`EntityStore<T>`]: one generic store per business table
//! - [`SessionStore`]: the authenticated principal
//!
//! Stores are cheap to clone; clones share the same state.

pub mod entity;
pub mod session;

pub use entity::{EntityStore, StoreState};
pub use session::{SessionState, SessionStore};

use crate::model::{Location, Product, Supplier, User};

macro_rules! entity_stores {
    ($($record:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = "Store mirroring the [`" $record "`] table."]
                pub type [<$record Store>] = EntityStore<$record>;
            )*
        }
    };
}

entity_stores!(Product, Supplier, Location, User);
