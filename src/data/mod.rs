//! Data access layer.

pub mod db {
    pub use crate::db::*;
}

pub mod schema_change {
    pub use crate::schema_change::*;
}
