// Domain-layer modules and shared errors/models
pub mod picker {
    pub use crate::picker::*;
}

pub mod geocode {
    pub use crate::geocode::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
