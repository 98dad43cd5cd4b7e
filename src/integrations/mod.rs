//! External service integrations.

pub mod services {
    pub use crate::services::*;
}

pub mod document {
    pub use crate::document::*;
}
