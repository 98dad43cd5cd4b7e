// Domain-layer modules and shared errors/models
pub mod extraction {
    pub use crate::extraction::*;
}

pub mod consolidate {
    pub use crate::consolidate::*;
}

pub mod features {
    pub use crate::features::*;
}

pub mod scoring {
    pub use crate::scoring::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
