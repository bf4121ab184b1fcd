// Domain-layer modules and shared errors/models
pub mod payload {
    pub use crate::payload::*;
}

pub mod session {
    pub use crate::session::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
