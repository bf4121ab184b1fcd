//! External service integrations.

pub mod dispatcher {
    pub use crate::dispatcher::*;
}
