//! Testing utilities and harness for lazywrap

pub mod assertions;
pub mod doubles;
pub mod harness;

// Re-export testing utilities
pub use doubles::*;
pub use harness::*;

pub mod prelude {
    pub use crate::assertions::*;
    pub use crate::doubles::*;
    pub use crate::harness::*;
}
