//! Testing utilities and harness for PeekPop

pub mod host;
pub mod robot;

pub use host::{ChildRecord, TestHost};
pub use robot::*;

pub mod prelude {
    pub use crate::host::{ChildRecord, TestHost};
    pub use crate::robot::*;
}
