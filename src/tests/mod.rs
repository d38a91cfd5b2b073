//! integrated tests
pub mod toolkit;

mod nav;
