pub mod effect;
pub mod event;
pub mod runner;

pub use runner::Runtime;
