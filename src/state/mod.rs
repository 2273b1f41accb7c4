pub mod flow;
pub mod step;
pub mod store;
pub mod validation;
pub mod wizard;
