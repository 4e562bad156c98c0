pub mod board;
pub mod clock;
pub mod config;
pub mod deadline;
pub mod error;
pub mod model;
pub mod monitor;
pub mod notify;
pub mod registry;
pub mod view;
