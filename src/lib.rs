//! Event display core for a layered sampling calorimeter: per-layer hit statistics, layer
//! selection, shower axis fit, and the navigation state machine driving a renderer.
pub mod axis_fit;
pub mod axis_scan;
pub mod constants;
pub mod display;
pub mod display_params;
pub mod hits;
pub mod layers;
pub mod navigation;
pub mod shower_errors;

pub use display_params::DisplayParams;
pub use hits::{event_store::EventStore, Hit};
pub use navigation::{NavCommand, NavState, NavigationController};
pub use shower_errors::ShowerError;
