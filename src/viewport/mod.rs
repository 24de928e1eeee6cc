pub mod config;
pub mod controller;

pub use config::ViewportConfig;
pub use controller::ViewportController;
