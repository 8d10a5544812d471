pub mod config;

pub use config::Policy;
