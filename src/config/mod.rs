//! Configuration loaded from `.driveseal.toml`.

pub mod settings;

pub use settings::Settings;
