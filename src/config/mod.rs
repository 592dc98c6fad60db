#[cfg(feature = "cli")]
pub mod cli;
pub mod museum;

pub use museum::MuseumConfig;
