pub mod data;
pub mod io;

pub use data::{CommandConfig, Config};
pub use io::ConfigError;

#[cfg(test)]
mod tests;
