/// Loremaster - campaign tracker core
///
/// Rumor and quest bookkeeping for tabletop RPG game masters, plus
/// client-side session lifetime tracking.

pub mod config;
pub mod core;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
