pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod paths;
pub mod services;
pub mod srs;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
