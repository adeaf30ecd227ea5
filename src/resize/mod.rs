pub mod codec;
pub mod consts;
pub mod engine;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod http;
pub mod job;
pub mod models;
pub mod responses;
pub mod validation;
#[cfg(test)]
pub mod tests;
