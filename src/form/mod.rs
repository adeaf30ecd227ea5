pub mod handlers;
#[cfg(test)]
pub mod tests;

pub const INDEX_PAGE: &str = include_str!("index.html");
