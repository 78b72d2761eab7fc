pub mod comments;
#[cfg(test)]
pub mod memory;
pub mod posts;
pub mod settings;
