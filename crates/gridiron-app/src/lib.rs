// Library root: configuration and the file-backed collaborators, exposed so
// the binary and integration tests share them.

pub mod config;
pub mod sources;
