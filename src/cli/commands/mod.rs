pub mod browse;
pub mod choices;
pub mod init;
pub mod reindex;
pub mod seed;
