pub mod config;
pub mod feature;
pub mod feedback;
pub mod report;
pub mod scoring;
pub mod votes;
