pub mod cli;
pub mod conf;
pub mod ingest;
pub mod logging;
pub mod normalize;
pub mod parse;
pub mod render;
pub mod stats;
