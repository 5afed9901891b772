pub mod chart;
pub mod cleaner;
pub mod config;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod stats;
pub mod table;
