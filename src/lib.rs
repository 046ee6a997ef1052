pub mod config;
pub mod dashboard;
pub mod debounce;
pub mod history;
pub mod model;
pub mod pagination;
pub mod query;
pub mod remote;
pub mod render;
pub mod sample;
pub mod status;
