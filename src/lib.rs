pub mod config;
pub mod consts;
pub mod generator;
pub mod handler;
pub mod normalize;
pub mod publisher;
