// Library for the binary and tests

pub mod age;
pub mod clients;
pub mod collector;
pub mod config;
pub mod export;
pub mod fanout;
pub mod job;
pub mod models;
pub mod normalize;
pub mod report;
pub mod rollup;
pub mod version;
