#![allow(dead_code)]

pub mod app;
pub mod client;
pub mod fixtures;
pub mod http;
