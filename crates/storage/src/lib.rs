pub mod demo;
pub mod http;
pub mod repository;
