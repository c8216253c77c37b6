pub mod client;
pub mod model;
pub mod oid;
pub mod service;
