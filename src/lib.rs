pub mod frame;
pub mod logger;
