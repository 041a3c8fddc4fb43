pub mod export;
pub mod layouts;
pub mod parse;
