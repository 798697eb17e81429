pub mod convert;
pub mod error;
pub mod expand;
pub mod puzzle;
pub mod rules;
pub mod sink;
pub mod source;
