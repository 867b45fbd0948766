#[macro_use]
extern crate lazy_static;

#[macro_use]
pub mod macros;

pub mod ast;
pub mod cli;
pub mod errors;
pub mod parse;
pub mod span;
