pub mod class;
pub mod comment;
pub mod lexer;
pub mod member;
pub mod method;
