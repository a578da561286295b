pub mod catalog;
pub mod chat_stream;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod decode;
pub mod message;
pub mod sections;
