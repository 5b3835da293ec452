//! HTTP gateway: the website chat page and its JSON API.
//! Used by the persona-chat-gateway binary.

pub mod page;
pub mod server;
