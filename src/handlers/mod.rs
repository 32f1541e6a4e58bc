// handlers/mod.rs - route handlers, one module per resource

pub mod system;
pub mod tickets;
pub mod users;
