pub mod ticket_service;
pub mod user_service;

pub use ticket_service::TicketService;
pub use user_service::UserService;
