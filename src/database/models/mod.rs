pub mod ticket;
pub mod ticket_status;
pub mod user;

pub use ticket::Ticket;
pub use ticket_status::TicketStatus;
pub use user::User;
