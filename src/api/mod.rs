pub mod format;
pub mod pagination;

pub use format::{ResourceCollection, TicketRelations, TicketResource, UserResource};
pub use pagination::{LengthAwarePaginator, PageRequest, Paginated};
