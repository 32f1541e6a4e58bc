use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

use crate::database::models::{Ticket, TicketStatus, User};

/// Public timestamp format: 12-hour clock, no meridiem
pub const DISPLAY_DATETIME: &str = "%Y-%m-%d %I:%M:%S";

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(DISPLAY_DATETIME).to_string()
}

/// `{data: [...]}` wrapper for unpaginated collections
#[derive(Debug, Clone, Serialize)]
pub struct ResourceCollection<T> {
    pub data: Vec<T>,
}

/// Public shape of a ticket. Owner and status are shown by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketResource {
    pub id: i64,
    pub user: Option<String>,
    pub status: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Names needed to render a batch of tickets, loaded up front
#[derive(Debug, Clone, Default)]
pub struct TicketRelations {
    pub users: HashMap<i64, String>,
    pub statuses: HashMap<i64, String>,
}

impl TicketRelations {
    pub fn new(users: Vec<User>, statuses: Vec<TicketStatus>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u.name)).collect(),
            statuses: statuses.into_iter().map(|s| (s.id, s.name)).collect(),
        }
    }
}

impl TicketResource {
    pub fn make(ticket: &Ticket, relations: &TicketRelations) -> Self {
        Self {
            id: ticket.id,
            user: relations.users.get(&ticket.user_id).cloned(),
            status: relations.statuses.get(&ticket.ticket_status_id).cloned(),
            created_at: format_timestamp(&ticket.created_at),
            updated_at: format_timestamp(&ticket.updated_at),
        }
    }

    pub fn collection(tickets: &[Ticket], relations: &TicketRelations) -> Vec<Self> {
        tickets.iter().map(|t| Self::make(t, relations)).collect()
    }
}

/// Public shape of a user; the password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserResource {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl UserResource {
    pub fn make(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: format_timestamp(&user.created_at),
            updated_at: format_timestamp(&user.updated_at),
        }
    }

    pub fn collection(users: &[User]) -> ResourceCollection<Self> {
        ResourceCollection { data: users.iter().map(Self::make).collect() }
    }
}
