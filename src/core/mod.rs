pub mod dashboard;
pub mod display_status;
pub mod pagination;
pub mod selection;
pub mod tickets;

pub use crate::domain::model::{DisplayStatus, PhoneNumber, PhoneNumberRequest, Ticket};
pub use crate::domain::ports::{ConfigProvider, PhoneNumberApi, TicketApi, TicketFilters};
pub use crate::utils::error::Result;
