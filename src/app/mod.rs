pub mod cancellation;
pub mod portal;
pub mod reputation;
pub mod tickets;
