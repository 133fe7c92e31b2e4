pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod email;
pub mod utils;

pub use adapters::HttpPortalClient;
pub use app::cancellation::{BulkCancelReport, BulkCanceller, CancellationOptions};
pub use app::portal::NumberPortal;
pub use app::tickets::TicketAdmin;
pub use config::PortalConfig;
pub use core::dashboard::NumberDashboard;
pub use email::{render_template, Branding, EmailContent, TemplateKind};
pub use utils::error::{PortalError, Result};
