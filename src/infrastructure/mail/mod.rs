//! Mail collaborators

mod in_memory;
mod log_mailer;

pub use in_memory::InMemoryMailer;
pub use log_mailer::LogMailer;
