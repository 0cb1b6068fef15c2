pub mod event;
pub mod middleware;
pub mod recorder;

pub use event::{rediger, AuditAction, AuditEvent};
pub use middleware::audit_middleware;
pub use recorder::{AuditRecorder, AuditSink, PgAuditSink};
