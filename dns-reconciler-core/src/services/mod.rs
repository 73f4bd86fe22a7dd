//! Remote-facing services: correction execution and the reconciliation session

mod executor;
mod session;

pub use executor::apply_corrections;
pub use session::ReconcileSession;
