//! Access control domain module.
//!
//! Gates premium tools on the caller's session. The decision itself is a
//! pure function over the request path, the session and the tool records;
//! `middleware.rs` wires it into the router.

mod middleware;
mod policy;
mod session;

pub use middleware::premium_gate;
pub use policy::{check_access, AccessDecision, PREMIUM_REQUIRED_PATH};
pub use session::{SessionState, ADMIN_HEADER, PREMIUM_HEADER, USER_ID_HEADER};
