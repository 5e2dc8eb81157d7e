//! Harbor core types and session handling

pub mod config;
pub mod error;
pub mod guard;
pub mod monitor;
pub mod navigation;
pub mod session;
pub mod storage;
pub mod types;
pub mod validation;

pub use config::AuthConfig;
pub use error::{ApiError, CoreError, CoreResult, ErrorKind, FieldErrors};
pub use guard::{GuardOutcome, RouteGuard};
pub use monitor::SessionMonitor;
pub use navigation::{Navigator, RecordingNavigator};
pub use session::SessionStore;
pub use storage::{FileStorage, MemoryStorage, TokenStorage};
pub use types::{Boat, LoginRequest, LoginResponse, NewBoat};
