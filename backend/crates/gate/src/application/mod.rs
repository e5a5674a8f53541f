//! Application Layer
//!
//! Use cases: session validation, route decisions, and the
//! login/signup/activation orchestrators.

pub mod activate;
pub mod config;
pub mod decide_route;
pub mod login;
pub mod signup;
pub mod validate_session;

// Re-exports
pub use activate::{ActivateInput, ActivateOutput, ActivateUseCase};
pub use config::GateConfig;
pub use decide_route::decide;
pub use login::{LoginInput, LoginUseCase};
pub use signup::{SignupInput, SignupUseCase};
pub use validate_session::SessionValidator;
