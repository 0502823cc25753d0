pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod ui;
pub mod workflow;

pub use auth::{Callback, Session, SessionStore, begin_login, parse_callback};
pub use backend::{BackendApi, BackendClient, ConversionRequest, ConversionResult, Platform, Track};
pub use config::Config;
pub use error::{AppError, Result};
pub use ui::{BannerTimer, Command, UiEvent, UiState, reduce};
pub use workflow::{ConversionWorkflow, FixedDelayPacer, SubmitInput, WorkflowEvent, WorkflowState};
