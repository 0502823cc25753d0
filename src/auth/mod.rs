pub mod flow;
pub mod session;

pub use flow::{Callback, begin_login, parse_callback};
pub use session::{Session, SessionStore};
