/// Client side of postbox: the two-view navigation shell, the message form
/// state machine and the HTTP client that talks to the submission endpoint.
pub mod api;
pub mod form;
pub mod shell;

pub use api::{ClientError, HttpApi, MessagesApi, SubmitOutcome};
pub use form::{MessageForm, SubmitStatus};
pub use shell::{Route, Shell};
