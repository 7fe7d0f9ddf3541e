/// Types shared by the postbox server and the form client.
///
/// `api` holds the JSON shapes exchanged over HTTP, `validation` the field
/// rules both sides apply to a submission.
pub mod api;
pub mod validation;
