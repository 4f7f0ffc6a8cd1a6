/// Represents an authenticated request's session, injected by the auth
/// middleware after the token has been verified.
#[derive(Debug, Clone)]
pub struct Session {
    /// The ID of the user this session belongs to.
    pub user_id: String,
}
