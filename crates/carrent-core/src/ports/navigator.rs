/// Moves the user to another entry point of the application.
///
/// The gateway calls this when the backend rejects the session, so the
/// front end can send the user back to the login screen.
pub trait Navigator: Send + Sync {
    fn navigate(&self, location: &str);
}
