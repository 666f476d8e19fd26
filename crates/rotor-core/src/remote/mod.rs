use async_trait::async_trait;
use rotor_model::Outcome;

/// The write operation a task performs each cycle.
///
/// Implementations own the protocol: they build the request for `(credential, target,
/// message)`, perform it and classify the response into an [`Outcome`]. Expected failures
/// (rejected credential, rate limit, network trouble) are reported as
/// [`Outcome::Failure`], never as panics.
///
/// The worker bounds every call with its own timeout, and never issues two calls for the
/// same task concurrently.
#[async_trait]
pub trait RemoteOperation: Send + Sync + 'static {
    /// Short name for logs.
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn attempt(&self, credential: &str, target: &str, message: &str) -> Outcome;
}
