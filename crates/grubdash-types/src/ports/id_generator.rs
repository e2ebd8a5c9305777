/// Hands out a fresh, unique identifier on every call.
pub trait IdGenerator: Send + Sync + 'static {
    fn next_id(&self) -> String;
}
