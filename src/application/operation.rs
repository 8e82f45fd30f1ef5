/// Lifecycle of one asynchronous operation slot.
///
/// The tagged variants make the loading/error/result flags impossible to
/// drift apart: an operation is either untouched, in flight, or settled with
/// exactly one of a value or a user-facing error message.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationState<T> {
    Idle,
    Pending,
    Resolved(T),
    Failed(String),
}

impl<T> OperationState<T> {
    pub fn busy(&self) -> bool {
        matches!(self, OperationState::Pending)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            OperationState::Resolved(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OperationState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}
