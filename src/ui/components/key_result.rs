/// Outcome of offering a key event to a component.
///
/// Parents try components in order and stop at the first one that does not
/// answer `NotHandled`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Key was consumed, nothing for the parent to do
  Handled,
  /// Key was consumed and produced an event for the parent
  Event(T),
  /// Key was not consumed, parent should try the next handler
  NotHandled,
}
