//! Decorator used to observe history mutators that have no native notification hook.

/// Returns a function that runs `original` and then `notify` with its result.
///
/// The original always runs first, so anything `notify` triggers observes the post-mutation
/// state. Its return value is passed through untouched.
pub fn notify_after<A, R, F, N>(original: F, notify: N) -> impl Fn(A) -> R
where
    F: Fn(A) -> R,
    N: Fn(&R),
{
    move |args| {
        let result = original(args);
        notify(&result);
        result
    }
}
