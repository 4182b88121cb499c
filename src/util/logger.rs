use std::fmt::{Debug, Display, Formatter};

/// A leveled debug facility for automaton construction and the shift-reduce
/// trace.
///
/// Mirrors a plain ordered enum rather than a logging framework: the order
/// between variants is the whole mechanism, and output is compiled out in
/// release builds via `cfg(debug_assertions)` so the generator pays nothing
/// for it once a grammar or pattern set is frozen.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    /// Relative ordering used to decide whether a message at a given level
    /// should be printed under the configured verbosity.
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

impl<TL: Display> Log<TL> {
    /// Print a state-splitting step during partition refinement, or a DFA
    /// state discovery during subset/followpos construction, if the
    /// configured level is at least `Default`.
    pub fn trace(&self, message: impl FnOnce() -> String) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Default(()).order() {
            println!("[{}]: {}", self, message());
        }
        #[cfg(not(debug_assertions))]
        let _ = message;
    }

    /// Print one step of the shift-reduce driver trace (stack, remaining
    /// input, action) if the configured level is at least `Verbose`.
    pub fn trace_step<T: Debug>(&self, stack: &T, remaining: &str, action: &str) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Verbose(()).order() {
            println!(
                "[{}]: stack={:?} remaining=\"{}\" action={}",
                self, stack, remaining, action
            );
        }
        #[cfg(not(debug_assertions))]
        {
            let _ = (stack, remaining, action);
        }
    }
}
