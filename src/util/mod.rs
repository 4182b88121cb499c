//! Small utilities shared across the regex, automaton, scanner and grammar
//! modules: a leveled diagnostic logger and nothing else — there is no
//! "kitchen sink" `util` here on purpose.

mod logger;

pub use logger::Log;
