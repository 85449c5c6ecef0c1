//! Bridge between the single-threaded view and the worker that performs
//! network calls.

pub mod commands;
pub mod runtime;
