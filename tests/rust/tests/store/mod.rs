//! Registry store tests
//!
//! Contract violations, conflict policies on import, filtered queries and
//! persistence to the canonical on-disk form.

mod import;
mod persistence;
