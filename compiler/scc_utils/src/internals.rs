/// Reports a broken compiler invariant and aborts the current compilation.
///
/// Only for states that a previous pass guarantees cannot happen; user
/// errors always travel as `Diagnostic`s.
#[macro_export]
macro_rules! bug {
    ($($arg:tt)*) => ({
        let msg = format!($($arg)*);
        $crate::__log::error!("SCC internal error: {}", msg);
        panic!("SCC internal error: {}! Aborting...", msg);
    });
}
