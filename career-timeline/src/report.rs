//! Operator-facing console lines. Progress goes to stdout, failures to
//! stderr; tracing output is separate and filtered by `RUST_LOG`.

use console::style;
use std::fmt::Display;

pub fn progress(msg: impl Display) {
    println!("{}", style(msg).blue());
}

pub fn detail(msg: impl Display) {
    println!("{}", style(msg).dim());
}

pub fn success(msg: impl Display) {
    println!("{}", style(msg).green());
}

/// Print `context` and the error beneath it.
pub fn failure(context: impl Display, err: impl Display) {
    eprintln!("{}", style(format!("❌ {context}")).red());
    eprintln!("{err}");
}
