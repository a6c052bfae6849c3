//! Output side: safe path segments and the destination tree layout.

pub mod layout;
pub mod sanitize;
