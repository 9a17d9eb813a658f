mod common;
mod dns;
mod lookup;
mod target;

pub use common::*;
pub use dns::*;
pub use lookup::*;
pub use target::*;
