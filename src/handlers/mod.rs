// Handlers HTTP do painel
pub mod arvores;
pub mod health;

pub use arvores::*;
pub use health::*;
