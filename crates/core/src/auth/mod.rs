mod bearer;
mod login;
mod token;
mod traits;
mod types;

pub use bearer::*;
pub use login::*;
pub use token::*;
pub use traits::*;
pub use types::*;
