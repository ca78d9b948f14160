mod candidate;
pub use candidate::*;
mod instance;
pub use instance::*;
mod matrix;
pub use matrix::*;
