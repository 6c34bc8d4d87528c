pub mod amplitude;
pub mod clock;
pub mod config;
pub mod constants;
pub mod director;
pub mod easing;
pub mod error;
pub mod frame;
pub mod line_director;
pub mod oscillator;
pub mod path;
pub mod state;
pub mod transition;

pub use amplitude::*;
pub use clock::*;
pub use config::*;
pub use director::*;
pub use easing::*;
pub use error::*;
pub use frame::*;
pub use line_director::*;
pub use oscillator::*;
pub use path::*;
pub use state::*;
pub use transition::*;
