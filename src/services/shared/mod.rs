pub mod clock;
pub mod constants;
pub mod env;
pub mod logger;
pub mod util;
