pub mod growth;
pub mod xirr;

pub use growth::{cagr, lumpsum_projection, sip_projection, Projection};
pub use xirr::xirr;
