pub mod analysis;
pub mod credit;
pub mod structural;
