pub mod socp;
pub mod uc;
pub mod util;
