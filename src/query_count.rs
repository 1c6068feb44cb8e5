mod counter;
pub use counter::*;

mod result;
pub use result::*;

mod transformer;
pub use transformer::*;
