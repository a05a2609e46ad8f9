pub mod codec;
pub mod describe;
pub mod families;
pub mod groups;
pub mod names;
pub mod parameter;
pub mod space;

pub use codec::*;
pub use describe::*;
pub use families::*;
pub use parameter::*;
pub use space::*;
