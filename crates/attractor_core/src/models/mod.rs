//! Built-in vector fields.
//!
//! Every system carries a trailing time axis `t` whose derivative is 1, so a
//! projection can plot any spatial axis against elapsed time.

mod bouali;
mod hyperchaos;
mod lorenz;
mod owl;
mod rossler;

pub use bouali::Bouali;
pub use hyperchaos::Hyperchaos;
pub use lorenz::Lorenz;
pub use owl::Owl;
pub use rossler::Rossler;
