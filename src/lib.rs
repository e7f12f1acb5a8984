//! Building blocks for feed-forward neural networks: a polymorphic layer
//! contract, a chain manager that owns and links layers, and first- plus
//! second-order (Hessian-diagonal) back-propagation over the chain.

pub mod activation;
pub mod error;
pub mod initializer;
pub mod layer;
pub mod network;
pub mod shared;
pub mod updater;
