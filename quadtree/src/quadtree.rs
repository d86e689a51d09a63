//! Point quadtree over entities that report their own position.
//!
//! Nodes live in a flat arena and refer to each other by index, so splitting,
//! clearing and relocating entries never juggle owning pointers. Queries take
//! `&self`; the node arena sits behind a `RefCell` so a query can run its
//! maintenance pass once every match has been collected.

mod api;
mod config;
mod core;
mod maintenance;
mod query_circle;
mod query_closest;
mod query_rect;
mod types;

use std::cell::RefCell;

pub use config::Config;
pub use types::Positioned;

pub(crate) use types::*;

pub struct Quadtree<T> {
    inner: RefCell<QuadtreeInner<T>>,
}

pub(crate) struct QuadtreeInner<T> {
    pub(crate) nodes: Vec<Node<T>>,
    pub(crate) config: Config,
    pub(crate) len: usize,
    // Nodes touched by the last reorganizing query, in visit order.
    pub(crate) visited: Vec<u32>,
}
