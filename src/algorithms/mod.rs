pub mod a_star;
pub mod animation;
pub mod bfs;
pub mod common;
pub mod dfs;
pub mod jps;
pub mod search;
