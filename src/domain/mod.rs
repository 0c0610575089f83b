pub mod context;
pub mod playback;
pub mod sequence;
pub mod symbol;
pub mod view_tree;
