pub mod interleave;
pub mod labels;
pub mod normalize;
