pub(crate) mod half;
pub(crate) mod private;
pub(crate) mod range;
