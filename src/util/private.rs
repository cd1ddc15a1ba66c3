use faststr::FastStr;

// Prevent users from implementing the index trait in jsontree.
pub trait Sealed {}
impl Sealed for usize {}
impl Sealed for str {}
impl Sealed for std::string::String {}
impl Sealed for FastStr {}
impl<T> Sealed for &T where T: ?Sized + Sealed {}
