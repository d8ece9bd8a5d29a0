//! Construction macro.

/// Build a [`Sequence`](crate::Sequence) from a list of elements or a
/// repeated value.
///
/// ```
/// use stow_seq::seq;
///
/// let listed = seq![1, 2, 3];
/// assert_eq!(listed, [1, 2, 3]);
/// assert_eq!(listed.capacity(), 3);
///
/// let repeated = seq![String::from("x"); 2];
/// assert_eq!(repeated, ["x", "x"]);
///
/// let empty: stow_seq::Sequence<u8> = seq![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! seq {
    () => {
        $crate::Sequence::new()
    };
    ($elem:expr; $n:expr) => {
        <$crate::Sequence<_>>::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        <$crate::Sequence<_>>::from([$($x),+])
    };
}
