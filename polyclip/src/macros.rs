/// Macro used for implementing path macros. Used for extracting macro repetition count for
/// reserving capacity up front.
#[doc(hidden)]
#[macro_export]
macro_rules! replace_expr {
    ($_t:tt $sub:expr) => {
        $sub
    };
}

/// Construct a [Path64](crate::path::Path64) from a list of (x, y) tuples.
///
/// # Examples
///
/// ```
/// # use polyclip::path_64;
/// # use polyclip::core::math::point64;
/// let path = path_64![(0, 0), (10, 0), (10, 10)];
/// assert_eq!(path.len(), 3);
/// assert_eq!(path[1], point64(10, 0));
/// ```
#[macro_export]
macro_rules! path_64 {
    ($( $x:expr ),* $(,)?) => {
        {
            let size = <[()]>::len(&[$(polyclip::replace_expr!(($x) ())),*]);
            #[allow(unused_mut)]
            let mut path = $crate::path::Path64::with_capacity(size);
            $(
                path.push($crate::core::math::point64($x.0, $x.1));
            )*
            path
        }
    };
}

/// Construct a [Paths64](crate::path::Paths64) from lists of (x, y) tuples, one bracketed list
/// per path.
///
/// # Examples
///
/// ```
/// # use polyclip::paths_64;
/// let paths = paths_64![[(0, 0), (10, 0), (10, 10)], [(2, 2), (8, 2), (8, 8)]];
/// assert_eq!(paths.len(), 2);
/// assert_eq!(paths[1].len(), 3);
/// ```
#[macro_export]
macro_rules! paths_64 {
    ($( [$( $x:expr ),* $(,)?] ),* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut paths = $crate::path::Paths64::new();
            $(
                paths.push($crate::path_64![$($x),*]);
            )*
            paths
        }
    };
}
