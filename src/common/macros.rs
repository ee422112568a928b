//! Macros.

/// Generates a zero-cost wrapper around `usize` for type-safe indexing.
///
/// Optional trailing items generate an ordered set alias (`set: Name`) and a
/// total map, *i.e.* a vector indexed by the wrapper type (`map: Name`).
#[macro_export]
macro_rules! wrap_usize {
    (
        $(#[$meta:meta])* $t:ident
        $($tail:tt)*
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default
        )]
        pub struct $t {
            val: usize,
        }
        impl $t {
            /// Wrapped value accessor.
            #[inline]
            pub fn get(self) -> usize {
                self.val
            }
        }
        impl From<usize> for $t {
            fn from(val: usize) -> Self {
                $t { val }
            }
        }
        impl From<$t> for usize {
            fn from(idx: $t) -> usize {
                idx.val
            }
        }
        impl ::std::ops::Deref for $t {
            type Target = usize;
            fn deref(&self) -> &usize {
                &self.val
            }
        }
        impl ::std::fmt::Display for $t {
            fn fmt(&self, fmt: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(fmt, "{}", self.val)
            }
        }
        wrap_usize! { @tail $t $($tail)* }
    };

    (@tail $t:ident) => {};

    (
        @tail $t:ident
        $(#[$meta:meta])* set: $set:ident
        $($tail:tt)*
    ) => {
        $(#[$meta])*
        pub type $set = ::std::collections::BTreeSet<$t>;
        wrap_usize! { @tail $t $($tail)* }
    };

    (
        @tail $t:ident
        $(#[$meta:meta])* map: $map:ident
        $($tail:tt)*
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $map<T> {
            vec: Vec<T>,
        }
        impl<T> $map<T> {
            /// Empty map.
            #[inline]
            pub fn new() -> Self {
                $map { vec: Vec::new() }
            }
            /// Empty map with some capacity.
            #[inline]
            pub fn with_capacity(capa: usize) -> Self {
                $map {
                    vec: Vec::with_capacity(capa),
                }
            }
            /// Number of elements.
            #[inline]
            pub fn len(&self) -> usize {
                self.vec.len()
            }
            /// True if the map is empty.
            #[inline]
            pub fn is_empty(&self) -> bool {
                self.vec.is_empty()
            }
            /// Pushes an element at the end, yields its index.
            #[inline]
            pub fn push(&mut self, elem: T) -> $t {
                let idx = $t::from(self.vec.len());
                self.vec.push(elem);
                idx
            }
            /// Iterator over the elements.
            #[inline]
            pub fn iter(&self) -> ::std::slice::Iter<T> {
                self.vec.iter()
            }
            /// Mutable iterator over the elements.
            #[inline]
            pub fn iter_mut(&mut self) -> ::std::slice::IterMut<T> {
                self.vec.iter_mut()
            }
            /// Iterator over the elements with their indices.
            #[inline]
            pub fn index_iter<'a>(&'a self) -> impl Iterator<Item = ($t, &'a T)> + 'a {
                self.vec
                    .iter()
                    .enumerate()
                    .map(|(idx, elem)| ($t::from(idx), elem))
            }
            /// Consuming iterator over the elements with their indices.
            #[inline]
            pub fn into_index_iter(self) -> impl Iterator<Item = ($t, T)> {
                self.vec
                    .into_iter()
                    .enumerate()
                    .map(|(idx, elem)| ($t::from(idx), elem))
            }
        }
        impl<T> Default for $map<T> {
            fn default() -> Self {
                Self::new()
            }
        }
        impl<T> ::std::ops::Index<$t> for $map<T> {
            type Output = T;
            fn index(&self, idx: $t) -> &T {
                &self.vec[idx.val]
            }
        }
        impl<T> ::std::ops::IndexMut<$t> for $map<T> {
            fn index_mut(&mut self, idx: $t) -> &mut T {
                &mut self.vec[idx.val]
            }
        }
        impl<T> ::std::iter::FromIterator<T> for $map<T> {
            fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
                $map {
                    vec: iter.into_iter().collect(),
                }
            }
        }
        impl<T> IntoIterator for $map<T> {
            type Item = T;
            type IntoIter = ::std::vec::IntoIter<T>;
            fn into_iter(self) -> Self::IntoIter {
                self.vec.into_iter()
            }
        }
        impl<'a, T> IntoIterator for &'a $map<T> {
            type Item = &'a T;
            type IntoIter = ::std::slice::Iter<'a, T>;
            fn into_iter(self) -> Self::IntoIter {
                self.vec.iter()
            }
        }
        wrap_usize! { @tail $t $($tail)* }
    };
}

/// Implements `Display` for a type.
macro_rules! impl_fmt {
    ($t:ident ($slf:ident, $fmt:ident) $def:block) => {
        impl ::std::fmt::Display for $t {
            fn fmt(&$slf, $fmt: &mut ::std::fmt::Formatter) -> ::std::fmt::Result $def
        }
    };
}

/// Logs at verbose level, as `; `-prefixed comment lines on stdout.
macro_rules! log_info {
    ($($tt:tt)*) => {
        if $crate::common::conf.verbose() {
            for line in format!($($tt)*).lines() {
                println!("; {}", line)
            }
        }
    };
}

/// Logs at debug level.
#[allow(unused_macros)]
macro_rules! log_debug {
    ($($tt:tt)*) => {
        if $crate::common::conf.debug() {
            for line in format!($($tt)*).lines() {
                println!("; {}", line)
            }
        }
    };
}
