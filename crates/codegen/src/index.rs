//! Typed indices for module-level tables. See [`::index_vec`].

pub use index_vec::{Idx, IndexVec};

/// Creates a u32-backed index type for use with [`IndexVec`].
macro_rules! newtype_index {
    () => {};
    ($(#[$attr:meta])* $vis:vis struct $name:ident; $($rest:tt)*) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        $vis struct $name(u32);

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl $crate::index::Idx for $name {
            #[inline(always)]
            fn from_usize(value: usize) -> Self {
                Self(u32::try_from(value).expect("index overflowed"))
            }

            #[inline(always)]
            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl $name {
            #[inline(always)]
            $vis const fn new(value: u32) -> Self {
                Self(value)
            }

            #[inline(always)]
            $vis const fn get(self) -> u32 {
                self.0
            }
        }

        newtype_index!($($rest)*);
    };
}

newtype_index! {
    /// Position of a compiled method in the module's compilation order.
    pub struct MethodIx;
    /// Position of a method token in the container's token table.
    pub struct TokenIx;
    /// Position of a source document in the debug-info document table.
    pub struct DocIx;
}
