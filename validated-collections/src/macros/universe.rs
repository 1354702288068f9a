/// Declares a fieldless enum and registers it as a [`Universe`].
///
/// Members receive their ordinals from declaration order, starting at `0`. The generated
/// type derives `Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash`; any extra
/// attributes given on the enum or its variants are forwarded.
///
/// Only append new variants at the end of an existing declaration. Reordering or
/// inserting changes the ordinals of existing members and silently corrupts every set
/// encoded before the change.
///
/// # Examples
///
/// ```rust
/// use validated_collections::declare_universe;
/// use validated_collections::generic::universe::Universe;
///
/// declare_universe! {
///     pub enum Color {
///         Red,
///         Green,
///         Blue,
///     }
/// }
///
/// assert_eq!(Color::MEMBERS, &[Color::Red, Color::Green, Color::Blue]);
/// assert_eq!(Color::Blue.ordinal(), 2);
/// ```
///
/// [`Universe`]: crate::generic::universe::Universe
#[macro_export]
macro_rules! declare_universe {
    (
        $(#[$meta:meta])*
        $vis:vis enum $Name:ident {
            $(
                $(#[$variant_meta:meta])*
                $Variant:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $Name {
            $(
                $(#[$variant_meta])*
                $Variant
            ),+
        }

        impl $crate::generic::universe::Universe for $Name {
            const MEMBERS: &'static [Self] = &[$($Name::$Variant),+];

            fn ordinal(self) -> usize {
                self as usize
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::generic::universe::Universe;

    crate::declare_universe! {
        /// Test-only universe.
        enum Planet {
            Mercury,
            Venus,
            /// Third from the sun.
            Earth,
            Mars,
        }
    }

    #[test]
    fn test_members_follow_declaration_order() {
        assert_eq!(
            Planet::MEMBERS,
            &[Planet::Mercury, Planet::Venus, Planet::Earth, Planet::Mars]
        );
        assert_eq!(Planet::size(), 4);
    }

    #[test]
    fn test_ordinal_matches_position() {
        for (position, member) in Planet::MEMBERS.iter().enumerate() {
            assert_eq!(member.ordinal(), position);
            assert_eq!(Planet::from_ordinal(position), Some(*member));
        }
        assert_eq!(Planet::from_ordinal(4), None);
    }

    #[test]
    fn test_ordering_follows_ordinals() {
        assert!(Planet::Mercury < Planet::Venus);
        assert!(Planet::Earth < Planet::Mars);
    }
}
