use core::fmt;

// -----------------------------------------------------------------------------
// SupportLevel

/// The coarse rank of a contract match.
///
/// Levels are ordered ascending; a **smaller** level is a closer,
/// better match. [`NotSupported`](SupportLevel::NotSupported) is the
/// sentinel for "cannot handle this" and compares greater than every
/// other level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SupportLevel {
    /// Matched a tree node by exact tag name.
    Element,
    /// Matched a declarative annotation on a property.
    Attribute,
    /// Matched the exact (owner, name, type) property triple.
    PropertyDescriptor,
    /// Matched a runtime type by assignability.
    Type,
    /// Matched a facet (interface-like) target by assignability.
    Interface,
    /// Generic fallback applicable to any registered type.
    Default,
    /// Cannot handle the candidate at all.
    NotSupported,
}

impl SupportLevel {
    /// The stable numeric code of the level.
    pub const fn rank(self) -> i32 {
        match self {
            Self::Element => 10,
            Self::Attribute => 20,
            Self::PropertyDescriptor => 30,
            Self::Type => 40,
            Self::Interface => 50,
            Self::Default => 60,
            Self::NotSupported => i32::MAX,
        }
    }
}

impl fmt::Display for SupportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Element => "Element",
            Self::Attribute => "Attribute",
            Self::PropertyDescriptor => "PropertyDescriptor",
            Self::Type => "Type",
            Self::Interface => "Interface",
            Self::Default => "Default",
            Self::NotSupported => "NotSupported",
        };
        f.write_str(name)
    }
}

// -----------------------------------------------------------------------------
// SupportPriority

/// A `(level, subpriority)` pair ranking competing contracts.
///
/// The subpriority is an inheritance or facet distance; equal levels
/// compare by subpriority ascending, so the closest match wins. The
/// total order is exactly:
///
/// ```
/// use xg_serial::{SupportLevel, SupportPriority};
///
/// let ty0 = SupportPriority::new(SupportLevel::Type, 0);
/// let ty2 = SupportPriority::new(SupportLevel::Type, 2);
/// let iface = SupportPriority::new(SupportLevel::Interface, 0);
///
/// assert!(ty0 < ty2);
/// assert!(ty2 < iface);
/// assert!(iface < SupportPriority::NOT_SUPPORTED);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SupportPriority {
    level: SupportLevel,
    sub: u32,
}

impl SupportPriority {
    /// The sentinel marking a contract unable to handle a candidate.
    pub const NOT_SUPPORTED: Self = Self {
        level: SupportLevel::NotSupported,
        sub: u32::MAX,
    };

    /// Create a priority from a level and a distance subpriority.
    #[inline]
    pub const fn new(level: SupportLevel, sub: u32) -> Self {
        Self { level, sub }
    }

    /// Create a priority with subpriority zero (an exact match at its
    /// level).
    #[inline]
    pub const fn exact(level: SupportLevel) -> Self {
        Self { level, sub: 0 }
    }

    /// Returns the level.
    #[inline]
    pub const fn level(self) -> SupportLevel {
        self.level
    }

    /// Returns the subpriority.
    #[inline]
    pub const fn sub(self) -> u32 {
        self.sub
    }

    /// Whether this priority marks an actual match.
    #[inline]
    pub const fn is_supported(self) -> bool {
        !matches!(self.level, SupportLevel::NotSupported)
    }
}

impl fmt::Display for SupportPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_supported() {
            write!(f, "{}/{}", self.level, self.sub)
        } else {
            f.write_str("NotSupported")
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{SupportLevel, SupportPriority};

    #[test]
    fn level_order_matches_ranks() {
        let levels = [
            SupportLevel::Element,
            SupportLevel::Attribute,
            SupportLevel::PropertyDescriptor,
            SupportLevel::Type,
            SupportLevel::Interface,
            SupportLevel::Default,
            SupportLevel::NotSupported,
        ];
        for pair in levels.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn sub_breaks_ties_within_level() {
        let near = SupportPriority::new(SupportLevel::Type, 1);
        let far = SupportPriority::new(SupportLevel::Type, 4);
        assert!(near < far);
        assert!(SupportPriority::exact(SupportLevel::Type) < near);
    }

    #[test]
    fn level_dominates_sub() {
        let element = SupportPriority::new(SupportLevel::Element, 99);
        let attribute = SupportPriority::exact(SupportLevel::Attribute);
        assert!(element < attribute);
    }

    #[test]
    fn sentinel_compares_greatest() {
        let worst_real = SupportPriority::new(SupportLevel::Default, u32::MAX);
        assert!(worst_real < SupportPriority::NOT_SUPPORTED);
        assert!(!SupportPriority::NOT_SUPPORTED.is_supported());
        assert!(worst_real.is_supported());
    }
}
