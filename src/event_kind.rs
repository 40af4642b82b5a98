/// The five events a single button can produce.
///
/// The set is closed, so callbacks live in a fixed-size table indexed by
/// [`EventKind::index`] rather than in any dynamic structure.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// The line went low (button pushed down).
    Press,
    /// The line went high (button let go).
    Release,
    /// Two presses within the double-click window, reported on the second release.
    DoubleClick,
    /// The button has been held for the short-press threshold.
    ShortPress,
    /// The button has been held for the long-press threshold. Ends hold timing.
    LongPress,
}

impl EventKind {
    /// Number of distinct event kinds.
    pub const COUNT: usize = 5;

    /// Every kind, in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Press,
        Self::Release,
        Self::DoubleClick,
        Self::ShortPress,
        Self::LongPress,
    ];

    /// Slot of this kind in a [`CallbackTable`](crate::CallbackTable).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Press => 0,
            Self::Release => 1,
            Self::DoubleClick => 2,
            Self::ShortPress => 3,
            Self::LongPress => 4,
        }
    }
}
