//! Operation vocabulary shared by the engine property suites.

use test_strategy::Arbitrary;

/// Keys are drawn from `0..KEY_SPACE` so sequences keep revisiting them.
pub(super) const KEY_SPACE: u8 = 12;

/// One keyed partition operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum Operation {
    #[weight(4)]
    Add {
        #[strategy(0..KEY_SPACE)]
        key: u8,
    },
    #[weight(3)]
    AddTo {
        #[strategy(0..KEY_SPACE)]
        key: u8,
        #[strategy(0..KEY_SPACE)]
        target: u8,
    },
    #[weight(2)]
    Del {
        #[strategy(0..KEY_SPACE)]
        key: u8,
    },
    #[weight(1)]
    DelAll {
        #[strategy(0..KEY_SPACE)]
        key: u8,
    },
    #[weight(1)]
    DelExcept {
        #[strategy(0..KEY_SPACE)]
        key: u8,
    },
    #[weight(2)]
    Join {
        #[strategy(0..KEY_SPACE)]
        key: u8,
    },
    #[weight(3)]
    JoinTo {
        #[strategy(0..KEY_SPACE)]
        key: u8,
        #[strategy(0..KEY_SPACE)]
        target: u8,
    },
    #[weight(4)]
    Merge {
        #[strategy(0..KEY_SPACE)]
        x: u8,
        #[strategy(0..KEY_SPACE)]
        y: u8,
    },
    #[weight(2)]
    Find {
        #[strategy(0..KEY_SPACE)]
        key: u8,
    },
}
