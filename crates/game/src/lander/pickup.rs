//! Hold accounting and pickup policy for minerals and bio.

use procgen::analysis::{ElementCategory, NUM_ELEMENT_CATEGORIES};

use super::objects::Deposit;

/// The lander's cargo hold for one surface trip.
#[derive(Debug, Clone)]
pub struct HoldState {
    /// Mineral units on board.
    pub element_level: u16,
    /// Hold limit for this trip: lander capacity capped by the ship
    /// bay's remaining room.
    pub max_element_level: u16,
    /// Bio units on board.
    pub bio_level: u16,
    pub max_bio_level: u16,
    /// Mineral units per element family, for the takeoff transfer.
    pub element_amounts: [u16; NUM_ELEMENT_CATEGORIES],
    /// Every grab this trip, newest last; scattered back out if the
    /// lander dies.
    pub grabbed_nodes: Vec<(ElementCategory, u16)>,
}

impl HoldState {
    pub fn new(max_element_level: u16, max_bio_level: u16) -> Self {
        Self {
            element_level: 0,
            max_element_level,
            bio_level: 0,
            max_bio_level,
            element_amounts: [0; NUM_ELEMENT_CATEGORIES],
            grabbed_nodes: Vec::new(),
        }
    }
}

/// What a pickup attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupResult {
    /// Nothing fit; the node stays and the "hold full" cue plays.
    Full,
    /// `taken` units went into the hold; `consumed` says whether the
    /// node is gone from the surface.
    Taken { taken: u16, consumed: bool },
}

/// Mineral pickup. With the partial policy, whatever exceeds the hold
/// stays on the surface as a reduced deposit; without it, the node is
/// consumed and the excess is simply lost.
pub fn pickup_minerals(
    hold: &mut HoldState,
    deposit: &mut Deposit,
    partial_allowed: bool,
) -> PickupResult {
    if hold.element_level >= hold.max_element_level {
        return PickupResult::Full;
    }

    let room = hold.max_element_level - hold.element_level;
    let (taken, consumed) = if deposit.amount > room {
        if partial_allowed {
            deposit.amount -= room;
            (room, false)
        } else {
            (room, true)
        }
    } else {
        (deposit.amount, true)
    };

    hold.element_level += taken;
    hold.element_amounts[deposit.element.index()] += taken;
    hold.grabbed_nodes.push((deposit.element, taken));
    PickupResult::Taken { taken, consumed }
}

/// Bio pickup. Canisters are indivisible: under the partial policy an
/// over-full can is refused outright; otherwise the can is consumed and
/// only what fits is kept.
pub fn pickup_bio(hold: &mut HoldState, value: u16, partial_allowed: bool) -> PickupResult {
    if hold.bio_level >= hold.max_bio_level {
        return PickupResult::Full;
    }
    let room = hold.max_bio_level - hold.bio_level;
    if value > room && partial_allowed {
        return PickupResult::Full;
    }
    let taken = value.min(room);
    hold.bio_level += taken;
    PickupResult::Taken {
        taken,
        consumed: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::analysis::ElementCategory;

    fn deposit(amount: u16) -> Deposit {
        Deposit {
            element: ElementCategory::BaseMetal,
            amount,
        }
    }

    #[test]
    fn whole_deposit_fits_and_is_consumed() {
        let mut hold = HoldState::new(64, 50);
        let mut d = deposit(23);
        let r = pickup_minerals(&mut hold, &mut d, true);
        assert_eq!(
            r,
            PickupResult::Taken {
                taken: 23,
                consumed: true
            }
        );
        assert_eq!(hold.element_level, 23);
        assert_eq!(hold.element_amounts[ElementCategory::BaseMetal.index()], 23);
    }

    /// Partial policy: excess stays on the surface as a smaller
    /// deposit.
    #[test]
    fn partial_pickup_leaves_the_remainder() {
        let mut hold = HoldState::new(10, 50);
        let mut d = deposit(23);
        let r = pickup_minerals(&mut hold, &mut d, true);
        assert_eq!(
            r,
            PickupResult::Taken {
                taken: 10,
                consumed: false
            }
        );
        assert_eq!(d.amount, 13);
        assert_eq!(hold.element_level, 10);
    }

    /// Without the partial policy the node vanishes, excess and all.
    /// Longstanding behavior, kept as is.
    #[test]
    fn non_partial_overflow_discards_the_excess() {
        let mut hold = HoldState::new(10, 50);
        let mut d = deposit(23);
        let r = pickup_minerals(&mut hold, &mut d, false);
        assert_eq!(
            r,
            PickupResult::Taken {
                taken: 10,
                consumed: true
            }
        );
    }

    #[test]
    fn full_hold_refuses() {
        let mut hold = HoldState::new(5, 50);
        hold.element_level = 5;
        let mut d = deposit(4);
        assert_eq!(pickup_minerals(&mut hold, &mut d, true), PickupResult::Full);
        assert_eq!(d.amount, 4);
    }

    /// Bio cans are indivisible under the partial policy.
    #[test]
    fn oversize_bio_can_is_refused_when_partial() {
        let mut hold = HoldState::new(64, 10);
        hold.bio_level = 8;
        assert_eq!(pickup_bio(&mut hold, 5, true), PickupResult::Full);
        assert_eq!(
            pickup_bio(&mut hold, 5, false),
            PickupResult::Taken {
                taken: 2,
                consumed: true
            }
        );
    }
}
