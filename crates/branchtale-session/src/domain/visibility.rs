//! Effect-gated option visibility.

use branchtale_content::domain::graph::{RoomOption, RoomRef};

/// Whether `option` is selectable given the accumulated `effects`.
///
/// Visible iff its required effect (if any) is held and its restricting
/// effect (if any) is not.
#[must_use]
pub fn is_visible(option: &RoomOption, effects: &[String]) -> bool {
    let held = |effect: &String| effects.contains(effect);

    option.requires_effect.as_ref().is_none_or(held)
        && !option.restricts_effect.as_ref().is_some_and(held)
}

/// The selectable options of `room`, in the room's order.
#[must_use]
pub fn visible<'a>(room: RoomRef<'a>, effects: &[String]) -> Vec<&'a RoomOption> {
    room.options()
        .iter()
        .filter(|option| is_visible(option, effects))
        .collect()
}
