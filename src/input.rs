//! Physical button identifiers.
//!
//! The camera reports every button transition through the vendor event
//! loop; the add-on sees a button id and whether it went down or up.

/// Camera buttons as reported by the vendor firmware.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Menu,
    Disp,
    Jump,
    Play,
    Trash,
    /// DIRECT PRINT button, left of the viewfinder.
    Dp,
    Set,
    Up,
    Down,
    Right,
    Left,
    Av,
    WheelLeft,
    WheelRight,
    ZoomIn,
    ZoomOut,
    /// Pseudo button: the firmware reports the release of a shortcut key
    /// (JUMP/TRASH) as a press of this button.
    Release,
}

impl Button {
    pub const COUNT: usize = 17;

    pub const ALL: [Button; Self::COUNT] = [
        Button::Menu,
        Button::Disp,
        Button::Jump,
        Button::Play,
        Button::Trash,
        Button::Dp,
        Button::Set,
        Button::Up,
        Button::Down,
        Button::Right,
        Button::Left,
        Button::Av,
        Button::WheelLeft,
        Button::WheelRight,
        Button::ZoomIn,
        Button::ZoomOut,
        Button::Release,
    ];

    /// Buttons that can be held down: their release is tracked and may
    /// trigger an action of its own.
    pub const fn can_hold(self) -> bool {
        matches!(
            self,
            Button::Av | Button::Up | Button::Down | Button::Right | Button::Left
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_every_button_once() {
        for (i, a) in Button::ALL.iter().enumerate() {
            for b in &Button::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn only_dpad_and_av_are_holdable() {
        let holdable: heapless::Vec<Button, 8> =
            Button::ALL.iter().copied().filter(|b| b.can_hold()).collect();
        assert_eq!(
            holdable.as_slice(),
            &[Button::Up, Button::Down, Button::Right, Button::Left, Button::Av]
        );
    }
}
