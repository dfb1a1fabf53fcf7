//! Runtime settings and the custom menu ordering.
//!
//! Both structures are flat collections of named integer parameters
//! (scalars or fixed-size arrays). The [`parameters!`] macro generates the
//! struct, its defaults and a [`Section`] implementation, so the textual
//! reader and writer in [`crate::serialize`] work from the same field list
//! as the rest of the code.

use crate::config::MAX_ORDERING;
use crate::pattern::AfPattern;

/// One named parameter as seen by the serializer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Param<'a> {
    pub name: &'static str,
    pub values: &'a [i32],
    pub array: bool,
}

/// A named group of integer parameters persisted as one file section.
pub trait Section {
    /// Section header, without brackets.
    const NAME: &'static str;

    fn for_each(&self, f: &mut dyn FnMut(Param<'_>));
    fn values(&self, key: &str) -> Option<&[i32]>;
    fn values_mut(&mut self, key: &str) -> Option<&mut [i32]>;
}

/// Storage shapes a parameter may take.
pub trait IntParam {
    const ARRAY: bool;
    fn as_slice(&self) -> &[i32];
    fn as_mut_slice(&mut self) -> &mut [i32];
}

impl IntParam for i32 {
    const ARRAY: bool = false;

    fn as_slice(&self) -> &[i32] {
        core::slice::from_ref(self)
    }

    fn as_mut_slice(&mut self) -> &mut [i32] {
        core::slice::from_mut(self)
    }
}

impl<const N: usize> IntParam for [i32; N] {
    const ARRAY: bool = true;

    fn as_slice(&self) -> &[i32] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [i32] {
        self
    }
}

macro_rules! parameters {
    (
        $(#[$meta:meta])*
        pub struct $name:ident in $section:literal {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty = $default:expr, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $ty, )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self { $( $field: $default, )* }
            }
        }

        impl Section for $name {
            const NAME: &'static str = $section;

            fn for_each(&self, f: &mut dyn FnMut(Param<'_>)) {
                $(
                    f(Param {
                        name: stringify!($field),
                        values: IntParam::as_slice(&self.$field),
                        array: <$ty as IntParam>::ARRAY,
                    });
                )*
            }

            fn values(&self, key: &str) -> Option<&[i32]> {
                match key {
                    $( stringify!($field) => Some(IntParam::as_slice(&self.$field)), )*
                    _ => None,
                }
            }

            fn values_mut(&mut self, key: &str) -> Option<&mut [i32]> {
                match key {
                    $( stringify!($field) => Some(IntParam::as_mut_slice(&mut self.$field)), )*
                    _ => None,
                }
            }
        }
    };
}

const AF_CENTER: i32 = AfPattern::CENTER.0 as i32;

parameters! {
    /// User settings, persisted in `SETTINGS.INI`.
    pub struct Settings in "settings" {
        /// D-pad works as arrow keys with the viewfinder face sensor.
        use_dpad: i32 = 1,
        autoiso_enable: i32 = 0,
        /// Which of the five ISO steps an ISO bracket covers.
        iso_aeb: [i32; 5] = [1; 5],
        keep_power_on: i32 = 1,
        developers_menu: i32 = 0,
        shortcut_jump: i32 = 1,
        shortcut_trash: i32 = 2,
        button_disp: i32 = 0,
        language: i32 = 0,
        /// Releasing AV on an unchanged page list keeps the list open.
        menu_navmain: i32 = 0,
        /// Open the main menu on its page list.
        menu_entermain: i32 = 0,
        /// Reopen the main menu on the last visited page.
        menu_autosave: i32 = 1,
        menu_last_page: i32 = 0,
        named_temps_cur_line: i32 = 0,
        named_temps_top_of_page_line: i32 = 0,
        af_pattern_horizontal: i32 = AF_CENTER,
        af_pattern_vertical_left: i32 = AF_CENTER,
        af_pattern_vertical_right: i32 = AF_CENTER,
    }
}

/// Identity permutation on `[0, N)`.
pub const fn identity<const N: usize>() -> [i32; N] {
    let mut out = [0; N];
    let mut i = 0;
    while i < N {
        out[i] = i as i32;
        i += 1;
    }
    out
}

pub const MAIN_PAGES: usize = 3;
pub const PARAMS_ITEMS: usize = 6;
pub const SHORTCUTS_ITEMS: usize = 3;
pub const SETTINGS_ITEMS: usize = 4;

parameters! {
    /// Custom display order of the main menu pages and of their items,
    /// persisted in `MENU_ORDER.INI`.
    pub struct MenuOrder in "menu_order" {
        main: [i32; MAIN_PAGES] = identity(),
        params: [i32; PARAMS_ITEMS] = identity(),
        shortcuts: [i32; SHORTCUTS_ITEMS] = identity(),
        settings: [i32; SETTINGS_ITEMS] = identity(),
    }
}

/// Whether `ordering` is a bijection on `[0, len)`.
pub fn is_permutation(ordering: &[i32]) -> bool {
    if ordering.len() > MAX_ORDERING {
        return false;
    }
    let mut seen = [false; MAX_ORDERING];
    for &v in ordering {
        let Ok(idx) = usize::try_from(v) else {
            return false;
        };
        if idx >= ordering.len() || seen[idx] {
            return false;
        }
        seen[idx] = true;
    }
    true
}

/// Reset `ordering` to identity unless it already is a permutation.
/// Returns `true` if it had to be repaired.
pub fn repair_ordering(ordering: &mut [i32]) -> bool {
    if is_permutation(ordering) {
        return false;
    }
    for (i, v) in ordering.iter_mut().enumerate() {
        *v = i as i32;
    }
    true
}

impl MenuOrder {
    /// Repair every ordering that is not a permutation.
    pub fn repair(&mut self) -> bool {
        let mut repaired = false;
        for ordering in [
            &mut self.main[..],
            &mut self.params[..],
            &mut self.shortcuts[..],
            &mut self.settings[..],
        ] {
            repaired |= repair_ordering(ordering);
        }
        if repaired {
            warn!("menu order was not a permutation, reset");
        }
        repaired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_firmware() {
        let s = Settings::default();
        assert_eq!(s.use_dpad, 1);
        assert_eq!(s.iso_aeb, [1; 5]);
        assert_eq!(s.menu_autosave, 1);
        assert_eq!(s.shortcut_jump, 1);
        assert_eq!(s.af_pattern_horizontal, 1);
    }

    #[test]
    fn section_exposes_fields_in_declaration_order() {
        let s = Settings::default();
        let mut names: heapless::Vec<&'static str, 32> = heapless::Vec::new();
        let mut arrays = 0;
        s.for_each(&mut |p| {
            names.push(p.name).unwrap();
            if p.array {
                arrays += 1;
            }
        });
        assert_eq!(names[0], "use_dpad");
        assert_eq!(names[2], "iso_aeb");
        assert_eq!(names.len(), 18);
        assert_eq!(arrays, 1);
    }

    #[test]
    fn values_by_key() {
        let mut s = Settings::default();
        s.values_mut("iso_aeb").unwrap()[3] = 0;
        assert_eq!(s.iso_aeb, [1, 1, 1, 0, 1]);
        assert_eq!(s.values("language"), Some(&[0][..]));
        assert!(s.values("no_such_key").is_none());
    }

    #[test]
    fn identity_orders_by_default() {
        let o = MenuOrder::default();
        assert_eq!(o.main, [0, 1, 2]);
        assert_eq!(o.params, [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn permutation_check() {
        assert!(is_permutation(&[2, 0, 1]));
        assert!(is_permutation(&[]));
        assert!(!is_permutation(&[0, 0, 1]));
        assert!(!is_permutation(&[0, 3, 1]));
        assert!(!is_permutation(&[-1, 0, 1]));
    }

    #[test]
    fn repair_resets_only_broken_orderings() {
        let mut o = MenuOrder::default();
        o.main = [2, 1, 0];
        o.params = [0, 0, 0, 0, 0, 0];
        assert!(o.repair());
        assert_eq!(o.main, [2, 1, 0]);
        assert_eq!(o.params, identity::<PARAMS_ITEMS>());
        assert!(!o.repair());
    }
}
