//! The fixed set of state labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PlateWatchError;

/// Number of labels in the master list.
pub const STATE_COUNT: usize = 50;

/// Master list of state names, in display order.
pub const ALL_STATES: [&str; STATE_COUNT] = [
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
];

/// One of the 50 fixed state labels.
///
/// A `Label` can only be obtained from the master list, so holding one is
/// proof that the name is valid. Ordering follows the master list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(u8);

impl Label {
    /// Returns every label in master order.
    pub fn all() -> impl Iterator<Item = Label> {
        (0..STATE_COUNT as u8).map(Label)
    }

    /// Looks up a label by its exact name.
    pub fn from_name(name: &str) -> Option<Label> {
        ALL_STATES
            .iter()
            .position(|state| *state == name)
            .map(|index| Label(index as u8))
    }

    /// Looks up a label ignoring ASCII case and surrounding whitespace.
    ///
    /// Interactive input goes through here; stored keys use [`Label::from_name`].
    pub fn find(name: &str) -> Option<Label> {
        let name = name.trim();
        ALL_STATES
            .iter()
            .position(|state| state.eq_ignore_ascii_case(name))
            .map(|index| Label(index as u8))
    }

    /// Position of this label in the master list.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The state name, which is also the store key.
    pub fn name(self) -> &'static str {
        ALL_STATES[self.index()]
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Label {
    type Err = PlateWatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::from_name(s).ok_or_else(|| PlateWatchError::invalid_label(s))
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
