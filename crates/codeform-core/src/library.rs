//! UI library choices offered by the form.
//!
//! The selected library is interpolated into the prompt by its display name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CodeformError;

/// The UI library the generated component should be written against.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LibraryMode {
    /// Plain CSS.
    #[default]
    #[serde(rename = "CSS")]
    Css,

    #[serde(rename = "Tailwind CSS")]
    TailwindCss,

    #[serde(rename = "MUI")]
    Mui,

    #[serde(rename = "AntDesign")]
    AntDesign,

    #[serde(rename = "ChakraUI")]
    ChakraUi,

    #[serde(rename = "React Bootstrap")]
    ReactBootstrap,
}

impl LibraryMode {
    /// Every mode, in selector order.
    pub const ALL: [LibraryMode; 6] = [
        LibraryMode::Css,
        LibraryMode::TailwindCss,
        LibraryMode::Mui,
        LibraryMode::AntDesign,
        LibraryMode::ChakraUi,
        LibraryMode::ReactBootstrap,
    ];

    /// Name as shown in the selector and embedded in the prompt.
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryMode::Css => "CSS",
            LibraryMode::TailwindCss => "Tailwind CSS",
            LibraryMode::Mui => "MUI",
            LibraryMode::AntDesign => "AntDesign",
            LibraryMode::ChakraUi => "ChakraUI",
            LibraryMode::ReactBootstrap => "React Bootstrap",
        }
    }
}

impl fmt::Display for LibraryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LibraryMode {
    type Err = CodeformError;

    /// Accepts the display name, case-insensitively, ignoring spaces and dashes
    /// (`tailwind-css`, `React Bootstrap` and `chakraui` all parse).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        LibraryMode::ALL
            .into_iter()
            .find(|mode| normalize(mode.as_str()) == wanted)
            .ok_or_else(|| {
                CodeformError::Config(format!(
                    "unknown UI library '{}', expected one of: {}",
                    s,
                    LibraryMode::ALL.map(|m| m.as_str()).join(", ")
                ))
            })
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
