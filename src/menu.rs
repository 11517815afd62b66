//! Menu model for the selection layer.
//!
//! Pure navigation state: which screen is showing and where the cursor
//! is.  Drawing and key reading belong to the front end; it feeds
//! [`MenuInput`]s in and acts on the returned [`MenuAction`].
//!
//! | Screen   | Index 0 | Remaining entries                     |
//! |----------|---------|---------------------------------------|
//! | Main     | Exit    | one per device class (index = class id) |
//! | Program  | Back    | the class's commands, in menu order   |

use crate::app::commands::Selection;
use crate::devices::{BottlesCommand, CauldronCommand, DeviceClass, GlowwormCommand};

/// Title shown above the main menu.
pub const MAIN_TITLE: &str = "Select a Program";

const MAIN_ITEMS: [&str; 1 + DeviceClass::COUNT] = ["Exit", "Bottles", "Cauldron", "Glowworm"];

/// Which list is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    Program(DeviceClass),
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Self::Main => MAIN_TITLE,
            Self::Program(class) => class.name(),
        }
    }

    pub fn item_count(self) -> usize {
        match self {
            Self::Main => MAIN_ITEMS.len(),
            Self::Program(DeviceClass::Bottles) => 1 + BottlesCommand::ALL.len(),
            Self::Program(DeviceClass::Cauldron) => 1 + CauldronCommand::ALL.len(),
            Self::Program(DeviceClass::Glowworm) => 1 + GlowwormCommand::ALL.len(),
        }
    }

    /// Label of entry `index`, or `None` past the end.
    pub fn label(self, index: usize) -> Option<&'static str> {
        let Self::Program(class) = self else {
            return MAIN_ITEMS.get(index).copied();
        };
        if index == 0 {
            return Some("Back");
        }
        let pos = index - 1;
        match class {
            DeviceClass::Bottles => BottlesCommand::ALL.get(pos).map(|c| c.label()),
            DeviceClass::Cauldron => CauldronCommand::ALL.get(pos).map(|c| c.label()),
            DeviceClass::Glowworm => GlowwormCommand::ALL.get(pos).map(|c| c.label()),
        }
    }

    pub fn labels(self) -> impl Iterator<Item = &'static str> {
        (0..self.item_count()).filter_map(move |i| self.label(i))
    }
}

/// A key press, already decoded by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput {
    Up,
    Down,
    Enter,
}

/// What the front end should do after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Cursor moved (or nothing happened); redraw.
    None,
    /// A program menu was opened.
    Open(DeviceClass),
    /// Left a program menu for the main menu.
    Back(DeviceClass),
    /// Exit chosen on the main menu.
    Exit,
    /// A command entry was chosen; hand it to the controller.
    Select(Selection),
}

/// Menu navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Menu {
    screen: Screen,
    cursor: usize,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    pub fn new() -> Self {
        Self {
            screen: Screen::Main,
            cursor: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle(&mut self, input: MenuInput) -> MenuAction {
        match input {
            MenuInput::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                MenuAction::None
            }
            MenuInput::Down => {
                if self.cursor + 1 < self.screen.item_count() {
                    self.cursor += 1;
                }
                MenuAction::None
            }
            MenuInput::Enter => self.enter(),
        }
    }

    fn enter(&mut self) -> MenuAction {
        match self.screen {
            Screen::Main => match DeviceClass::from_index(self.cursor as u8) {
                Some(class) => {
                    self.screen = Screen::Program(class);
                    self.cursor = 0;
                    MenuAction::Open(class)
                }
                None => MenuAction::Exit,
            },
            Screen::Program(class) if self.cursor == 0 => {
                self.screen = Screen::Main;
                self.cursor = class.index() as usize;
                MenuAction::Back(class)
            }
            Screen::Program(class) => {
                MenuAction::Select(Selection::new(class, self.cursor as u8))
            }
        }
    }
}
