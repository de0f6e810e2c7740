//! Content categories offered by the listing site, and the numbered menu
//! used to pick one interactively.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// A category of songs, each served from its own listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// The base game.
    BaseGame,
    /// First expansion.
    Heavensward,
    /// Second expansion.
    Stormblood,
    /// Third expansion.
    Shadowbringers,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Self; 4] = [
        Self::BaseGame,
        Self::Heavensward,
        Self::Stormblood,
        Self::Shadowbringers,
    ];

    /// URL path segment of the category's listing page, also used as the
    /// output subdirectory name.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::BaseGame => "ffxiv",
            Self::Heavensward => "ex1",
            Self::Stormblood => "ex2",
            Self::Shadowbringers => "ex3",
        }
    }

    /// Human-readable label shown in the menu.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::BaseGame => "Final Fantasy Base Game",
            Self::Heavensward => "Heavensward",
            Self::Stormblood => "Stormblood",
            Self::Shadowbringers => "Shadowbringers",
        }
    }

    /// Menu number of the category (1-based; 0 is reserved for quit).
    #[must_use]
    pub fn menu_number(self) -> u8 {
        match self {
            Self::BaseGame => 1,
            Self::Heavensward => 2,
            Self::Stormblood => 3,
            Self::Shadowbringers => 4,
        }
    }

    /// Looks a category up by its slug.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.slug() == slug)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s.trim()).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|c| c.slug()).collect();
            format!("unknown category '{s}' (expected one of: {})", known.join(", "))
        })
    }
}

/// Result of a menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// The user asked to exit.
    Quit,
    /// The user picked a category.
    Category(Category),
}

/// Parses one line of menu input. Returns `None` for anything that is not a
/// listed number.
#[must_use]
pub fn parse_choice(line: &str) -> Option<MenuChoice> {
    let number: u8 = line.trim().parse().ok()?;
    if number == 0 {
        return Some(MenuChoice::Quit);
    }
    Category::ALL
        .into_iter()
        .find(|category| category.menu_number() == number)
        .map(MenuChoice::Category)
}

/// Prints the menu to `output` and reads selections from `input` until a
/// valid one arrives.
///
/// Invalid lines print "Try Again" and show the menu again. End of input is
/// treated as quitting.
///
/// # Errors
///
/// Returns any IO error from reading `input` or writing `output`.
pub fn prompt_category<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<MenuChoice> {
    let mut line = String::new();
    loop {
        write_menu(output)?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(MenuChoice::Quit);
        }

        if let Some(choice) = parse_choice(&line) {
            return Ok(choice);
        }
        writeln!(output, "Try Again")?;
    }
}

fn write_menu<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "Enter the number of the expansion you want downloaded")?;
    writeln!(output, "[0] Quit")?;
    for category in Category::ALL {
        writeln!(output, "[{}] {}", category.menu_number(), category.label())?;
    }
    write!(output, "> ")?;
    output.flush()
}
