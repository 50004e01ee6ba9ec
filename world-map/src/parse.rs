use std::collections::HashMap;
use std::fmt;

use crate::core::{MapSize, Terrain};

/// How each source line is trimmed before its characters become cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrimMode {
    /// Keep leading whitespace so columns stay aligned; drop trailing.
    PreserveRightWhitespace,
    TrimBoth,
}

impl TrimMode {
    fn apply(self, line: &str) -> &str {
        match self {
            TrimMode::PreserveRightWhitespace => line.trim_end(),
            TrimMode::TrimBoth => line.trim(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    pub trim_mode: TrimMode,
    /// Pads short rows; also accepted in the text even if the legend lacks it
    pub default_char: char,
    pub default_terrain: Terrain,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            trim_mode: TrimMode::TrimBoth,
            default_char: ' ',
            default_terrain: Terrain::Water,
        }
    }
}

/// Character to terrain table.
#[derive(Clone, Debug)]
pub struct Legend {
    keys: HashMap<char, Terrain>,
}

impl Legend {
    pub fn builder() -> LegendBuilder {
        LegendBuilder::default()
    }

    /// `#` is land, `~` and `.` are water.
    pub fn land_mask() -> Self {
        let keys = [('#', Terrain::Land), ('~', Terrain::Water), ('.', Terrain::Water)];
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn terrain_for(&self, ch: char) -> Option<Terrain> {
        self.keys.get(&ch).copied()
    }

    fn resolve(&self, ch: char, options: &ParseOptions) -> Result<Terrain, ParseError> {
        match self.terrain_for(ch) {
            Some(terrain) => Ok(terrain),
            None if ch == options.default_char => Ok(options.default_terrain),
            None => Err(ParseError::UnknownLegendKey(ch)),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LegendBuilder {
    keys: HashMap<char, Terrain>,
}

impl LegendBuilder {
    pub fn entry(mut self, ch: char, terrain: Terrain) -> Self {
        self.keys.insert(ch, terrain);
        self
    }

    pub fn build(self) -> Result<Legend, ParseError> {
        if self.keys.is_empty() {
            return Err(ParseError::EmptyLegend);
        }
        if let Some(ch) = self.keys.keys().copied().find(|ch| ch.is_control()) {
            return Err(ParseError::InvalidLegendChar(ch));
        }
        Ok(Legend { keys: self.keys })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    EmptyLegend,
    /// Control characters can't appear in a text grid
    InvalidLegendChar(char),
    UnknownLegendKey(char),
    EmptyMap,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyLegend => f.write_str("legend has no entries"),
            ParseError::InvalidLegendChar(ch) => {
                write!(f, "legend key {ch:?} is a control character")
            }
            ParseError::UnknownLegendKey(ch) => write!(f, "character {ch:?} is not in the legend"),
            ParseError::EmptyMap => f.write_str("map has no rows"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Land/water raster parsed from a character grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LandMask {
    pub name: String,
    pub size: MapSize,
    cells: Vec<Terrain>,
}

impl LandMask {
    /// Out-of-range positions read as water.
    pub fn terrain_at(&self, x: u16, y: u16) -> Terrain {
        if x >= self.size.width || y >= self.size.height {
            return Terrain::Water;
        }
        self.cells[usize::from(y) * usize::from(self.size.width) + usize::from(x)]
    }

    pub fn is_land(&self, x: u16, y: u16) -> bool {
        self.terrain_at(x, y) == Terrain::Land
    }

    pub fn land_count(&self) -> usize {
        self.cells.iter().filter(|t| **t == Terrain::Land).count()
    }
}

/// Parses `text` into a rectangular mask. Blank lines are skipped and
/// short rows are padded with `options.default_char`.
pub fn parse_char_grid(
    name: &str,
    text: &str,
    legend: &Legend,
    options: &ParseOptions,
) -> Result<LandMask, ParseError> {
    let rows = text
        .lines()
        .map(|line| options.trim_mode.apply(line))
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.chars()
                .map(|ch| legend.resolve(ch, options))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let width = rows.iter().map(Vec::len).max().ok_or(ParseError::EmptyMap)?;
    let pad = legend.resolve(options.default_char, options)?;

    let cells = rows
        .iter()
        .flat_map(|row| {
            row.iter()
                .copied()
                .chain(std::iter::repeat(pad))
                .take(width)
        })
        .collect();

    Ok(LandMask {
        name: name.to_string(),
        size: MapSize::new(width as u16, rows.len() as u16),
        cells,
    })
}
