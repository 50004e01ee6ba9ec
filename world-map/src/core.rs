use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Terrain {
    Water,
    Land,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u16);

impl RegionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapSize {
    pub width: u16,
    pub height: u16,
}

impl MapSize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn cell_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreError {
    CellCountMismatch { expected: usize, actual: usize },
    UnknownRegion(u16),
    TooManyRegions(usize),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::CellCountMismatch { expected, actual } => {
                write!(f, "cell count mismatch: expected {}, got {}", expected, actual)
            }
            CoreError::UnknownRegion(id) => write!(f, "cell refers to unknown region {}", id),
            CoreError::TooManyRegions(count) => {
                write!(f, "{} regions exceed the region id range", count)
            }
        }
    }
}

impl std::error::Error for CoreError {}

/// Row-major grid of region ownership. `None` cells are water.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionGrid {
    pub name: String,
    pub size: MapSize,
    cells: Vec<Option<RegionId>>,
    regions: Vec<String>,
    by_name: HashMap<String, RegionId>,
}

impl RegionGrid {
    pub fn new(
        name: impl Into<String>,
        size: MapSize,
        cells: Vec<Option<RegionId>>,
        regions: Vec<String>,
    ) -> Result<Self, CoreError> {
        let expected = size.cell_count();
        let actual = cells.len();
        if expected != actual {
            return Err(CoreError::CellCountMismatch { expected, actual });
        }
        if regions.len() > u16::MAX as usize {
            return Err(CoreError::TooManyRegions(regions.len()));
        }
        if let Some(bad) = cells
            .iter()
            .flatten()
            .find(|id| id.index() >= regions.len())
        {
            return Err(CoreError::UnknownRegion(bad.0));
        }

        let by_name = regions
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), RegionId(idx as u16)))
            .collect();

        Ok(Self {
            name: name.into(),
            size,
            cells,
            regions,
            by_name,
        })
    }

    pub fn width(&self) -> u16 {
        self.size.width
    }

    pub fn height(&self) -> u16 {
        self.size.height
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some(y as usize * self.size.width as usize + x as usize)
    }

    pub fn region_at(&self, x: u16, y: u16) -> Option<RegionId> {
        let idx = self.index(x, y)?;
        self.cells.get(idx).copied().flatten()
    }

    pub fn terrain_at(&self, x: u16, y: u16) -> Terrain {
        match self.region_at(x, y) {
            Some(_) => Terrain::Land,
            None => Terrain::Water,
        }
    }

    pub fn region_name(&self, id: RegionId) -> Option<&str> {
        self.regions.get(id.index()).map(String::as_str)
    }

    /// Exact, case-sensitive lookup.
    pub fn region_by_name(&self, name: &str) -> Option<RegionId> {
        self.by_name.get(name).copied()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn regions(&self) -> impl Iterator<Item = (RegionId, &str)> {
        self.regions
            .iter()
            .enumerate()
            .map(|(idx, name)| (RegionId(idx as u16), name.as_str()))
    }

    pub fn cell_count(&self, id: RegionId) -> usize {
        self.cells.iter().filter(|cell| **cell == Some(id)).count()
    }
}

pub trait MapRead {
    fn map_size(&self) -> MapSize;
    fn region_at(&self, x: u16, y: u16) -> Option<RegionId>;
    fn region_name(&self, id: RegionId) -> Option<&str>;
    fn region_by_name(&self, name: &str) -> Option<RegionId>;
    fn region_count(&self) -> usize;
}

impl MapRead for RegionGrid {
    fn map_size(&self) -> MapSize {
        self.size
    }

    fn region_at(&self, x: u16, y: u16) -> Option<RegionId> {
        self.region_at(x, y)
    }

    fn region_name(&self, id: RegionId) -> Option<&str> {
        self.region_name(id)
    }

    fn region_by_name(&self, name: &str) -> Option<RegionId> {
        self.region_by_name(name)
    }

    fn region_count(&self) -> usize {
        self.region_count()
    }
}
