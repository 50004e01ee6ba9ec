//! Bundled world atlas: a coarse land mask whose land cells are assigned to
//! countries by nearest anchor point.

use std::collections::HashMap;
use std::fmt;

use crate::core::{CoreError, MapRead, MapSize, RegionGrid, RegionId, Terrain};
use crate::parse::{parse_char_grid, LandMask, Legend, ParseError, ParseOptions, TrimMode};

pub const WORLD_MASK: &str = include_str!("../assets/world.txt");

/// A named point used to claim nearby land cells for a country.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub name: &'static str,
    pub lat: f32,
    pub lon: f32,
}

impl Anchor {
    pub const fn new(name: &'static str, lat: f32, lon: f32) -> Self {
        Self { name, lat, lon }
    }
}

/// Equirectangular mapping between grid cells and geographic coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridProjection {
    pub north: f32,
    pub west: f32,
    pub lat_step: f32,
    pub lon_step: f32,
}

impl GridProjection {
    pub const WORLD: GridProjection = GridProjection {
        north: 80.0,
        west: -180.0,
        lat_step: 5.0,
        lon_step: 2.5,
    };

    /// Latitude and longitude of a cell's center.
    pub fn cell_center(&self, x: u16, y: u16) -> (f32, f32) {
        let lat = self.north - self.lat_step * (y as f32 + 0.5);
        let lon = self.west + self.lon_step * (x as f32 + 0.5);
        (lat, lon)
    }

    pub fn cell_of(&self, lat: f32, lon: f32, size: MapSize) -> Option<(u16, u16)> {
        let row = ((self.north - lat) / self.lat_step).floor();
        let col = ((lon - self.west) / self.lon_step).floor();
        if row < 0.0 || col < 0.0 || row >= size.height as f32 || col >= size.width as f32 {
            return None;
        }
        Some((col as u16, row as u16))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AtlasError {
    Parse(ParseError),
    Core(CoreError),
    NoAnchors,
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasError::Parse(err) => write!(f, "world mask: {}", err),
            AtlasError::Core(err) => write!(f, "world grid: {}", err),
            AtlasError::NoAnchors => write!(f, "atlas needs at least one anchor"),
        }
    }
}

impl std::error::Error for AtlasError {}

impl From<ParseError> for AtlasError {
    fn from(err: ParseError) -> Self {
        AtlasError::Parse(err)
    }
}

impl From<CoreError> for AtlasError {
    fn from(err: CoreError) -> Self {
        AtlasError::Core(err)
    }
}

#[derive(Clone, Debug)]
pub struct Atlas {
    pub grid: RegionGrid,
    pub projection: GridProjection,
}

impl Atlas {
    /// Builds the bundled world map.
    pub fn world() -> Result<Self, AtlasError> {
        let mask = parse_char_grid(
            "world",
            WORLD_MASK,
            &Legend::land_mask(),
            &ParseOptions {
                trim_mode: TrimMode::PreserveRightWhitespace,
                default_char: '~',
                default_terrain: Terrain::Water,
            },
        )?;
        Self::from_mask(&mask, GridProjection::WORLD, WORLD_ANCHORS)
    }

    /// Assigns each land cell to its nearest anchor. Countries whose anchors
    /// win no cells are left out of the grid.
    pub fn from_mask(
        mask: &LandMask,
        projection: GridProjection,
        anchors: &[Anchor],
    ) -> Result<Self, AtlasError> {
        if anchors.is_empty() {
            return Err(AtlasError::NoAnchors);
        }

        let size = mask.size;
        let mut owners: Vec<Option<&'static str>> = Vec::with_capacity(size.cell_count());
        for y in 0..size.height {
            for x in 0..size.width {
                if !mask.is_land(x, y) {
                    owners.push(None);
                    continue;
                }
                let (lat, lon) = projection.cell_center(x, y);
                owners.push(nearest_anchor(anchors, lat, lon).map(|a| a.name));
            }
        }

        let mut regions: Vec<String> = Vec::new();
        let mut ids: HashMap<&'static str, RegionId> = HashMap::new();
        let mut cells = Vec::with_capacity(owners.len());
        for owner in owners {
            let id = owner.map(|name| {
                *ids.entry(name).or_insert_with(|| {
                    regions.push(name.to_string());
                    RegionId((regions.len() - 1) as u16)
                })
            });
            cells.push(id);
        }

        let grid = RegionGrid::new(mask.name.clone(), size, cells, regions)?;
        Ok(Self { grid, projection })
    }

    pub fn region_at_lat_lon(&self, lat: f32, lon: f32) -> Option<RegionId> {
        let (x, y) = self.projection.cell_of(lat, lon, self.grid.size)?;
        self.grid.region_at(x, y)
    }
}

impl MapRead for Atlas {
    fn map_size(&self) -> MapSize {
        self.grid.size
    }

    fn region_at(&self, x: u16, y: u16) -> Option<RegionId> {
        self.grid.region_at(x, y)
    }

    fn region_name(&self, id: RegionId) -> Option<&str> {
        self.grid.region_name(id)
    }

    fn region_by_name(&self, name: &str) -> Option<RegionId> {
        self.grid.region_by_name(name)
    }

    fn region_count(&self) -> usize {
        self.grid.region_count()
    }
}

fn nearest_anchor(anchors: &[Anchor], lat: f32, lon: f32) -> Option<&Anchor> {
    anchors
        .iter()
        .map(|anchor| (anchor_distance(anchor, lat, lon), anchor))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, anchor)| anchor)
}

// Squared distance with longitude scaled by the mean latitude and wrapped at
// the antimeridian.
fn anchor_distance(anchor: &Anchor, lat: f32, lon: f32) -> f32 {
    let mut dl = (lon - anchor.lon).abs();
    dl = dl.min(360.0 - dl);
    let dx = dl * ((lat + anchor.lat) / 2.0).to_radians().cos();
    let dy = lat - anchor.lat;
    dx * dx + dy * dy
}

/// Country names follow the Natural Earth short-name convention used by the
/// availability backend.
pub const WORLD_ANCHORS: &[Anchor] = &[
    Anchor::new("Canada", 60.0, -110.0),
    Anchor::new("Canada", 55.0, -75.0),
    Anchor::new("Canada", 70.0, -95.0),
    Anchor::new("Canada", 52.0, -120.0),
    Anchor::new("Canada", 48.0, -65.0),
    Anchor::new("United States of America", 40.0, -100.0),
    Anchor::new("United States of America", 35.0, -85.0),
    Anchor::new("United States of America", 42.0, -120.0),
    Anchor::new("United States of America", 42.0, -75.0),
    Anchor::new("United States of America", 64.0, -152.0),
    Anchor::new("Greenland", 72.0, -40.0),
    Anchor::new("Greenland", 78.0, -55.0),
    Anchor::new("Mexico", 24.0, -103.0),
    Anchor::new("Mexico", 18.0, -96.0),
    Anchor::new("Guatemala", 15.5, -90.3),
    Anchor::new("Belize", 17.2, -88.7),
    Anchor::new("Honduras", 14.8, -86.6),
    Anchor::new("El Salvador", 13.7, -88.9),
    Anchor::new("Nicaragua", 12.9, -85.0),
    Anchor::new("Costa Rica", 10.0, -84.0),
    Anchor::new("Panama", 8.5, -80.5),
    Anchor::new("Cuba", 21.5, -79.0),
    Anchor::new("Jamaica", 18.1, -77.3),
    Anchor::new("Haiti", 19.0, -72.5),
    Anchor::new("Dominican Rep.", 18.9, -70.5),
    Anchor::new("Puerto Rico", 18.2, -66.5),
    Anchor::new("Bahamas", 24.5, -77.5),
    Anchor::new("Colombia", 4.0, -73.0),
    Anchor::new("Venezuela", 7.0, -66.0),
    Anchor::new("Guyana", 5.0, -59.0),
    Anchor::new("Suriname", 4.0, -56.0),
    Anchor::new("Ecuador", -1.5, -78.5),
    Anchor::new("Peru", -9.0, -75.0),
    Anchor::new("Brazil", -10.0, -52.0),
    Anchor::new("Brazil", -5.0, -62.0),
    Anchor::new("Brazil", -20.0, -46.0),
    Anchor::new("Brazil", -5.0, -40.0),
    Anchor::new("Bolivia", -17.0, -64.0),
    Anchor::new("Paraguay", -23.0, -58.0),
    Anchor::new("Uruguay", -33.0, -56.0),
    Anchor::new("Argentina", -34.0, -64.0),
    Anchor::new("Argentina", -45.0, -68.0),
    Anchor::new("Chile", -30.0, -71.0),
    Anchor::new("Chile", -45.0, -73.0),
    Anchor::new("Falkland Is.", -51.7, -59.5),
    Anchor::new("Iceland", 65.0, -18.0),
    Anchor::new("Ireland", 53.0, -8.0),
    Anchor::new("United Kingdom", 54.0, -2.0),
    Anchor::new("Norway", 62.0, 9.0),
    Anchor::new("Norway", 69.0, 18.0),
    Anchor::new("Sweden", 62.0, 16.0),
    Anchor::new("Finland", 64.0, 26.0),
    Anchor::new("Denmark", 56.0, 10.0),
    Anchor::new("Estonia", 58.7, 25.5),
    Anchor::new("Latvia", 56.9, 24.6),
    Anchor::new("Lithuania", 55.3, 23.9),
    Anchor::new("Belarus", 53.5, 28.0),
    Anchor::new("Poland", 52.0, 19.5),
    Anchor::new("Germany", 51.0, 10.0),
    Anchor::new("Netherlands", 52.2, 5.5),
    Anchor::new("Belgium", 50.6, 4.6),
    Anchor::new("Luxembourg", 49.8, 6.1),
    Anchor::new("France", 46.5, 2.5),
    Anchor::new("Switzerland", 46.8, 8.2),
    Anchor::new("Austria", 47.5, 14.5),
    Anchor::new("Czechia", 49.8, 15.5),
    Anchor::new("Slovakia", 48.7, 19.7),
    Anchor::new("Hungary", 47.2, 19.4),
    Anchor::new("Slovenia", 46.1, 14.8),
    Anchor::new("Croatia", 45.3, 16.0),
    Anchor::new("Bosnia and Herz.", 44.2, 17.8),
    Anchor::new("Serbia", 44.0, 20.8),
    Anchor::new("Montenegro", 42.8, 19.3),
    Anchor::new("Kosovo", 42.6, 20.9),
    Anchor::new("Albania", 41.1, 20.0),
    Anchor::new("Macedonia", 41.6, 21.7),
    Anchor::new("Greece", 39.3, 22.0),
    Anchor::new("Bulgaria", 42.7, 25.3),
    Anchor::new("Romania", 45.9, 25.0),
    Anchor::new("Moldova", 47.2, 28.5),
    Anchor::new("Ukraine", 49.0, 32.0),
    Anchor::new("Italy", 42.8, 12.5),
    Anchor::new("Italy", 40.0, 16.0),
    Anchor::new("Spain", 40.0, -3.7),
    Anchor::new("Portugal", 39.6, -8.0),
    Anchor::new("Russia", 60.0, 40.0),
    Anchor::new("Russia", 62.0, 70.0),
    Anchor::new("Russia", 62.0, 100.0),
    Anchor::new("Russia", 65.0, 130.0),
    Anchor::new("Russia", 66.0, 160.0),
    Anchor::new("Russia", 53.0, 50.0),
    Anchor::new("Russia", 74.0, 100.0),
    Anchor::new("Russia", 52.0, 135.0),
    Anchor::new("Turkey", 39.0, 35.0),
    Anchor::new("Cyprus", 35.0, 33.0),
    Anchor::new("Georgia", 42.2, 43.5),
    Anchor::new("Armenia", 40.2, 45.0),
    Anchor::new("Azerbaijan", 40.3, 47.7),
    Anchor::new("Kazakhstan", 48.0, 67.0),
    Anchor::new("Kazakhstan", 47.0, 80.0),
    Anchor::new("Uzbekistan", 41.5, 64.0),
    Anchor::new("Turkmenistan", 39.0, 59.5),
    Anchor::new("Kyrgyzstan", 41.5, 74.5),
    Anchor::new("Tajikistan", 38.8, 71.0),
    Anchor::new("Afghanistan", 33.9, 66.0),
    Anchor::new("Pakistan", 29.5, 69.5),
    Anchor::new("Iran", 32.5, 54.0),
    Anchor::new("Iraq", 33.0, 43.7),
    Anchor::new("Syria", 35.0, 38.5),
    Anchor::new("Lebanon", 33.9, 35.9),
    Anchor::new("Israel", 31.4, 35.0),
    Anchor::new("Palestine", 31.9, 35.3),
    Anchor::new("Jordan", 31.0, 36.5),
    Anchor::new("Saudi Arabia", 24.0, 45.0),
    Anchor::new("Yemen", 15.8, 47.5),
    Anchor::new("Oman", 20.5, 56.5),
    Anchor::new("United Arab Emirates", 23.9, 54.3),
    Anchor::new("Qatar", 25.3, 51.2),
    Anchor::new("Kuwait", 29.3, 47.6),
    Anchor::new("India", 22.0, 79.0),
    Anchor::new("India", 15.0, 77.0),
    Anchor::new("India", 27.0, 75.0),
    Anchor::new("Nepal", 28.3, 84.0),
    Anchor::new("Bhutan", 27.4, 90.4),
    Anchor::new("Bangladesh", 23.8, 90.3),
    Anchor::new("Sri Lanka", 7.8, 80.7),
    Anchor::new("China", 35.0, 104.0),
    Anchor::new("China", 30.0, 90.0),
    Anchor::new("China", 42.0, 86.0),
    Anchor::new("China", 45.0, 125.0),
    Anchor::new("China", 26.0, 114.0),
    Anchor::new("Mongolia", 46.8, 103.0),
    Anchor::new("North Korea", 40.2, 127.0),
    Anchor::new("South Korea", 36.4, 127.8),
    Anchor::new("Japan", 36.5, 138.5),
    Anchor::new("Japan", 43.3, 142.5),
    Anchor::new("Taiwan", 23.7, 121.0),
    Anchor::new("Myanmar", 21.0, 96.0),
    Anchor::new("Thailand", 15.5, 101.0),
    Anchor::new("Laos", 19.0, 102.5),
    Anchor::new("Cambodia", 12.7, 105.0),
    Anchor::new("Vietnam", 16.0, 107.0),
    Anchor::new("Vietnam", 21.0, 105.5),
    Anchor::new("Malaysia", 3.8, 102.0),
    Anchor::new("Malaysia", 3.5, 114.0),
    Anchor::new("Brunei", 4.5, 114.7),
    Anchor::new("Philippines", 12.5, 122.0),
    Anchor::new("Philippines", 7.5, 125.0),
    Anchor::new("Indonesia", -0.5, 101.5),
    Anchor::new("Indonesia", -7.3, 110.0),
    Anchor::new("Indonesia", -1.0, 114.5),
    Anchor::new("Indonesia", -2.0, 121.0),
    Anchor::new("Indonesia", -4.0, 137.0),
    Anchor::new("Timor-Leste", -8.8, 125.9),
    Anchor::new("Papua New Guinea", -6.0, 145.0),
    Anchor::new("Solomon Is.", -9.0, 160.0),
    Anchor::new("Australia", -25.0, 134.0),
    Anchor::new("Australia", -20.0, 122.0),
    Anchor::new("Australia", -30.0, 146.0),
    Anchor::new("Australia", -16.0, 143.0),
    Anchor::new("Australia", -42.0, 146.5),
    Anchor::new("New Zealand", -38.5, 176.0),
    Anchor::new("New Zealand", -44.0, 170.0),
    Anchor::new("New Caledonia", -21.3, 165.5),
    Anchor::new("Fiji", -17.8, 178.0),
    Anchor::new("Morocco", 31.8, -6.5),
    Anchor::new("W. Sahara", 24.5, -13.0),
    Anchor::new("Algeria", 28.0, 2.6),
    Anchor::new("Tunisia", 34.0, 9.5),
    Anchor::new("Libya", 27.0, 17.0),
    Anchor::new("Egypt", 26.5, 30.0),
    Anchor::new("Sudan", 16.0, 30.0),
    Anchor::new("S. Sudan", 7.5, 30.5),
    Anchor::new("Eritrea", 15.3, 39.0),
    Anchor::new("Ethiopia", 9.0, 39.5),
    Anchor::new("Djibouti", 11.8, 42.6),
    Anchor::new("Somaliland", 9.7, 45.5),
    Anchor::new("Somalia", 4.0, 45.5),
    Anchor::new("Kenya", 0.5, 37.8),
    Anchor::new("Uganda", 1.3, 32.4),
    Anchor::new("Rwanda", -2.0, 30.0),
    Anchor::new("Burundi", -3.4, 29.9),
    Anchor::new("Tanzania", -6.3, 34.8),
    Anchor::new("Mauritania", 20.3, -10.3),
    Anchor::new("Mali", 17.5, -3.5),
    Anchor::new("Niger", 17.5, 9.5),
    Anchor::new("Chad", 15.3, 18.7),
    Anchor::new("Senegal", 14.4, -14.5),
    Anchor::new("Gambia", 13.4, -15.4),
    Anchor::new("Guinea-Bissau", 12.0, -15.0),
    Anchor::new("Guinea", 10.4, -10.9),
    Anchor::new("Sierra Leone", 8.5, -11.8),
    Anchor::new("Liberia", 6.4, -9.4),
    Anchor::new("Côte d'Ivoire", 7.6, -5.5),
    Anchor::new("Burkina Faso", 12.3, -1.7),
    Anchor::new("Ghana", 7.9, -1.0),
    Anchor::new("Togo", 8.6, 1.0),
    Anchor::new("Benin", 9.6, 2.3),
    Anchor::new("Nigeria", 9.6, 8.1),
    Anchor::new("Cameroon", 5.7, 12.7),
    Anchor::new("Central African Rep.", 6.6, 20.5),
    Anchor::new("Eq. Guinea", 1.6, 10.5),
    Anchor::new("Gabon", -0.6, 11.6),
    Anchor::new("Congo", -0.7, 15.2),
    Anchor::new("Dem. Rep. Congo", -2.9, 23.6),
    Anchor::new("Dem. Rep. Congo", -8.0, 25.0),
    Anchor::new("Angola", -12.3, 17.5),
    Anchor::new("Zambia", -13.5, 27.8),
    Anchor::new("Malawi", -13.2, 34.3),
    Anchor::new("Mozambique", -17.3, 35.5),
    Anchor::new("Zimbabwe", -19.0, 29.8),
    Anchor::new("Botswana", -22.2, 23.8),
    Anchor::new("Namibia", -22.1, 17.2),
    Anchor::new("South Africa", -29.0, 25.0),
    Anchor::new("Lesotho", -29.6, 28.2),
    Anchor::new("eSwatini", -26.5, 31.5),
    Anchor::new("Madagascar", -19.4, 46.7),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn name_at(atlas: &Atlas, lat: f32, lon: f32) -> Option<&str> {
        atlas
            .region_at_lat_lon(lat, lon)
            .and_then(|id| atlas.region_name(id))
    }

    #[test]
    fn world_atlas_loads() {
        let atlas = Atlas::world().expect("atlas");
        assert_eq!(atlas.map_size(), MapSize::new(144, 27));
        assert!(atlas.region_count() > 100);
    }

    #[test]
    fn known_points_resolve_to_countries() {
        let atlas = Atlas::world().expect("atlas");
        assert_eq!(name_at(&atlas, 40.0, -100.0), Some("United States of America"));
        assert_eq!(name_at(&atlas, -10.0, -52.0), Some("Brazil"));
        assert_eq!(name_at(&atlas, 62.0, 100.0), Some("Russia"));
        assert_eq!(name_at(&atlas, -25.0, 134.0), Some("Australia"));
        assert_eq!(name_at(&atlas, 46.5, 2.5), Some("France"));
        assert_eq!(name_at(&atlas, 22.0, 79.0), Some("India"));
    }

    #[test]
    fn open_ocean_is_water() {
        let atlas = Atlas::world().expect("atlas");
        assert_eq!(atlas.region_at_lat_lon(0.0, -140.0), None);
        assert_eq!(atlas.region_at_lat_lon(-30.0, -20.0), None);
    }

    #[test]
    fn regions_are_numbered_in_scan_order() {
        let atlas = Atlas::world().expect("atlas");
        assert_eq!(atlas.region_name(RegionId(0)), Some("Canada"));
        assert_eq!(atlas.region_name(RegionId(1)), Some("Greenland"));
    }

    #[test]
    fn anchors_without_cells_are_dropped() {
        let mask = parse_char_grid("tiny", "#~", &Legend::land_mask(), &ParseOptions::default())
            .expect("mask");
        let projection = GridProjection {
            north: 10.0,
            west: 0.0,
            lat_step: 10.0,
            lon_step: 10.0,
        };
        let anchors = [Anchor::new("Near", 5.0, 5.0), Anchor::new("Far", 5.0, 15.0)];
        let atlas = Atlas::from_mask(&mask, projection, &anchors).expect("atlas");

        assert_eq!(atlas.region_count(), 1);
        assert_eq!(atlas.region_by_name("Near"), Some(RegionId(0)));
        assert_eq!(atlas.region_by_name("Far"), None);
    }

    #[test]
    fn empty_anchor_list_is_rejected() {
        let mask = parse_char_grid("tiny", "#", &Legend::land_mask(), &ParseOptions::default())
            .expect("mask");
        let err = Atlas::from_mask(&mask, GridProjection::WORLD, &[]).expect_err("should fail");
        assert_eq!(err, AtlasError::NoAnchors);
    }

    #[test]
    fn distance_wraps_across_antimeridian() {
        let anchor = Anchor::new("Fiji", 0.0, 179.0);
        assert!(anchor_distance(&anchor, 0.0, -179.0) < 5.0);
    }

    #[test]
    fn cell_center_round_trips() {
        let size = MapSize::new(144, 27);
        let (lat, lon) = GridProjection::WORLD.cell_center(32, 8);
        assert_eq!(GridProjection::WORLD.cell_of(lat, lon, size), Some((32, 8)));
        assert_eq!(GridProjection::WORLD.cell_of(85.0, 0.0, size), None);
    }
}
