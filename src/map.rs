use crate::player::Pose;
use glam::Vec2;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Comment marker for map files; comment lines and blank lines are skipped.
const COMMENT: char = ';';

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Floor,
    Wall,
}

impl Cell {
    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(Cell::Wall),
            '.' => Some(Cell::Floor),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("could not read map at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("map has no spawn line")]
    MissingSpawn,
    #[error("malformed spawn line {0:?}, expected `x y heading`")]
    MalformedSpawn(String),
    #[error("map has no rows")]
    Empty,
    #[error("row {row} is {found} cells wide, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("invalid glyph {glyph:?} at ({x}, {y})")]
    InvalidGlyph { glyph: char, x: usize, y: usize },
    #[error("spawn ({x}, {y}) is not on a floor cell")]
    SpawnInWall { x: f32, y: f32 },
}

/// Rectangular wall/floor grid plus the spawn pose, one unit per cell.
///
/// Everything outside the grid counts as wall, so a ray or a player can never
/// leave the map.
#[derive(Clone, PartialEq, Debug)]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    spawn: Pose,
}

impl GridMap {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        log::info!("loading map at {}", path.display());
        let file = read_to_string(path).map_err(|source| MapError::Io {
            path: path.into(),
            source,
        })?;
        file.parse()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn spawn(&self) -> Pose {
        self.spawn
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width + x as usize])
    }

    /// Integer cell query, closed-world: out of bounds is wall.
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).map_or(true, |cell| cell == Cell::Wall)
    }

    /// Continuous query against the cell containing `pos`.
    pub fn is_wall_at(&self, pos: Vec2) -> bool {
        // `as` saturates, so far-away points still land out of bounds
        self.is_wall(pos.x.floor() as i32, pos.y.floor() as i32)
    }

    /// Every cell in row-major order, for minimaps.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (idx % self.width, idx / self.width, *cell))
    }

    fn parse_spawn(line: &str) -> Result<Pose, MapError> {
        let malformed = || MapError::MalformedSpawn(line.into());
        let numbers = line
            .split_whitespace()
            .map(|chunk| chunk.parse::<f32>().map_err(|_| malformed()))
            .collect::<Result<Vec<_>, _>>()?;

        match numbers[..] {
            [x, y, heading] if x.is_finite() && y.is_finite() && heading.is_finite() => {
                Ok(Pose::new(Vec2::new(x, y), heading.to_radians()))
            }
            _ => Err(malformed()),
        }
    }

    fn parse_rows<'lines>(
        lines: impl Iterator<Item = &'lines str>,
    ) -> Result<(usize, Vec<Cell>), MapError> {
        let mut width = None;
        let mut cells = vec![];

        for (y, line) in lines.enumerate() {
            let found = line.chars().count();
            let expected = *width.get_or_insert(found);
            if found != expected {
                return Err(MapError::RaggedRow {
                    row: y,
                    found,
                    expected,
                });
            }

            for (x, glyph) in line.chars().enumerate() {
                let cell = Cell::from_glyph(glyph).ok_or(MapError::InvalidGlyph { glyph, x, y })?;
                cells.push(cell);
            }
        }

        match width {
            Some(width) if width > 0 => Ok((width, cells)),
            _ => Err(MapError::Empty),
        }
    }
}

impl FromStr for GridMap {
    type Err = MapError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut lines = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty() && !line.starts_with(COMMENT));

        let spawn = Self::parse_spawn(lines.next().ok_or(MapError::MissingSpawn)?)?;
        let (width, cells) = Self::parse_rows(lines)?;

        let this = Self {
            width,
            height: cells.len() / width,
            cells,
            spawn,
        };

        if this.is_wall_at(spawn.pos) {
            return Err(MapError::SpawnInWall {
                x: spawn.pos.x,
                y: spawn.pos.y,
            });
        }

        log::debug!(
            "map is {}x{}, spawn at {} facing {:.3} rad",
            this.width,
            this.height,
            spawn.pos,
            spawn.heading
        );

        Ok(this)
    }
}
