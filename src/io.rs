//! Readers and writers for the plain-text files around the estimator.
//!
//! - obstacle lists: a count followed by `xmin ymin xmax ymax` rows
//! - sensor positions: a count followed by `x y` rows
//! - sample lists: `x y concentration` or `x y z concentration` per line
//! - map dumps: see [`GasMap::dump`]
//!
//! Count-prefixed files are read as a stream of whitespace-separated tokens,
//! so row breaks are not significant.

use crate::config::Config;
use crate::error::{GasMapError, Result};
use crate::map::{GasMap, Layer, Observation, parse_dump};
use odormap_types::bbox::{AxisAlignedRect, ObstacleSet};
use odormap_types::point::Point3d;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read};
use std::path::Path;

/// Load a [`Config`] from a `.json` or `.toml` file.
pub fn read_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Config::from_json(&text),
        #[cfg(feature = "toml")]
        Some("toml") => Config::from_toml(&text),
        other => Err(GasMapError::InvalidConfig(format!(
            "Unsupported config file extension: {:?}",
            other
        ))),
    }
}

struct Tokens<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    current: Option<(usize, std::str::SplitWhitespace<'a>)>,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            current: None,
            last_line: 1,
        }
    }

    fn next_token(&mut self) -> Option<(usize, &'a str)> {
        loop {
            if let Some((line, words)) = self.current.as_mut()
                && let Some(word) = words.next()
            {
                return Some((*line, word));
            }
            let (n, text) = self.lines.next()?;
            self.last_line = n + 1;
            self.current = Some((n + 1, text.split_whitespace()));
        }
    }

    fn next_value<T: std::str::FromStr>(&mut self, what: &str) -> Result<T>
    where
        T::Err: std::fmt::Display,
    {
        let (line, token) = self.next_token().ok_or_else(|| {
            GasMapError::parse(self.last_line, format!("unexpected end of input, expected {}", what))
        })?;
        token
            .parse::<T>()
            .map_err(|e| GasMapError::parse(line, format!("invalid {} {:?}: {}", what, token, e)))
    }
}

fn read_text<R: Read>(mut reader: R) -> Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

/// Parse an obstacle list. File rows are `xmin ymin xmax ymax`; order is kept.
pub fn read_obstacles<R: Read>(reader: R) -> Result<ObstacleSet> {
    let text = read_text(reader)?;
    let mut tokens = Tokens::new(&text);

    let count: usize = tokens.next_value("obstacle count")?;
    let mut obstacles = ObstacleSet::new();
    for _ in 0..count {
        let x_min: f64 = tokens.next_value("xmin")?;
        let y_min: f64 = tokens.next_value("ymin")?;
        let x_max: f64 = tokens.next_value("xmax")?;
        let y_max: f64 = tokens.next_value("ymax")?;
        obstacles.push(AxisAlignedRect::from_corners(x_min, y_min, x_max, y_max));
    }

    log::debug!("Read {} obstacles", obstacles.len());
    Ok(obstacles)
}

pub fn load_obstacles<P: AsRef<Path>>(path: P) -> Result<ObstacleSet> {
    read_obstacles(File::open(path)?)
}

/// Parse a sensor position list. Positions are placed on the floor (z = 0).
pub fn read_sensor_positions<R: Read>(reader: R) -> Result<Vec<Point3d>> {
    let text = read_text(reader)?;
    let mut tokens = Tokens::new(&text);

    let count: usize = tokens.next_value("sensor count")?;
    let mut positions = Vec::with_capacity(count);
    for _ in 0..count {
        let x: f64 = tokens.next_value("x")?;
        let y: f64 = tokens.next_value("y")?;
        positions.push(Point3d::planar(x, y));
    }
    Ok(positions)
}

pub fn load_sensor_positions<P: AsRef<Path>>(path: P) -> Result<Vec<Point3d>> {
    read_sensor_positions(File::open(path)?)
}

/// Parse one observation per line: `x y c` or `x y z c`, separated by
/// whitespace and/or commas. Blank lines and `#` comments are skipped.
pub fn read_samples<R: Read>(reader: R) -> Result<Vec<Observation>> {
    let mut observations = Vec::new();

    for (n, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let line_no = n + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let values = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<f64>()
                    .map_err(|e| GasMapError::parse(line_no, format!("invalid number {:?}: {}", t, e)))
            })
            .collect::<Result<Vec<f64>>>()?;

        let observation = match values.as_slice() {
            [x, y, c] => Observation::new(Point3d::planar(*x, *y), *c),
            [x, y, z, c] => Observation::new(Point3d::new(*x, *y, *z), *c),
            other => {
                return Err(GasMapError::parse(
                    line_no,
                    format!("expected 3 or 4 values, got {}", other.len()),
                ));
            }
        };
        observations.push(observation);
    }

    Ok(observations)
}

pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<Observation>> {
    read_samples(File::open(path)?)
}

/// Write the map dump to a file, replacing any previous content.
pub fn save_dump<P: AsRef<Path>>(map: &GasMap, path: P) -> Result<()> {
    let file = File::create(path)?;
    map.write_dump(BufWriter::new(file))
}

/// Read a dump file back into a layer of the given shape.
pub fn load_dump<P: AsRef<Path>>(path: P, nx: usize, ny: usize) -> Result<Layer> {
    let text = fs::read_to_string(path)?;
    parse_dump(&text, nx, ny)
}
