//! Schema-validated parser for the line-oriented level format.
//!
//! A level file looks like:
//!
//! ```text
//! Dimensions: 640,480
//! Gates: 1
//! GatePos: 0.5,0.25,1.5707963267948966
//! GateX: 280,320,320,280
//! GateY: 60,60,156,156
//! TopX: ...
//! TopY: ...
//! BottomX: ...
//! BottomY: ...
//! Surfaces: 1
//! IsDeepTissue: false
//! SurfaceX: 380,460,460,380
//! SurfaceY: 100,100,180,180
//! ```
//!
//! Every label must match exactly; any mismatch, truncation, or unparsable
//! value aborts loading with a [`LevelError`]. Parsing produces plain data
//! records, decoupled from the geometry built on top of them.

use std::fs;
use std::path::Path;

use crate::error::LevelError;

/// A parsed level description.
#[derive(Clone, Debug)]
pub struct Level {
    pub width: f64,
    pub height: f64,
    pub gates: Vec<GateSpec>,
    pub surfaces: Vec<SurfaceSpec>,
}

/// Raw gate record as read from a level file, before geometric normalization.
#[derive(Clone, Debug)]
pub struct GateSpec {
    /// Fractional x, fractional y, orientation in radians.
    pub pos: [f64; 3],
    pub corners_x: [f64; 4],
    pub corners_y: [f64; 4],
    pub top_x: [f64; 4],
    pub top_y: [f64; 4],
    pub bottom_x: [f64; 4],
    pub bottom_y: [f64; 4],
}

/// Raw tissue surface record.
#[derive(Clone, Debug)]
pub struct SurfaceSpec {
    pub deep: bool,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Level {
    /// Parses a level from its textual description.
    ///
    /// # Errors
    ///
    /// Returns a [`LevelError`] on any schema violation.
    pub fn from_str(src: &str) -> Result<Self, LevelError> {
        let mut reader = Reader {
            lines: src.lines(),
        };

        let dims = reader.fixed::<2>("Dimensions")?;
        let (width, height) = (dims[0], dims[1]);

        let ngates = reader.count("Gates")?;
        let mut gates = Vec::with_capacity(ngates);
        for _ in 0..ngates {
            gates.push(reader.gate()?);
        }

        let nsurfaces = reader.count("Surfaces")?;
        let mut surfaces = Vec::with_capacity(nsurfaces);
        for _ in 0..nsurfaces {
            surfaces.push(reader.surface()?);
        }

        Ok(Self {
            width,
            height,
            gates,
            surfaces,
        })
    }

    /// Reads and parses a level file.
    ///
    /// # Errors
    ///
    /// Returns a [`LevelError`] if the file cannot be read or violates the
    /// schema.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let src = fs::read_to_string(path)?;
        Self::from_str(&src)
    }
}

struct Reader<'a> {
    lines: std::str::Lines<'a>,
}

impl Reader<'_> {
    /// Reads one `Label: v1,v2,...` line and returns the raw values.
    fn field(&mut self, name: &'static str) -> Result<Vec<String>, LevelError> {
        let line = self.lines.next().ok_or(LevelError::Truncated(name))?;
        let Some((label, rest)) = line.split_once(": ") else {
            return Err(LevelError::FieldMismatch {
                expected: name,
                found: line.to_owned(),
            });
        };
        if label != name {
            return Err(LevelError::FieldMismatch {
                expected: name,
                found: label.to_owned(),
            });
        }
        Ok(rest.split(',').map(str::to_owned).collect())
    }

    fn floats(&mut self, name: &'static str) -> Result<Vec<f64>, LevelError> {
        self.field(name)?
            .into_iter()
            .map(|v| {
                v.trim()
                    .parse::<f64>()
                    .map_err(|_| LevelError::BadNumber {
                        field: name,
                        value: v,
                    })
            })
            .collect()
    }

    fn fixed<const N: usize>(&mut self, name: &'static str) -> Result<[f64; N], LevelError> {
        let values = self.floats(name)?;
        let found = values.len();
        values
            .try_into()
            .map_err(|_| LevelError::FieldArity {
                field: name,
                expected: N,
                found,
            })
    }

    fn count(&mut self, name: &'static str) -> Result<usize, LevelError> {
        let values = self.fixed::<1>(name)?;
        if values[0] < 0.0 || values[0].fract() != 0.0 {
            return Err(LevelError::BadNumber {
                field: name,
                value: values[0].to_string(),
            });
        }
        Ok(values[0] as usize)
    }

    fn flag(&mut self, name: &'static str) -> Result<bool, LevelError> {
        let values = self.field(name)?;
        match values.first().map(String::as_str) {
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            _ => Err(LevelError::BadFlag {
                field: name,
                value: values.join(","),
            }),
        }
    }

    fn gate(&mut self) -> Result<GateSpec, LevelError> {
        Ok(GateSpec {
            pos: self.fixed::<3>("GatePos")?,
            corners_x: self.fixed::<4>("GateX")?,
            corners_y: self.fixed::<4>("GateY")?,
            top_x: self.fixed::<4>("TopX")?,
            top_y: self.fixed::<4>("TopY")?,
            bottom_x: self.fixed::<4>("BottomX")?,
            bottom_y: self.fixed::<4>("BottomY")?,
        })
    }

    fn surface(&mut self) -> Result<SurfaceSpec, LevelError> {
        let deep = self.flag("IsDeepTissue")?;
        let xs = self.floats("SurfaceX")?;
        let ys = self.floats("SurfaceY")?;
        if xs.len() != ys.len() {
            return Err(LevelError::FieldArity {
                field: "SurfaceY",
                expected: xs.len(),
                found: ys.len(),
            });
        }
        Ok(SurfaceSpec { deep, xs, ys })
    }
}
