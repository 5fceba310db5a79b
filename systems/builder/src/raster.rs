//! Binary PPM (`P6`) decoding into classified pixels.

use arena_core::Point;
use thiserror::Error;

const MAGIC: &str = "P6";
const SUPPORTED_MAX_VALUE: u32 = 255;
const CHANNELS: usize = 3;

/// Reasons a source bitmap is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MalformedInputError {
    /// The file does not start with the `P6` magic token.
    #[error("expected PPM magic 'P6', found '{0}'")]
    BadMagic(String),
    /// The header ended before the named field.
    #[error("PPM header is missing the {0}")]
    MissingHeaderField(&'static str),
    /// A header field could not be parsed as a positive integer.
    #[error("PPM header field {field} has invalid value '{value}'")]
    InvalidHeaderField {
        /// Name of the offending field.
        field: &'static str,
        /// Raw text of the field.
        value: String,
    },
    /// Width times height does not fit in memory addressing.
    #[error("bitmap dimensions {width}x{height} are too large")]
    DimensionsTooLarge {
        /// Declared width.
        width: usize,
        /// Declared height.
        height: usize,
    },
    /// Only one byte per channel is supported.
    #[error("unsupported maximum channel value {0} (expected 255)")]
    UnsupportedMaxValue(u32),
    /// Fewer pixel bytes than the header promised.
    #[error("pixel data truncated: expected {expected} bytes, found {actual}")]
    TruncatedPixelData {
        /// Bytes required by the header dimensions.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },
    /// Pixel count does not match the dimensions.
    #[error("expected {expected} pixels for the given dimensions, found {actual}")]
    PixelCountMismatch {
        /// Pixels required by the dimensions.
        expected: usize,
        /// Pixels supplied.
        actual: usize,
    },
    /// A pixel uses a colour outside the four recognised classes.
    #[error("pixel ({x}, {y}) has disallowed colour #{red:02x}{green:02x}{blue:02x}")]
    DisallowedColor {
        /// Column of the pixel.
        x: usize,
        /// Row of the pixel.
        y: usize,
        /// Red channel.
        red: u8,
        /// Green channel.
        green: u8,
        /// Blue channel.
        blue: u8,
    },
    /// No pixel marks the tracked target's spawn.
    #[error("no primary spawn pixel (pure blue) in image")]
    MissingPrimarySpawn,
    /// More than one pixel marks the tracked target's spawn.
    #[error("primary spawn marked twice, at {first:?} and {second:?}")]
    DuplicatePrimarySpawn {
        /// First marker found in raster order.
        first: (usize, usize),
        /// Second marker found in raster order.
        second: (usize, usize),
    },
    /// No pixel marks a hostile spawn.
    #[error("no secondary spawn pixel (pure red) in image")]
    MissingSecondarySpawn,
}

/// Classification of a single source pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pixel {
    /// Walkable floor, pure white.
    Background,
    /// Solid wall, pure black.
    Obstacle,
    /// Walkable spawn of the tracked target, pure blue.
    PrimarySpawn,
    /// Walkable spawn of a hostile agent, pure red.
    SecondarySpawn,
}

impl Pixel {
    /// Classifies an RGB triple, returning `None` for disallowed colours.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Option<Self> {
        match (red, green, blue) {
            (255, 255, 255) => Some(Self::Background),
            (0, 0, 0) => Some(Self::Obstacle),
            (0, 0, 255) => Some(Self::PrimarySpawn),
            (255, 0, 0) => Some(Self::SecondarySpawn),
            _ => None,
        }
    }

    /// Reports whether agents may stand on the pixel.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Obstacle)
    }
}

/// Classified raster with a single primary spawn and at least one secondary spawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
    primary_spawn: (usize, usize),
    secondary_spawns: Vec<(usize, usize)>,
}

impl Raster {
    /// Decodes a binary PPM file.
    ///
    /// The header is `P6`, width, height and maximum value separated by
    /// whitespace, with `#` comments allowed, followed by exactly one
    /// whitespace byte and the raw RGB triples.
    pub fn parse_ppm(bytes: &[u8]) -> Result<Self, MalformedInputError> {
        let mut cursor = HeaderCursor { bytes, position: 0 };

        let magic = cursor
            .token()
            .ok_or(MalformedInputError::MissingHeaderField("magic token"))?;
        if magic != MAGIC {
            return Err(MalformedInputError::BadMagic(magic));
        }

        let width = cursor.dimension("width")?;
        let height = cursor.dimension("height")?;
        let max_value = cursor.dimension("maximum value")?;
        if max_value != SUPPORTED_MAX_VALUE {
            return Err(MalformedInputError::UnsupportedMaxValue(max_value));
        }

        // single whitespace byte separates the header from the raster
        let data = bytes.get(cursor.position + 1..).unwrap_or(&[]);
        let width = width as usize;
        let height = height as usize;
        let expected = pixel_count(width, height)?
            .checked_mul(CHANNELS)
            .ok_or(MalformedInputError::DimensionsTooLarge { width, height })?;
        if data.len() < expected {
            return Err(MalformedInputError::TruncatedPixelData {
                expected,
                actual: data.len(),
            });
        }

        let mut pixels = Vec::with_capacity(expected / CHANNELS);
        for (index, rgb) in data[..expected].chunks_exact(CHANNELS).enumerate() {
            let pixel = Pixel::from_rgb(rgb[0], rgb[1], rgb[2]).ok_or_else(|| {
                MalformedInputError::DisallowedColor {
                    x: index % width,
                    y: index / width,
                    red: rgb[0],
                    green: rgb[1],
                    blue: rgb[2],
                }
            })?;
            pixels.push(pixel);
        }

        Self::from_pixels(width, height, pixels)
    }

    /// Builds a raster from already classified pixels in row-major order.
    pub fn from_pixels(
        width: usize,
        height: usize,
        pixels: Vec<Pixel>,
    ) -> Result<Self, MalformedInputError> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(MalformedInputError::PixelCountMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        let mut primary_spawn = None;
        let mut secondary_spawns = Vec::new();
        for (index, pixel) in pixels.iter().enumerate() {
            let coord = (index % width, index / width);
            match pixel {
                Pixel::PrimarySpawn => match primary_spawn {
                    None => primary_spawn = Some(coord),
                    Some(first) => {
                        return Err(MalformedInputError::DuplicatePrimarySpawn {
                            first,
                            second: coord,
                        })
                    }
                },
                Pixel::SecondarySpawn => secondary_spawns.push(coord),
                Pixel::Background | Pixel::Obstacle => {}
            }
        }

        let primary_spawn = primary_spawn.ok_or(MalformedInputError::MissingPrimarySpawn)?;
        if secondary_spawns.is_empty() {
            return Err(MalformedInputError::MissingSecondarySpawn);
        }

        Ok(Self {
            width,
            height,
            pixels,
            primary_spawn,
            secondary_spawns,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Reports whether the raster has no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel at the provided column and row.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Location of the tracked target's spawn marker.
    #[must_use]
    pub const fn primary_spawn(&self) -> (usize, usize) {
        self.primary_spawn
    }

    /// Locations of hostile spawn markers in raster order.
    #[must_use]
    pub fn secondary_spawns(&self) -> &[(usize, usize)] {
        &self.secondary_spawns
    }

    /// Centre of the pixel at row-major `index`.
    #[must_use]
    pub(crate) fn center_of(&self, index: usize) -> Point {
        Point::new(
            (index % self.width) as f64 + 0.5,
            (index / self.width) as f64 + 0.5,
        )
    }
}

fn pixel_count(width: usize, height: usize) -> Result<usize, MalformedInputError> {
    width
        .checked_mul(height)
        .ok_or(MalformedInputError::DimensionsTooLarge { width, height })
}

struct HeaderCursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl HeaderCursor<'_> {
    fn token(&mut self) -> Option<String> {
        loop {
            match self.bytes.get(self.position)? {
                b'#' => {
                    while !matches!(self.bytes.get(self.position), None | Some(b'\n')) {
                        self.position += 1;
                    }
                }
                byte if byte.is_ascii_whitespace() => self.position += 1,
                _ => break,
            }
        }

        let start = self.position;
        while self
            .bytes
            .get(self.position)
            .is_some_and(|byte| !byte.is_ascii_whitespace())
        {
            self.position += 1;
        }

        Some(String::from_utf8_lossy(&self.bytes[start..self.position]).into_owned())
    }

    fn dimension(&mut self, field: &'static str) -> Result<u32, MalformedInputError> {
        let token = self
            .token()
            .ok_or(MalformedInputError::MissingHeaderField(field))?;
        match token.parse::<u32>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(MalformedInputError::InvalidHeaderField {
                field,
                value: token,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 3] = [255, 255, 255];
    const BLACK: [u8; 3] = [0, 0, 0];
    const BLUE: [u8; 3] = [0, 0, 255];
    const RED: [u8; 3] = [255, 0, 0];

    fn ppm(header: &str, pixels: &[[u8; 3]]) -> Vec<u8> {
        let mut bytes = header.as_bytes().to_vec();
        for rgb in pixels {
            bytes.extend_from_slice(rgb);
        }
        bytes
    }

    #[test]
    fn parses_header_with_comments() {
        let bytes = ppm(
            "P6\n# exported by hand\n2 2\n255\n",
            &[BLUE, WHITE, BLACK, RED],
        );
        let raster = Raster::parse_ppm(&bytes).expect("valid ppm");

        assert_eq!((raster.width(), raster.height()), (2, 2));
        assert_eq!(raster.pixel(0, 1), Some(Pixel::Obstacle));
        assert_eq!(raster.pixel(2, 0), None);
        assert_eq!(raster.primary_spawn(), (0, 0));
        assert_eq!(raster.secondary_spawns(), &[(1, 1)]);
    }

    #[test]
    fn rejects_wrong_magic_and_depth() {
        assert_eq!(
            Raster::parse_ppm(b"P3\n1 1\n255\n"),
            Err(MalformedInputError::BadMagic("P3".to_owned()))
        );
        assert_eq!(
            Raster::parse_ppm(b"P6\n1 1\n65535\n"),
            Err(MalformedInputError::UnsupportedMaxValue(65535))
        );
        assert_eq!(
            Raster::parse_ppm(b"P6\n1"),
            Err(MalformedInputError::MissingHeaderField("height"))
        );
        assert!(matches!(
            Raster::parse_ppm(b"P6\n0 4\n255\n"),
            Err(MalformedInputError::InvalidHeaderField { field: "width", .. })
        ));
    }

    #[test]
    fn rejects_dimensions_that_overflow() {
        assert_eq!(
            Raster::parse_ppm(b"P6\n4294967295 4294967295\n255\n\x00\x00\xff"),
            Err(MalformedInputError::DimensionsTooLarge {
                width: 4_294_967_295,
                height: 4_294_967_295,
            })
        );
        assert_eq!(
            Raster::from_pixels(usize::MAX, 2, vec![Pixel::PrimarySpawn]),
            Err(MalformedInputError::DimensionsTooLarge {
                width: usize::MAX,
                height: 2,
            })
        );
    }

    #[test]
    fn rejects_truncated_data() {
        let bytes = ppm("P6\n2 1\n255\n", &[BLUE]);
        assert_eq!(
            Raster::parse_ppm(&bytes),
            Err(MalformedInputError::TruncatedPixelData {
                expected: 6,
                actual: 3,
            })
        );
    }

    #[test]
    fn rejects_disallowed_colours() {
        let bytes = ppm("P6\n3 1\n255\n", &[BLUE, RED, [10, 20, 30]]);
        assert_eq!(
            Raster::parse_ppm(&bytes),
            Err(MalformedInputError::DisallowedColor {
                x: 2,
                y: 0,
                red: 10,
                green: 20,
                blue: 30,
            })
        );
    }

    #[test]
    fn requires_exactly_one_primary_spawn() {
        let missing = ppm("P6\n2 1\n255\n", &[WHITE, RED]);
        assert_eq!(
            Raster::parse_ppm(&missing),
            Err(MalformedInputError::MissingPrimarySpawn)
        );

        let duplicate = ppm("P6\n3 1\n255\n", &[BLUE, RED, BLUE]);
        assert_eq!(
            Raster::parse_ppm(&duplicate),
            Err(MalformedInputError::DuplicatePrimarySpawn {
                first: (0, 0),
                second: (2, 0),
            })
        );

        let no_hostiles = ppm("P6\n2 1\n255\n", &[BLUE, WHITE]);
        assert_eq!(
            Raster::parse_ppm(&no_hostiles),
            Err(MalformedInputError::MissingSecondarySpawn)
        );
    }
}
