/// Parsers for textual shape and color descriptors
///
/// Shapes: `triangle`, `square`, `cube`, `icosphere` or `icosphere:<levels>`.
/// Colors: `#rrggbb`, `r,g,b` with 0-255 channels, or a handful of names.
use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while_m_n},
    character::complete::{char, space0, u32 as decimal_u32, u8 as decimal_u8},
    combinator::{all_consuming, map, map_res, opt, value},
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::color::Rgb;
use crate::error::ParseError;
use crate::shapes::{ShapeKind, MAX_ICOSPHERE_LEVEL};

/// Subdivision level used when `icosphere` is given without one.
pub const DEFAULT_ICOSPHERE_LEVEL: u32 = 4;

fn shape(input: &str) -> IResult<&str, ShapeKind> {
    alt((
        value(ShapeKind::Triangle, tag_no_case("triangle")),
        value(ShapeKind::Square, tag_no_case("square")),
        value(ShapeKind::Cube, tag_no_case("cube")),
        map(
            preceded(
                alt((tag_no_case("icosphere"), tag_no_case("sphere"))),
                opt(preceded(char(':'), decimal_u32)),
            ),
            |levels| ShapeKind::Icosphere {
                levels: levels.unwrap_or(DEFAULT_ICOSPHERE_LEVEL),
            },
        ),
    ))(input)
}

fn hex_byte(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()), |s| {
        u8::from_str_radix(s, 16)
    })(input)
}

fn hex_color(input: &str) -> IResult<&str, Rgb> {
    map(
        preceded(char('#'), tuple((hex_byte, hex_byte, hex_byte))),
        |(r, g, b)| Rgb::from_rgb8(r, g, b),
    )(input)
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(space0, char(','), space0)(input)
}

fn decimal_color(input: &str) -> IResult<&str, Rgb> {
    map(
        tuple((decimal_u8, comma, decimal_u8, comma, decimal_u8)),
        |(r, _, g, _, b)| Rgb::from_rgb8(r, g, b),
    )(input)
}

fn named_color(input: &str) -> IResult<&str, Rgb> {
    alt((
        value(Rgb::WHITE, tag("white")),
        value(Rgb::BLACK, tag("black")),
        value(Rgb::new(1.0, 0.0, 0.0), tag("red")),
        value(Rgb::new(0.0, 1.0, 0.0), tag("green")),
        value(Rgb::new(0.0, 0.0, 1.0), tag("blue")),
    ))(input)
}

fn color(input: &str) -> IResult<&str, Rgb> {
    alt((hex_color, decimal_color, named_color))(input)
}

impl FromStr for ShapeKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, shape) = all_consuming(shape)(s.trim())
            .map_err(|_| ParseError::UnknownShape(s.to_string()))?;
        match shape {
            ShapeKind::Icosphere { levels } if levels > MAX_ICOSPHERE_LEVEL => {
                Err(ParseError::LevelTooHigh {
                    level: levels,
                    max: MAX_ICOSPHERE_LEVEL,
                })
            }
            shape => Ok(shape),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Triangle => f.write_str("triangle"),
            ShapeKind::Square => f.write_str("square"),
            ShapeKind::Cube => f.write_str("cube"),
            ShapeKind::Icosphere { levels } => write!(f, "icosphere:{levels}"),
        }
    }
}

impl FromStr for Rgb {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(color)(s.trim())
            .map(|(_, rgb)| rgb)
            .map_err(|_| ParseError::MalformedColor(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shapes() {
        assert_eq!("triangle".parse(), Ok(ShapeKind::Triangle));
        assert_eq!("Square".parse(), Ok(ShapeKind::Square));
        assert_eq!(" cube ".parse(), Ok(ShapeKind::Cube));
        assert_eq!("icosphere:2".parse(), Ok(ShapeKind::Icosphere { levels: 2 }));
        assert_eq!(
            "sphere".parse(),
            Ok(ShapeKind::Icosphere {
                levels: DEFAULT_ICOSPHERE_LEVEL
            })
        );
    }

    #[test]
    fn test_shape_display_parses_back() {
        for shape in [
            ShapeKind::Triangle,
            ShapeKind::Square,
            ShapeKind::Cube,
            ShapeKind::Icosphere { levels: 0 },
            ShapeKind::Icosphere { levels: 5 },
        ] {
            assert_eq!(shape.to_string().parse(), Ok(shape));
        }
    }

    #[test]
    fn test_reject_bad_shapes() {
        assert_eq!(
            "torus".parse::<ShapeKind>(),
            Err(ParseError::UnknownShape("torus".into()))
        );
        assert!("cube:3".parse::<ShapeKind>().is_err());
        assert!("icosphere:".parse::<ShapeKind>().is_err());
        assert_eq!(
            "icosphere:12".parse::<ShapeKind>(),
            Err(ParseError::LevelTooHigh { level: 12, max: MAX_ICOSPHERE_LEVEL })
        );
    }

    #[test]
    fn test_parse_colors() {
        assert_eq!("#ff0000".parse(), Ok(Rgb::new(1.0, 0.0, 0.0)));
        assert_eq!("#FFffFF".parse(), Ok(Rgb::WHITE));
        assert_eq!("0, 255,0".parse(), Ok(Rgb::new(0.0, 1.0, 0.0)));
        assert_eq!("blue".parse(), Ok(Rgb::new(0.0, 0.0, 1.0)));
        assert_eq!("#336699".parse::<Rgb>().unwrap().to_rgb8(), [0x33, 0x66, 0x99]);
    }

    #[test]
    fn test_reject_bad_colors() {
        for bad in ["#12345", "#gg0000", "256,0,0", "1,2", "purple", ""] {
            assert_eq!(
                bad.parse::<Rgb>(),
                Err(ParseError::MalformedColor(bad.to_string())),
                "{bad:?}"
            );
        }
    }
}
