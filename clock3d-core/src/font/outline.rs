/// Parser for typeface glyph outline strings
///
/// An outline is a whitespace separated command list in font units:
/// `m x y`, `l x y`, `q x y cpx cpy`, `b x y c1x c1y c2x c2y` and `z`.
/// Curve commands list their end point before their control points.
use nom::{
    branch::alt,
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, value},
    multi::many0,
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};

pub type Point = (f32, f32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { control: Point, to: Point },
    CubicTo { control1: Point, control2: Point, to: Point },
    Close,
}

/// Parse a complete outline string
pub fn parse_outline(input: &str) -> Result<Vec<PathCommand>, String> {
    match all_consuming(terminated(many0(parse_command), multispace0))(input) {
        Ok((_, commands)) => Ok(commands),
        Err(e) => Err(format!("Failed to parse outline: {:?}", e)),
    }
}

fn parse_command(input: &str) -> IResult<&str, PathCommand> {
    let (input, _) = multispace0(input)?;
    alt((
        map(preceded(char('m'), parse_point), PathCommand::MoveTo),
        map(preceded(char('l'), parse_point), PathCommand::LineTo),
        map(
            preceded(char('q'), tuple((parse_point, parse_point))),
            |(to, control)| PathCommand::QuadTo { control, to },
        ),
        map(
            preceded(char('b'), tuple((parse_point, parse_point, parse_point))),
            |(to, control1, control2)| PathCommand::CubicTo {
                control1,
                control2,
                to,
            },
        ),
        value(PathCommand::Close, char('z')),
    ))(input)
}

fn parse_point(input: &str) -> IResult<&str, Point> {
    let (input, x) = preceded(multispace1, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    Ok((input, (x, y)))
}
