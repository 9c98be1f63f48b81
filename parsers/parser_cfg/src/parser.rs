//! Grammar for class headers: `class Name [: Parent]` followed by `{` or `;`

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, multispace1},
    combinator::{map, opt},
    multi::many0,
    sequence::{delimited, preceded, tuple},
    IResult,
};

/// What follows a class header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderTail {
    /// `{`, the body starts at `ClassHeader::len + 1`
    Body,
    /// `;`, a forward declaration with no body
    Declaration,
    /// Input ended before `{` or `;`
    EndOfInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHeader<'a> {
    pub name: &'a str,
    pub parent: Option<&'a str>,
    pub tail: HeaderTail,
    /// Bytes consumed up to, not including, the tail character
    pub len: usize,
}

pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parses whitespace and comments
pub fn parse_whitespace_and_comments(input: &str) -> IResult<&str, ()> {
    let (input, _) = many0(alt((
        map(multispace1, |_| ()),
        map(preceded(tag("//"), take_while(|c: char| c != '\n' && c != '\r')), |_| ()),
        map(delimited(tag("/*"), take_until("*/"), tag("*/")), |_| ()),
    )))(input)?;
    Ok((input, ()))
}

/// Parses an identifier token, `[A-Za-z0-9_]+`
pub fn parse_identifier(input: &str) -> IResult<&str, &str> {
    preceded(parse_whitespace_and_comments, take_while1(is_identifier_char))(input)
}

fn parse_inheritance(input: &str) -> IResult<&str, Option<&str>> {
    opt(preceded(
        tuple((parse_whitespace_and_comments, char(':'))),
        parse_identifier,
    ))(input)
}

/// Parses `class Name [: Parent]` up to the character that follows it
pub fn parse_class_header(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    let (input, _) = tag("class")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, name) = parse_identifier(input)?;
    let (input, parent) = parse_inheritance(input)?;
    let (input, _) = parse_whitespace_and_comments(input)?;
    Ok((input, (name, parent)))
}

/// Recognizes a class header at the very start of `input`.
///
/// Returns `None` when the text is not shaped like a header, e.g. the word
/// `class` inside a string or a header followed by something other than a
/// body or a terminator.
pub fn class_header(input: &str) -> Option<ClassHeader<'_>> {
    let (rest, (name, parent)) = parse_class_header(input).ok()?;
    let tail = match rest.chars().next() {
        Some('{') => HeaderTail::Body,
        Some(';') => HeaderTail::Declaration,
        None => HeaderTail::EndOfInput,
        Some(_) => return None,
    };
    Some(ClassHeader {
        name,
        parent,
        tail,
        len: input.len() - rest.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_simple_header() {
        let header = class_header("class Rifle_Base_F {").unwrap();
        assert_eq!(header.name, "Rifle_Base_F");
        assert_eq!(header.parent, None);
        assert_eq!(header.tail, HeaderTail::Body);
        assert_eq!(header.len, 19);
    }

    #[test]
    fn test_header_with_inheritance() {
        let header = class_header("class arifle_MX_F : arifle_MX_Base_F\n{").unwrap();
        assert_eq!(header.name, "arifle_MX_F");
        assert_eq!(header.parent, Some("arifle_MX_Base_F"));
        assert_eq!(header.tail, HeaderTail::Body);
    }

    #[test_case("class Standalone: Base {" ; "no space before colon")]
    #[test_case("class Standalone :Base{" ; "no space after colon")]
    #[test_case("class Standalone /* item */ : Base // parent\n {" ; "comments in header")]
    fn test_header_layouts(input: &str) {
        let header = class_header(input).unwrap();
        assert_eq!(header.name, "Standalone");
        assert_eq!(header.parent, Some("Base"));
        assert_eq!(header.tail, HeaderTail::Body);
        assert_eq!(&input[header.len..header.len + 1], "{");
    }

    #[test]
    fn test_forward_declaration() {
        let header = class_header("class ItemCore;").unwrap();
        assert_eq!(header.name, "ItemCore");
        assert_eq!(header.tail, HeaderTail::Declaration);
    }

    #[test]
    fn test_header_at_end_of_input() {
        let header = class_header("class Dangling : Base  ").unwrap();
        assert_eq!(header.tail, HeaderTail::EndOfInput);
    }

    #[test_case("classes = 2;" ; "longer word")]
    #[test_case("class = \"x\";" ; "property named class")]
    #[test_case("class Foo = 1;" ; "assignment after name")]
    #[test_case("class" ; "keyword only")]
    fn test_not_a_header(input: &str) {
        assert_eq!(class_header(input), None);
    }

    #[test]
    fn test_whitespace_and_comments() {
        let (rest, _) = parse_whitespace_and_comments("  // line\n /* block */\t\nscope").unwrap();
        assert_eq!(rest, "scope");
        let (rest, _) = parse_whitespace_and_comments("//\nx").unwrap();
        assert_eq!(rest, "x");
    }
}
