//! A line-oriented parser for the scene description format (§6.1).
//!
//! Grammar, informally:
//!
//! ```text
//! scene      := object*
//! object     := kind ident ':' ident '{' property* '}'
//! kind       := "shape" | "bsdf" | "medium" | "texture" | "light"
//!             | "entity" | "camera" | "technique"
//! property   := ident '=' value
//! value      := number | string | vector3 | transform
//! vector3    := '(' number ',' number ',' number ')'
//! transform  := "identity"
//!             | "translate" '(' number ',' number ',' number ')'
//!             | "scale" '(' number ',' number ',' number ')'
//!             | "matrix" '(' number (',' number){15} ')'
//! string     := '"' .. '"'
//! ```
//!
//! This is the input grammar only; PExpr source carried inside a string
//! property is opaque here (§4.5, Non-goals).

use crate::error::ParseError;
use crate::object::Object;
use crate::property::Property;
use crate::scene::Scene;
use cgmath::Matrix4;
use ignis_base::cgmath64::Vector3;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Number(f64),
    Str(String),
    Colon,
    LBrace,
    RBrace,
    Equals,
    LParen,
    RParen,
    Comma,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    src: &'a str,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self { chars: src.char_indices().peekable(), src, line: 1 }
    }

    fn tokenize(mut self) -> Result<Vec<(Token, usize)>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(&(start, c)) = self.chars.peek() {
            match c {
                ' ' | '\t' | '\r' => { self.chars.next(); }
                '\n' => { self.chars.next(); self.line += 1; }
                '#' => {
                    while let Some(&(_, c)) = self.chars.peek() {
                        if c == '\n' { break; }
                        self.chars.next();
                    }
                }
                ':' => { self.chars.next(); tokens.push((Token::Colon, self.line)); }
                '{' => { self.chars.next(); tokens.push((Token::LBrace, self.line)); }
                '}' => { self.chars.next(); tokens.push((Token::RBrace, self.line)); }
                '=' => { self.chars.next(); tokens.push((Token::Equals, self.line)); }
                '(' => { self.chars.next(); tokens.push((Token::LParen, self.line)); }
                ')' => { self.chars.next(); tokens.push((Token::RParen, self.line)); }
                ',' => { self.chars.next(); tokens.push((Token::Comma, self.line)); }
                '"' => {
                    let line = self.line;
                    self.chars.next();
                    let body_start = self.pos();
                    let mut closed = false;
                    while let Some(&(i, c)) = self.chars.peek() {
                        if c == '"' {
                            let s = self.src[body_start..i].to_string();
                            self.chars.next();
                            tokens.push((Token::Str(s), line));
                            closed = true;
                            break;
                        }
                        if c == '\n' { break; }
                        self.chars.next();
                    }
                    if !closed {
                        return Err(ParseError::UnterminatedString { line });
                    }
                }
                c if c.is_ascii_digit() || c == '-' || c == '+' => {
                    let line = self.line;
                    let end = self.scan_while(start, |c| {
                        c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || c == '-' || c == '+'
                    });
                    let text = &self.src[start..end];
                    let n: f64 = text.parse().map_err(|_| ParseError::UnexpectedToken {
                        line,
                        found: text.to_string(),
                        expected: "number",
                    })?;
                    tokens.push((Token::Number(n), line));
                }
                c if c.is_alphabetic() || c == '_' => {
                    let line = self.line;
                    let end = self.scan_while(start, |c| c.is_alphanumeric() || c == '_');
                    tokens.push((Token::Ident(self.src[start..end].to_string()), line));
                }
                other => {
                    return Err(ParseError::UnexpectedToken {
                        line: self.line,
                        found: other.to_string(),
                        expected: "a token",
                    });
                }
            }
        }
        Ok(tokens)
    }

    fn pos(&mut self) -> usize {
        self.chars.peek().map(|&(i, _)| i).unwrap_or(self.src.len())
    }

    fn scan_while(&mut self, start: usize, pred: impl Fn(char) -> bool) -> usize {
        let mut end = start;
        while let Some(&(i, c)) = self.chars.peek() {
            if !pred(c) { break; }
            end = i + c.len_utf8();
            self.chars.next();
        }
        end
    }
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> { self.tokens.get(self.pos).map(|(t, _)| t) }
    fn line(&self) -> usize {
        self.tokens.get(self.pos).or_else(|| self.tokens.last()).map(|(_, l)| *l).unwrap_or(1)
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        self.pos += 1;
        t
    }

    fn expect_ident(&mut self, expected: &'static str) -> Result<String, ParseError> {
        match self.next() {
            Some(Token::Ident(s)) => Ok(s),
            other => Err(ParseError::UnexpectedToken {
                line: self.line(),
                found: format!("{other:?}"),
                expected,
            }),
        }
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<(), ParseError> {
        match self.next() {
            Some(t) if t == token => Ok(()),
            other => Err(ParseError::UnexpectedToken {
                line: self.line(),
                found: format!("{other:?}"),
                expected,
            }),
        }
    }

    fn expect_number(&mut self, expected: &'static str) -> Result<f64, ParseError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            other => Err(ParseError::UnexpectedToken {
                line: self.line(),
                found: format!("{other:?}"),
                expected,
            }),
        }
    }

    fn parse_scene(&mut self) -> Result<Scene, ParseError> {
        let mut scene = Scene::new();
        while self.peek().is_some() {
            self.parse_object(&mut scene)?;
        }
        Ok(scene)
    }

    fn parse_object(&mut self, scene: &mut Scene) -> Result<(), ParseError> {
        let line = self.line();
        let kind = self.expect_ident("an object kind")?;
        let name = self.expect_ident("an object name")?;
        self.expect(Token::Colon, "':'")?;
        let plugin_type = self.expect_ident("a plugin type")?;
        self.expect(Token::LBrace, "'{'")?;
        let mut object = Object::new(name, plugin_type);
        while !matches!(self.peek(), Some(Token::RBrace) | None) {
            let key = self.expect_ident("a property name")?;
            self.expect(Token::Equals, "'='")?;
            let value = self.parse_value()?;
            object.properties.set(key, value);
        }
        self.expect(Token::RBrace, "'}'")?;

        match kind.as_str() {
            "shape" => { scene.shapes.insert(object); }
            "bsdf" => { scene.bsdfs.insert(object); }
            "medium" => { scene.media.insert(object); }
            "texture" => { scene.textures.insert(object); }
            "light" => { scene.lights.insert(object); }
            "entity" => { scene.entities.insert(object); }
            "camera" => {
                if scene.camera.is_some() {
                    return Err(ParseError::DuplicateSingleton { kind: "camera" });
                }
                scene.camera = Some(object);
            }
            "technique" => {
                if scene.technique.is_some() {
                    return Err(ParseError::DuplicateSingleton { kind: "technique" });
                }
                scene.technique = Some(object);
            }
            _ => return Err(ParseError::UnknownKind { line, kind }),
        }
        Ok(())
    }

    fn parse_value(&mut self) -> Result<Property, ParseError> {
        match self.peek().cloned() {
            Some(Token::Number(n)) => {
                self.next();
                if n.fract() == 0.0 {
                    Ok(Property::Integer(n as i64))
                } else {
                    Ok(Property::Number(n))
                }
            }
            Some(Token::Str(s)) => {
                self.next();
                Ok(Property::String(s))
            }
            Some(Token::LParen) => {
                let v = self.parse_vector3()?;
                Ok(Property::Vector3(v))
            }
            Some(Token::Ident(name)) => match name.as_str() {
                "identity" => {
                    self.next();
                    Ok(Property::Transform(Matrix4::from_scale(1.0)))
                }
                "translate" => {
                    self.next();
                    let v = self.parse_vector3()?;
                    Ok(Property::Transform(Matrix4::from_translation(v)))
                }
                "scale" => {
                    self.next();
                    let v = self.parse_vector3()?;
                    Ok(Property::Transform(Matrix4::from_nonuniform_scale(v.x, v.y, v.z)))
                }
                "matrix" => {
                    self.next();
                    self.expect(Token::LParen, "'('")?;
                    let mut values = [0.0f64; 16];
                    for (i, slot) in values.iter_mut().enumerate() {
                        if i > 0 {
                            self.expect(Token::Comma, "','")?;
                        }
                        *slot = self.expect_number("a matrix component")?;
                    }
                    self.expect(Token::RParen, "')'")?;
                    Ok(Property::Transform(Matrix4::new(
                        values[0], values[1], values[2], values[3], values[4], values[5],
                        values[6], values[7], values[8], values[9], values[10], values[11],
                        values[12], values[13], values[14], values[15],
                    )))
                }
                _ => Err(ParseError::UnexpectedToken {
                    line: self.line(),
                    found: name,
                    expected: "a number, string, vector, or transform",
                }),
            },
            other => Err(ParseError::UnexpectedToken {
                line: self.line(),
                found: format!("{other:?}"),
                expected: "a property value",
            }),
        }
    }

    fn parse_vector3(&mut self) -> Result<Vector3, ParseError> {
        self.expect(Token::LParen, "'('")?;
        let x = self.expect_number("vector x")?;
        self.expect(Token::Comma, "','")?;
        let y = self.expect_number("vector y")?;
        self.expect(Token::Comma, "','")?;
        let z = self.expect_number("vector z")?;
        self.expect(Token::RParen, "')'")?;
        Ok(Vector3::new(x, y, z))
    }
}

/// Parses a complete scene description from source text.
pub fn parse_scene(src: &str) -> Result<Scene, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser { tokens, pos: 0 }.parse_scene()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shape_and_entity() {
        let src = r#"
            shape cube1 : cube {
                radius = 1.0
            }
            entity e1 : entity {
                shape = "cube1"
                bsdf = "b1"
                transform = translate(1, 2, 3)
                camera_visible = 1
            }
        "#;
        let scene = parse_scene(src).unwrap();
        assert_eq!(scene.shapes.len(), 1);
        assert_eq!(scene.entities.len(), 1);
        let e1 = scene.entities.get("e1").unwrap();
        assert_eq!(e1.properties.string("shape"), Some("cube1"));
        assert!(e1.properties.boolean("camera_visible", false));
    }

    #[test]
    fn duplicate_camera_is_rejected() {
        let src = r#"
            camera c1 : perspective { fov = 60 }
            camera c2 : perspective { fov = 40 }
        "#;
        assert_eq!(parse_scene(src), Err(ParseError::DuplicateSingleton { kind: "camera" }));
    }

    #[test]
    fn unterminated_string_is_rejected() {
        let src = "shape s : cube {\n  name = \"oops\n}";
        assert!(parse_scene(src).is_err());
    }

    #[test]
    fn vector3_property_round_trips() {
        let src = r#"light l : point { position = (1, 2, 3) }"#;
        let scene = parse_scene(src).unwrap();
        let l = scene.lights.get("l").unwrap();
        assert_eq!(l.properties.vector3("position", Vector3::new(0.0, 0.0, 0.0)), Vector3::new(1.0, 2.0, 3.0));
    }
}
