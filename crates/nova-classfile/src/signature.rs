//! `Signature` attribute grammar (JVMS 4.7.9.1).

use crate::descriptor::BaseType;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    Base(BaseType),
    Array(Box<TypeSignature>),
    Class(ClassTypeSignature),
    TypeVariable(String),
}

pub type FieldTypeSignature = TypeSignature;

/// `Lpkg/Outer<TT;>.Inner<*>;`
///
/// `segments[0]` is the outermost class that appears in the signature; later segments are
/// member classes written with the `.` suffix syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassTypeSignature {
    /// Slash-separated package, empty for the unnamed package.
    pub package: String,
    pub segments: Vec<SimpleClassTypeSignature>,
}

impl ClassTypeSignature {
    /// Internal name of the class named by the first `n` segments (`n >= 1`).
    pub fn internal_name_of_prefix(&self, n: usize) -> String {
        let mut out = String::new();
        if !self.package.is_empty() {
            out.push_str(&self.package);
            out.push('/');
        }
        for (idx, seg) in self.segments.iter().take(n).enumerate() {
            if idx > 0 {
                out.push('$');
            }
            out.push_str(&seg.name);
        }
        out
    }

    pub fn internal_name(&self) -> String {
        self.internal_name_of_prefix(self.segments.len())
    }

    /// A non-generic reference to `internal_name`.
    pub fn simple(internal_name: &str) -> Self {
        let (package, name) = match internal_name.rsplit_once('/') {
            Some((package, name)) => (package.to_string(), name),
            None => (String::new(), internal_name),
        };
        Self {
            package,
            segments: vec![SimpleClassTypeSignature {
                name: name.to_string(),
                type_arguments: Vec::new(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleClassTypeSignature {
    pub name: String,
    pub type_arguments: Vec<TypeArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArgument {
    /// `*`
    Any,
    Exact(TypeSignature),
    /// `+`
    Extends(TypeSignature),
    /// `-`
    Super(TypeSignature),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParameter {
    pub name: String,
    /// Empty class bounds (`T::Ljava/lang/Comparable;`) are recorded as `None`.
    pub class_bound: Option<TypeSignature>,
    pub interface_bounds: Vec<TypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub super_class: ClassTypeSignature,
    pub interfaces: Vec<ClassTypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<TypeSignature>,
    /// `None` for `V`.
    pub return_type: Option<TypeSignature>,
    pub throws: Vec<TypeSignature>,
}

pub fn parse_class_signature(sig: &str) -> Result<ClassSignature> {
    let mut p = Parser::new(sig);
    let type_parameters = p.type_parameters()?;
    let super_class = p.class_type()?;
    let mut interfaces = Vec::new();
    while !p.at_end() {
        interfaces.push(p.class_type()?);
    }
    Ok(ClassSignature {
        type_parameters,
        super_class,
        interfaces,
    })
}

pub fn parse_method_signature(sig: &str) -> Result<MethodSignature> {
    let mut p = Parser::new(sig);
    let type_parameters = p.type_parameters()?;
    p.expect(b'(')?;
    let mut parameters = Vec::new();
    while p.peek() != Some(b')') {
        parameters.push(p.java_type()?);
    }
    p.expect(b')')?;

    let return_type = if p.eat(b'V') {
        None
    } else {
        Some(p.java_type()?)
    };

    let mut throws = Vec::new();
    while p.eat(b'^') {
        let thrown = match p.peek() {
            Some(b'T') => p.type_variable()?,
            _ => TypeSignature::Class(p.class_type()?),
        };
        throws.push(thrown);
    }
    p.finish()?;

    Ok(MethodSignature {
        type_parameters,
        parameters,
        return_type,
        throws,
    })
}

pub fn parse_field_signature(sig: &str) -> Result<FieldTypeSignature> {
    let mut p = Parser::new(sig);
    let ty = p.reference_type()?;
    p.finish()?;
    Ok(ty)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn error(&self) -> Error {
        Error::InvalidSignature(self.src.to_string())
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, c: u8) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: u8) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn finish(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    /// Identifiers stop at any of the grammar's reserved characters.
    fn identifier(&mut self) -> Result<&'a str> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, b'.' | b';' | b'[' | b'/' | b'<' | b'>' | b':') {
                break;
            }
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error());
        }
        Ok(&self.src[start..self.pos])
    }

    fn type_parameters(&mut self) -> Result<Vec<TypeParameter>> {
        let mut out = Vec::new();
        if !self.eat(b'<') {
            return Ok(out);
        }
        while !self.eat(b'>') {
            let name = self.identifier()?.to_string();
            self.expect(b':')?;
            let class_bound = match self.peek() {
                Some(b'L' | b'T' | b'[') => Some(self.reference_type()?),
                _ => None,
            };
            let mut interface_bounds = Vec::new();
            while self.eat(b':') {
                interface_bounds.push(self.reference_type()?);
            }
            out.push(TypeParameter {
                name,
                class_bound,
                interface_bounds,
            });
        }
        if out.is_empty() {
            return Err(self.error());
        }
        Ok(out)
    }

    fn java_type(&mut self) -> Result<TypeSignature> {
        match self.peek().and_then(BaseType::from_descriptor_char) {
            Some(base) => {
                self.pos += 1;
                Ok(TypeSignature::Base(base))
            }
            None => self.reference_type(),
        }
    }

    fn reference_type(&mut self) -> Result<TypeSignature> {
        match self.peek() {
            Some(b'L') => Ok(TypeSignature::Class(self.class_type()?)),
            Some(b'T') => self.type_variable(),
            Some(b'[') => {
                self.pos += 1;
                Ok(TypeSignature::Array(Box::new(self.java_type()?)))
            }
            _ => Err(self.error()),
        }
    }

    fn type_variable(&mut self) -> Result<TypeSignature> {
        self.expect(b'T')?;
        let name = self.identifier()?.to_string();
        self.expect(b';')?;
        Ok(TypeSignature::TypeVariable(name))
    }

    fn class_type(&mut self) -> Result<ClassTypeSignature> {
        self.expect(b'L')?;

        // The package specifier is every `ident/` prefix before the first simple class name.
        let mut package = String::new();
        let mut name = self.identifier()?;
        while self.eat(b'/') {
            if !package.is_empty() {
                package.push('/');
            }
            package.push_str(name);
            name = self.identifier()?;
        }

        let mut segments = vec![SimpleClassTypeSignature {
            name: name.to_string(),
            type_arguments: self.type_arguments()?,
        }];
        while self.eat(b'.') {
            let name = self.identifier()?.to_string();
            segments.push(SimpleClassTypeSignature {
                name,
                type_arguments: self.type_arguments()?,
            });
        }
        self.expect(b';')?;

        Ok(ClassTypeSignature { package, segments })
    }

    fn type_arguments(&mut self) -> Result<Vec<TypeArgument>> {
        let mut out = Vec::new();
        if !self.eat(b'<') {
            return Ok(out);
        }
        while !self.eat(b'>') {
            let arg = match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    TypeArgument::Any
                }
                Some(b'+') => {
                    self.pos += 1;
                    TypeArgument::Extends(self.reference_type()?)
                }
                Some(b'-') => {
                    self.pos += 1;
                    TypeArgument::Super(self.reference_type()?)
                }
                Some(_) => TypeArgument::Exact(self.reference_type()?),
                None => return Err(self.error()),
            };
            out.push(arg);
        }
        if out.is_empty() {
            return Err(self.error());
        }
        Ok(out)
    }
}
