use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    pub fn from_descriptor_char(c: u8) -> Option<Self> {
        Some(match c {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    pub fn descriptor_char(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Base(BaseType),
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    /// Number of leading `[` dimensions and the innermost element type.
    pub fn element(&self) -> (usize, &FieldType) {
        let mut dims = 0;
        let mut ty = self;
        while let FieldType::Array(component) = ty {
            dims += 1;
            ty = component;
        }
        (dims, ty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let mut pos = 0;
    let ty = field_type(desc, &mut pos)?;
    if pos != desc.len() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }
    Ok(ty)
}

/// Parse a method descriptor such as `(ILjava/lang/String;)[I`.
pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let bytes = desc.as_bytes();
    if bytes.first() != Some(&b'(') {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }

    let mut pos = 1;
    let mut params = Vec::new();
    loop {
        match bytes.get(pos) {
            Some(b')') => {
                pos += 1;
                break;
            }
            Some(_) => params.push(field_type(desc, &mut pos)?),
            None => return Err(Error::InvalidDescriptor(desc.to_string())),
        }
    }

    let return_type = match bytes.get(pos) {
        Some(b'V') => {
            pos += 1;
            ReturnType::Void
        }
        Some(_) => ReturnType::Type(field_type(desc, &mut pos)?),
        None => return Err(Error::InvalidDescriptor(desc.to_string())),
    };

    if pos != desc.len() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }
    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

fn field_type(desc: &str, pos: &mut usize) -> Result<FieldType> {
    let bytes = desc.as_bytes();
    let Some(&c) = bytes.get(*pos) else {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    };
    *pos += 1;

    if let Some(base) = BaseType::from_descriptor_char(c) {
        return Ok(FieldType::Base(base));
    }
    match c {
        b'L' => {
            let rest = &desc[*pos..];
            let end = rest
                .find(';')
                .filter(|end| *end > 0)
                .ok_or_else(|| Error::InvalidDescriptor(desc.to_string()))?;
            *pos += end + 1;
            Ok(FieldType::Object(rest[..end].to_string()))
        }
        b'[' => Ok(FieldType::Array(Box::new(field_type(desc, pos)?))),
        _ => Err(Error::InvalidDescriptor(desc.to_string())),
    }
}
