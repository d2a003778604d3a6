/// A `RuntimeVisibleAnnotations`/`RuntimeInvisibleAnnotations` entry as recorded on a class,
/// field, method or `package-info`.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub type_descriptor: String,
    pub elements: Vec<(String, ElementValue)>,
}

impl Annotation {
    pub fn new(type_descriptor: impl Into<String>) -> Self {
        Self {
            type_descriptor: type_descriptor.into(),
            elements: Vec::new(),
        }
    }

    pub fn with_element(mut self, name: impl Into<String>, value: ElementValue) -> Self {
        self.elements.push((name.into(), value));
        self
    }

    /// `Ljava/lang/Deprecated;` -> `java/lang/Deprecated`.
    pub fn type_internal_name(&self) -> Option<String> {
        descriptor_to_internal_name(&self.type_descriptor)
    }
}

/// `element_value` (JVMS 4.7.16.1). Also used for `AnnotationDefault`.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Const(ConstValue),
    Enum {
        type_descriptor: String,
        const_name: String,
    },
    /// A return descriptor, e.g. `Ljava/lang/String;`, `[I` or `V`.
    Class(String),
    Annotation(Box<Annotation>),
    Array(Vec<ElementValue>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
}

pub fn descriptor_to_internal_name(desc: &str) -> Option<String> {
    desc.strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
        .map(|name| name.to_string())
}
