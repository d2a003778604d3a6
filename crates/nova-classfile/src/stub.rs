use nova_modules::ModuleInfo;

use crate::access::{
    ACC_ABSTRACT, ACC_ANNOTATION, ACC_ENUM, ACC_FINAL, ACC_INTERFACE, ACC_MODULE, ACC_PUBLIC,
    ACC_SUPER, ACC_SYNTHETIC,
};
use crate::annotation::{Annotation, ConstValue, ElementValue};

/// Simple name of `package-info` entries. They mark a package as existing and carry its
/// annotations, but never contribute a type.
pub const PACKAGE_INFO: &str = "package-info";
/// Internal name of the module descriptor entry.
pub const MODULE_INFO: &str = "module-info";

const OBJECT: &str = "java/lang/Object";

/// Structural facts about one compiled type, as produced by a class reader.
///
/// Signatures and descriptors are kept as raw strings; consumers parse them on demand so that
/// a malformed attribute only affects the element that needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassStub {
    pub internal_name: String,
    pub access_flags: u16,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub signature: Option<String>,
    pub annotations: Vec<Annotation>,
    pub inner_classes: Vec<InnerClassInfo>,
    pub enclosing_method: Option<EnclosingMethod>,
    pub fields: Vec<FieldStub>,
    pub methods: Vec<MethodStub>,
    /// Present only for `module-info`.
    pub module: Option<ModuleInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldStub {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub constant_value: Option<ConstValue>,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodStub {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    /// `Exceptions` attribute (internal names).
    pub exceptions: Vec<String>,
    /// `MethodParameters` attribute; may be empty when the class was compiled without it.
    pub parameters: Vec<ParameterInfo>,
    pub annotation_default: Option<ElementValue>,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: Option<String>,
    pub access_flags: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClassInfo {
    pub inner_class: String,
    pub outer_class: Option<String>,
    pub inner_name: Option<String>,
    pub access_flags: u16,
}

/// `EnclosingMethod` attribute of local and anonymous classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosingMethod {
    pub class: String,
    /// `None` when the class is declared in an initializer.
    pub method: Option<(String, String)>,
}

impl ClassStub {
    /// A public class extending `java.lang.Object` (or a root class when `internal_name` is
    /// `java/lang/Object` itself).
    pub fn new(internal_name: impl Into<String>) -> Self {
        let internal_name = internal_name.into();
        let super_class = (internal_name != OBJECT).then(|| OBJECT.to_string());
        Self {
            internal_name,
            access_flags: ACC_PUBLIC | ACC_SUPER,
            super_class,
            interfaces: Vec::new(),
            signature: None,
            annotations: Vec::new(),
            inner_classes: Vec::new(),
            enclosing_method: None,
            fields: Vec::new(),
            methods: Vec::new(),
            module: None,
        }
    }

    pub fn new_interface(internal_name: impl Into<String>) -> Self {
        let mut stub = Self::new(internal_name);
        stub.access_flags = ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT;
        stub
    }

    pub fn new_annotation(internal_name: impl Into<String>) -> Self {
        let mut stub = Self::new_interface(internal_name);
        stub.access_flags |= ACC_ANNOTATION;
        stub.interfaces.push("java/lang/annotation/Annotation".to_string());
        stub
    }

    pub fn new_enum(internal_name: impl Into<String>) -> Self {
        let internal_name = internal_name.into();
        let mut stub = Self::new(internal_name.clone());
        stub.access_flags |= ACC_ENUM | ACC_FINAL;
        stub.super_class = Some("java/lang/Enum".to_string());
        stub.signature = Some(format!("Ljava/lang/Enum<L{internal_name};>;"));
        stub
    }

    pub fn new_module_info(info: ModuleInfo) -> Self {
        let mut stub = Self::new(MODULE_INFO);
        stub.access_flags = ACC_MODULE;
        stub.super_class = None;
        stub.module = Some(info);
        stub
    }

    pub fn new_package_info(package_internal: &str) -> Self {
        let internal_name = if package_internal.is_empty() {
            PACKAGE_INFO.to_string()
        } else {
            format!("{package_internal}/{PACKAGE_INFO}")
        };
        let mut stub = Self::new(internal_name);
        stub.access_flags = ACC_INTERFACE | ACC_ABSTRACT | ACC_SYNTHETIC;
        stub
    }

    pub fn access(mut self, flags: u16) -> Self {
        self.access_flags = flags;
        self
    }

    pub fn extends(mut self, super_class: Option<&str>) -> Self {
        self.super_class = super_class.map(str::to_string);
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn inner_class(
        mut self,
        inner_class: impl Into<String>,
        outer_class: Option<&str>,
        inner_name: Option<&str>,
        access_flags: u16,
    ) -> Self {
        self.inner_classes.push(InnerClassInfo {
            inner_class: inner_class.into(),
            outer_class: outer_class.map(str::to_string),
            inner_name: inner_name.map(str::to_string),
            access_flags,
        });
        self
    }

    pub fn enclosing_method(mut self, class: impl Into<String>, method: Option<(&str, &str)>) -> Self {
        self.enclosing_method = Some(EnclosingMethod {
            class: class.into(),
            method: method.map(|(name, desc)| (name.to_string(), desc.to_string())),
        });
        self
    }

    pub fn field(mut self, field: FieldStub) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodStub) -> Self {
        self.methods.push(method);
        self
    }

    /// Simple name of the entry (`Outer$Inner` for `p/Outer$Inner`).
    pub fn entry_simple_name(&self) -> &str {
        self.internal_name
            .rsplit_once('/')
            .map_or(self.internal_name.as_str(), |(_, name)| name)
    }

    pub fn is_package_info(&self) -> bool {
        self.entry_simple_name() == PACKAGE_INFO
    }

    pub fn is_module_info(&self) -> bool {
        self.internal_name == MODULE_INFO
    }

    /// The inner-class record describing this class itself, if any.
    pub fn self_inner_record(&self) -> Option<&InnerClassInfo> {
        self.inner_classes
            .iter()
            .find(|ic| ic.inner_class == self.internal_name)
    }
}

impl FieldStub {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            access_flags: ACC_PUBLIC,
            name: name.into(),
            descriptor: descriptor.into(),
            signature: None,
            constant_value: None,
            annotations: Vec::new(),
        }
    }

    pub fn access(mut self, flags: u16) -> Self {
        self.access_flags = flags;
        self
    }

    pub fn signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn constant(mut self, value: ConstValue) -> Self {
        self.constant_value = Some(value);
        self
    }

    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl MethodStub {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            access_flags: ACC_PUBLIC,
            name: name.into(),
            descriptor: descriptor.into(),
            signature: None,
            exceptions: Vec::new(),
            parameters: Vec::new(),
            annotation_default: None,
            annotations: Vec::new(),
        }
    }

    pub fn access(mut self, flags: u16) -> Self {
        self.access_flags = flags;
        self
    }

    pub fn signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn throws(mut self, exception: impl Into<String>) -> Self {
        self.exceptions.push(exception.into());
        self
    }

    pub fn parameter(mut self, name: impl Into<String>, access_flags: u16) -> Self {
        self.parameters.push(ParameterInfo {
            name: Some(name.into()),
            access_flags,
        });
        self
    }

    pub fn default_value(mut self, value: ElementValue) -> Self {
        self.annotation_default = Some(value);
        self
    }

    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}
