//! Structural class records and the generic-signature grammar.
//!
//! A class reader turns `.class` bytes into [`ClassStub`]s; this crate only defines the shape of
//! those records (plus builders for synthesizing them) and the parsers for the descriptor and
//! `Signature` attribute grammars that consumers run lazily over the raw strings.

#![forbid(unsafe_code)]

pub mod access;
mod annotation;
mod descriptor;
mod error;
mod signature;
mod stub;

pub use crate::annotation::{descriptor_to_internal_name, Annotation, ConstValue, ElementValue};
pub use crate::descriptor::{parse_field_descriptor, parse_method_descriptor};
pub use crate::descriptor::{BaseType, FieldType, MethodDescriptor, ReturnType};
pub use crate::error::{Error, Result};
pub use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassSignature,
    ClassTypeSignature, FieldTypeSignature, MethodSignature, SimpleClassTypeSignature,
    TypeArgument, TypeParameter, TypeSignature,
};
pub use crate::stub::{
    ClassStub, EnclosingMethod, FieldStub, InnerClassInfo, MethodStub, ParameterInfo,
    MODULE_INFO, PACKAGE_INFO,
};
