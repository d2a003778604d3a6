//! Compile-time element and type model for Java, reconstructed from class stubs.
//!
//! A [`Universe`] owns every element node (modules, packages, types, members, type
//! variables). Archives are registered up front; everything else (package indexes, class
//! records, signatures, members, annotations) is derived lazily on first query and memoized
//! per node, so any number of threads can query one universe concurrently.
//!
//! Elements have identity and are addressed by handles such as [`ClassId`]; type mirrors
//! ([`TypeMirror`]) are plain values compared structurally. [`Types`] implements the type
//! algebra (subtyping, erasure, capture, `as_member_of`, hiding and overriding) and
//! [`Elements`] the element-level queries on top of it.
//!
//! Unresolvable names never fail: they become missing types whose mirrors have kind
//! [`TypeKind::Error`] and which are compatible with everything.

#![forbid(unsafe_code)]

mod annotation;
mod arena;
mod archive;
mod config;
mod element;
mod elements;
mod error;
mod lookup;
mod memo;
mod mirror;
mod names;
mod scope;
mod types;
mod universe;

pub use crate::annotation::{AnnotationMirror, AnnotationValue};
pub use crate::archive::{Archive, MapModuleResolver, MemoryArchive, ModuleResolver};
pub use crate::arena::{ClassId, ExecutableId, ModuleId, PackageId, TypeParamId, VariableId};
pub use crate::config::{json_schema, ModelConfig};
pub use crate::element::{
    Element, ElementId, ElementKind, ExecutableElement, Modifier, Modifiers, ModuleElement,
    NestingKind, PackageElement, ReachableModule, TypeElement, TypeParameterElement,
    VariableElement,
};
pub use crate::elements::Elements;
pub use crate::error::{ArchiveError, ModelError, Result};
pub use crate::lookup::TypeLookup;
pub use crate::memo::{Deferred, KeyedMemo, KeyedMemo2, Memo};
pub use crate::mirror::{
    DeclaredType, ExecutableType, NoTypeKind, PrimitiveType, TypeKind, TypeMirror, WildcardBound,
};
pub use crate::types::Types;
pub use crate::universe::Universe;
