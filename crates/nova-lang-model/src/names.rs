//! Simple/qualified name and nesting-kind derivation from `InnerClasses` records.

use std::collections::HashSet;

use nova_classfile::InnerClassInfo;

use crate::element::NestingKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Names {
    pub(crate) nesting: NestingKind,
    pub(crate) simple: String,
    /// Empty for local and anonymous classes and for members nested inside them.
    pub(crate) qualified: String,
    /// Internal name of the lexically enclosing class, when the records name one.
    pub(crate) outer: Option<String>,
    /// Access flags from the class's own inner-class record.
    pub(crate) inner_flags: Option<u16>,
}

impl Names {
    pub(crate) fn top_level(internal_name: &str) -> Self {
        let simple = internal_name
            .rsplit_once('/')
            .map_or(internal_name, |(_, simple)| simple);
        Names {
            nesting: NestingKind::TopLevel,
            simple: simple.to_string(),
            qualified: internal_name.replace('/', "."),
            outer: None,
            inner_flags: None,
        }
    }
}

fn own_record<'a>(internal_name: &str, records: &'a [InnerClassInfo]) -> Option<&'a InnerClassInfo> {
    records.iter().find(|record| {
        record.inner_class.len() == internal_name.len() && record.inner_class == internal_name
    })
}

/// `p/Outer$1` -> `p/Outer`; `None` when there is no `$<digits>` suffix.
fn strip_anonymous_suffix(internal_name: &str) -> Option<&str> {
    let (outer, suffix) = internal_name.rsplit_once('$')?;
    (!suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit())).then_some(outer)
}

pub(crate) fn derive(internal_name: &str, records: &[InnerClassInfo]) -> Names {
    let Some(record) = own_record(internal_name, records) else {
        return Names::top_level(internal_name);
    };

    let Some(inner_name) = record.inner_name.as_deref() else {
        let outer = record
            .outer_class
            .clone()
            .or_else(|| strip_anonymous_suffix(internal_name).map(str::to_string));
        return Names {
            nesting: NestingKind::Anonymous,
            simple: String::new(),
            qualified: String::new(),
            outer,
            inner_flags: Some(record.access_flags),
        };
    };

    let Some(outer) = record.outer_class.as_deref() else {
        return Names {
            nesting: NestingKind::Local,
            simple: inner_name.to_string(),
            qualified: String::new(),
            outer: None,
            inner_flags: Some(record.access_flags),
        };
    };

    Names {
        nesting: NestingKind::Member,
        simple: inner_name.to_string(),
        qualified: member_qualified_name(internal_name, inner_name, outer, records),
        outer: Some(outer.to_string()),
        inner_flags: Some(record.access_flags),
    }
}

/// Walk outward through the records. Reaching a local or anonymous level (or a cycle) means
/// the member has no canonical name.
fn member_qualified_name(
    internal_name: &str,
    inner_name: &str,
    outer: &str,
    records: &[InnerClassInfo],
) -> String {
    let mut segments = vec![inner_name.to_string()];
    let mut visited = HashSet::from([internal_name.to_string()]);
    let mut current = outer.to_string();

    loop {
        if !visited.insert(current.clone()) {
            return String::new();
        }
        let Some(record) = own_record(&current, records) else {
            break;
        };
        let (Some(name), Some(next)) = (record.inner_name.as_deref(), record.outer_class.as_deref())
        else {
            return String::new();
        };
        segments.push(name.to_string());
        current = next.to_string();
    }

    let mut qualified = current.replace('/', ".");
    for segment in segments.iter().rev() {
        qualified.push('.');
        qualified.push_str(segment);
    }
    qualified
}
