// Integration suite for `nova-lang-model`, compiled into the single `harness` test binary.
mod fixtures;

mod capture;
mod decode_errors;
mod generics;
mod modules;
mod nesting;
mod subtyping;
