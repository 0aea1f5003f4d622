#![deny(clippy::disallowed_methods)]
#![deny(clippy::self_named_module_files)]
#![deny(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::branches_sharing_code)]
#![warn(clippy::cloned_instead_of_copied)]
#![warn(clippy::copy_iterator)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::equatable_if_let)]
#![warn(clippy::explicit_into_iter_loop)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::from_iter_instead_of_collect)]
#![warn(clippy::get_unwrap)]
#![warn(clippy::implicit_clone)]
#![warn(clippy::inconsistent_struct_constructor)]
#![warn(clippy::index_refutable_slice)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::items_after_statements)]
#![warn(clippy::large_types_passed_by_value)]
#![warn(clippy::manual_assert)]
#![warn(clippy::manual_ok_or)]
#![warn(clippy::map_unwrap_or)]
#![warn(clippy::match_wildcard_for_single_variants)]
#![warn(clippy::mixed_read_write_in_expression)]
#![warn(clippy::multiple_crate_versions)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::redundant_pub_crate)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::str_to_string)]
#![warn(clippy::string_to_string)]
#![warn(clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::unnecessary_wraps)]
#![warn(clippy::unnested_or_patterns)]
#![warn(clippy::unused_self)]

#[macro_use]
pub mod ast;
pub mod definitions;
pub mod parser;
pub mod proof_state;
mod utils;

use parser::{ParserError, Position};
use std::io;
use thiserror::Error;

pub use ast::{MalformedRecord, Session, StaleSessionAccess, TermId};
pub use proof_state::ProofState;

pub type MathObjResult<T> = Result<T, Error>;

fn wrap_parser_error_message(e: &ParserError, pos: &Position) -> String {
    format!("parser error: {} (on line {}, column {})", e, pos.0, pos.1)
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{}", wrap_parser_error_message(.0, .1))]
    Parser(ParserError, Position),

    #[error("malformed record: {0}")]
    Malformed(#[from] MalformedRecord),

    #[error(transparent)]
    StaleSession(#[from] StaleSessionAccess),
}

/// The options of a proof session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub(crate) allow_implicit_use_of_definitions: bool,
    pub(crate) independent_local_contexts: bool,
    pub(crate) use_type_name_as_hint: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allow_implicit_use_of_definitions: false,
            independent_local_contexts: true,
            use_type_name_as_hint: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// If enabled, the connective tests may recognize a term through an implicit definition.
    pub fn allow_implicit_use_of_definitions(mut self, value: bool) -> Self {
        self.allow_implicit_use_of_definitions = value;
        self
    }

    /// If enabled, each subtree gets its own copy of the local context, so that variables bound
    /// in parallel sub-expressions do not see each other.
    pub fn independent_local_contexts(mut self, value: bool) -> Self {
        self.independent_local_contexts = value;
        self
    }

    pub fn use_type_name_as_hint(mut self, value: bool) -> Self {
        self.use_type_name_as_hint = value;
        self
    }

    pub fn implicit_use_allowed(&self) -> bool {
        self.allow_implicit_use_of_definitions
    }
}
