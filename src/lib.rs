#![warn(clippy::all)]
pub(crate) mod condition;
pub(crate) mod error;
pub(crate) mod policy;
pub(crate) mod principal;
pub(crate) mod statement;

#[macro_use]
pub(crate) mod serutil;

pub use {
    condition::{Condition, ConditionMap},
    error::PolicyError,
    policy::{Policy, PolicyBuilder, PolicyBuilderError},
    principal::{Principal, PrincipalMap},
    statement::{Statement, StatementBuilder, StatementBuilderError},
};
