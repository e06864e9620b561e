//! Class generation preparation for the gvy compiler.
//!
//! The verifier runs after semantic analysis and before class generation.
//! For each class it:
//!
//! - **Synthesizes members**: default-parameter overloads, property
//!   accessors, the `GroovyObject` metaclass plumbing, a default
//!   constructor and covariant bridge methods
//! - **Assembles initialization**: field initializers and initializer
//!   blocks move into constructors and `<clinit>`
//! - **Checks structure**: duplicate members, identifier validity,
//!   `this` use before `super(...)`, final variable reassignment
//!
//! The first error in a class aborts that class. Warnings are collected as
//! diagnostics on the [`Verifier`].

mod code_checks;
mod constants;
mod covariant;
mod default_params;
pub mod error;
mod final_vars;
mod generics;
mod groovy_object;
mod initializers;
pub mod options;
mod properties;
mod return_adder;
mod this_before_super;
mod validators;
mod verifier;

pub use constants::{to_primitive_constant, transform_inline_constants};
pub use error::{ErrorNode, VerifyError, VerifyResult};
pub use groovy_object::{
    FAST_PATH_FIELD, META_CLASS_FIELD, STATIC_CLASS_INFO_FIELD, STATIC_META_CLASS_METHOD,
};
pub use initializers::SWAP_INIT_METHOD;
pub use options::VerifierOptions;
pub use verifier::{Verifier, VerifyOutcome};

#[cfg(test)]
#[path = "../tests/test_support.rs"]
mod test_support;

#[cfg(test)]
#[path = "../tests/default_params_tests.rs"]
mod default_params_tests;

#[cfg(test)]
#[path = "../tests/covariant_tests.rs"]
mod covariant_tests;

#[cfg(test)]
#[path = "../tests/initializers_tests.rs"]
mod initializers_tests;

#[cfg(test)]
#[path = "../tests/members_tests.rs"]
mod members_tests;

#[cfg(test)]
#[path = "../tests/code_checks_tests.rs"]
mod code_checks_tests;

#[cfg(test)]
#[path = "../tests/final_vars_tests.rs"]
mod final_vars_tests;
