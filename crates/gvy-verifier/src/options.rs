//! Verifier configuration.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VerifierOptions {
    /// Move static field initializers into `<clinit>`; when off they stay
    /// on the field declarations.
    pub inline_static_field_initializers_into_clinit: bool,
    /// Tag generated members `GENERATED` (and the metaclass accessors
    /// `INTERNAL`) instead of hiding them as synthetic.
    pub annotate_generated: bool,
    /// Keep verifying sibling classes after one fails.
    pub continue_after_error: bool,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        VerifierOptions {
            inline_static_field_initializers_into_clinit: true,
            annotate_generated: true,
            continue_after_error: false,
        }
    }
}
